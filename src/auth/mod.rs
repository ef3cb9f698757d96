use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User name of the token holder
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(name: impl Into<String>, roles: Vec<String>, jwt: &JwtConfig) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            roles,
            iss: jwt.valid_issuer.clone(),
            aud: jwt.valid_audience.clone(),
            exp: (now + Duration::minutes(jwt.expires_minutes)).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

fn secret(jwt: &JwtConfig) -> Result<&[u8], AuthError> {
    if jwt.secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    Ok(jwt.secret.as_bytes())
}

/// Sign claims with HS256.
pub fn generate_jwt(claims: &Claims, jwt: &JwtConfig) -> Result<String, AuthError> {
    let key = EncodingKey::from_secret(secret(jwt)?);
    encode(&Header::new(Algorithm::HS256), claims, &key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify signature, issuer and audience; lifetime only when asked.
///
/// Refresh requests present an access token that has usually expired, so
/// they validate without the lifetime check.
pub fn validate_jwt(token: &str, jwt: &JwtConfig, validate_lifetime: bool) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret(jwt)?);

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[jwt.valid_issuer.as_str()]);
    validation.set_audience(&[jwt.valid_audience.as_str()]);
    validation.validate_exp = validate_lifetime;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// 32 random bytes, base64 encoded.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn jwt() -> JwtConfig {
        let mut jwt = AppConfig::development().security.jwt;
        jwt.secret = "unit-test-secret-with-enough-length".to_string();
        jwt
    }

    #[test]
    fn round_trips_claims() {
        let jwt = jwt();
        let claims = Claims::new("JDoe", vec!["Manager".into()], &jwt);
        let token = generate_jwt(&claims, &jwt).unwrap();
        let decoded = validate_jwt(&token, &jwt, true).unwrap();
        assert_eq!(decoded.name, "JDoe");
        assert!(decoded.has_role("manager"));
        assert_eq!(decoded.iss, "CompanyEmployeesAPI");
    }

    #[test]
    fn expired_token_only_passes_without_lifetime_check() {
        let jwt = jwt();
        let mut claims = Claims::new("JDoe", vec![], &jwt);
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = generate_jwt(&claims, &jwt).unwrap();
        assert!(matches!(validate_jwt(&token, &jwt, true), Err(AuthError::InvalidToken(_))));
        assert_eq!(validate_jwt(&token, &jwt, false).unwrap().name, "JDoe");
    }

    #[test]
    fn rejects_wrong_audience_and_secret() {
        let jwt = jwt();
        let token = generate_jwt(&Claims::new("JDoe", vec![], &jwt), &jwt).unwrap();

        let mut other = jwt.clone();
        other.valid_audience = "https://elsewhere".into();
        assert!(validate_jwt(&token, &other, false).is_err());

        let mut other = jwt.clone();
        other.secret = "a-completely-different-secret".into();
        assert!(validate_jwt(&token, &other, false).is_err());
    }

    #[test]
    fn missing_secret_is_an_error() {
        let mut jwt = jwt();
        jwt.secret.clear();
        assert!(matches!(generate_jwt(&Claims::new("x", vec![], &jwt), &jwt), Err(AuthError::MissingSecret)));
    }

    #[test]
    fn hashes_and_verifies_passwords() {
        let hash = hash_password("Password1000").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Password1000", &hash));
        assert!(!verify_password("Password1001", &hash));
        assert!(!verify_password("Password1000", "not-a-hash"));
    }

    #[test]
    fn refresh_tokens_are_random_base64() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_ne!(a, b);
        assert_eq!(STANDARD.decode(&a).unwrap().len(), 32);
    }
}
