use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::config::JwtConfig;
use crate::database::models::User;
use crate::database::{DatabaseError, RepositoryManager};
use crate::dto::{TokenDto, UserForAuthenticationDto, UserForRegistrationDto};
use crate::error::FieldErrors;
use crate::services::ServiceError;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone)]
pub struct AuthenticationService {
    repository: RepositoryManager,
    jwt: JwtConfig,
}

impl AuthenticationService {
    pub fn new(repository: RepositoryManager, jwt: JwtConfig) -> Self {
        Self { repository, jwt }
    }

    /// Create a user with the requested roles.
    ///
    /// Every rule is checked so clients see all problems at once.
    pub async fn register_user(&self, registration: UserForRegistrationDto) -> Result<(), ServiceError> {
        let user_name = registration.user_name.unwrap_or_default();
        let password = registration.password.unwrap_or_default();
        let users = self.repository.user();

        let mut errors = FieldErrors::new();
        if users.find_by_name(&user_name).await?.is_some() {
            errors
                .entry("DuplicateUserName".into())
                .or_default()
                .push(format!("Username '{}' is already taken.", user_name));
        }
        if let Some(email) = registration.email.as_deref().filter(|e| !e.is_empty()) {
            if users.find_by_email(email).await?.is_some() {
                errors
                    .entry("DuplicateEmail".into())
                    .or_default()
                    .push(format!("Email '{}' is already taken.", email));
            }
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors
                .entry("PasswordTooShort".into())
                .or_default()
                .push(format!("Passwords must be at least {} characters.", MIN_PASSWORD_LENGTH));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            errors
                .entry("PasswordRequiresDigit".into())
                .or_default()
                .push("Passwords must have at least one digit ('0'-'9').".to_string());
        }
        for role in &registration.roles {
            if !users.role_exists(role).await? {
                errors.entry("InvalidRole".into()).or_default().push(format!("Role '{}' does not exist.", role));
            }
        }
        if !errors.is_empty() {
            return Err(ServiceError::Registration(errors));
        }

        let user = User {
            id: Uuid::new_v4(),
            first_name: registration.first_name,
            last_name: registration.last_name,
            user_name,
            email: registration.email,
            phone_number: registration.phone_number,
            password_hash: auth::hash_password(&password)?,
            refresh_token: None,
            refresh_token_expiry_time: None,
        };

        match users.create_user(&user, &registration.roles).await {
            Ok(()) => {
                info!("Registered user {}", user.user_name);
                Ok(())
            }
            Err(DatabaseError::Conflict(_)) => {
                let mut errors = FieldErrors::new();
                errors.insert(
                    "DuplicateUserName".into(),
                    vec![format!("Username '{}' is already taken.", user.user_name)],
                );
                Err(ServiceError::Registration(errors))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials and return the matching user.
    pub async fn validate_user(&self, credentials: &UserForAuthenticationDto) -> Result<User, ServiceError> {
        let user_name = credentials.user_name.as_deref().unwrap_or_default();
        let password = credentials.password.as_deref().unwrap_or_default();

        let user = self.repository.user().find_by_name(user_name).await?;
        match user {
            Some(user) if auth::verify_password(password, &user.password_hash) => Ok(user),
            _ => {
                warn!("{}", ServiceError::InvalidCredentials);
                Err(ServiceError::InvalidCredentials)
            }
        }
    }

    /// Issue an access token and a fresh refresh token.
    ///
    /// `populate_expiry` restarts the refresh token lifetime; refreshes keep it.
    pub async fn create_token(&self, user: &User, populate_expiry: bool) -> Result<TokenDto, ServiceError> {
        let roles = self.repository.user().roles_for(user.id).await?;
        let claims = Claims::new(&user.user_name, roles, &self.jwt);
        let access_token = auth::generate_jwt(&claims, &self.jwt)?;

        let refresh_token = auth::generate_refresh_token();
        let expiry = populate_expiry.then(|| Utc::now() + Duration::days(self.jwt.refresh_token_days));
        self.repository.user().save_refresh_token(user.id, &refresh_token, expiry).await?;

        Ok(TokenDto { access_token, refresh_token })
    }

    pub async fn refresh_token(&self, token: TokenDto) -> Result<TokenDto, ServiceError> {
        let claims = auth::validate_jwt(&token.access_token, &self.jwt, false)
            .map_err(|_| ServiceError::RefreshTokenBadRequest)?;

        let user = self
            .repository
            .user()
            .find_by_name(&claims.name)
            .await?
            .ok_or(ServiceError::RefreshTokenBadRequest)?;

        let token_matches = user.refresh_token.as_deref() == Some(token.refresh_token.as_str());
        let still_valid = user.refresh_token_expiry_time.map_or(false, |expiry| expiry > Utc::now());
        if !token_matches || !still_valid {
            return Err(ServiceError::RefreshTokenBadRequest);
        }

        self.create_token(&user, false).await
    }
}
