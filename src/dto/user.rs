use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserForRegistrationDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    #[validate(required(message = "Username is required"))]
    pub user_name: Option<String>,

    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,

    pub email: Option<String>,
    pub phone_number: Option<String>,

    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserForAuthenticationDto {
    #[validate(required(message = "User name is required"))]
    pub user_name: Option<String>,

    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,
}

/// Access and refresh token pair handed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDto {
    pub access_token: String,
    pub refresh_token: String,
}
