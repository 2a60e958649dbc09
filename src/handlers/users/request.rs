//! User request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{MAX_NAME_LENGTH, MIN_NAME_LENGTH, roles},
    utils::validation::password_strength,
};

/// Profile update by the account owner
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    /// Current password (required for password changes)
    pub current_password: Option<String>,

    #[validate(custom(function = "password_strength"))]
    pub new_password: Option<String>,

    /// Admin only
    pub role: Option<String>,

    /// Admin only
    pub is_active: Option<bool>,
}

/// Account creation by an admin
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom(function = "password_strength"))]
    pub password: String,

    #[serde(default = "default_role")]
    pub role: String,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_role() -> String {
    roles::USER.to_string()
}

fn default_active() -> bool {
    true
}

/// Account update by an admin
#[derive(Debug, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom(function = "password_strength"))]
    pub password: Option<String>,

    pub role: Option<String>,

    pub is_active: Option<bool>,
}

/// List users query parameters
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}
