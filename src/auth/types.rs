//! Request and response bodies for the identity routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::store::User;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// The name of the user.
    #[validate(
        required(message = "Please Enter Your Name"),
        length(min = 4, max = 30, message = "Name must be between 4 and 30 characters")
    )]
    pub name: Option<String>,

    /// The email address of the user.
    #[validate(
        required(message = "Please Enter Your Email"),
        email(message = "Please Enter a valid Email")
    )]
    #[schema(format = "email")]
    pub email: Option<String>,

    /// The password for the user account.
    #[validate(
        required(message = "Please Enter Your Password"),
        length(min = 8, message = "Password should be at least 8 characters")
    )]
    #[schema(format = "password")]
    pub password: Option<String>,

    /// The phone number of the user.
    #[validate(required(message = "Please Enter Your Number"))]
    pub number: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(format = "email")]
    pub email: String,
    #[schema(format = "password")]
    pub password: String,
}

/// Public view of a user. Never carries the credential hash.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub number: u64,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            number: user.number,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserProfile,
    /// Authentication token, also set as the `token` cookie.
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}
