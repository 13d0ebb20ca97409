use axum::{extract::Path, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::password::hash_password;
use crate::auth::rules;
use crate::database::models::User;
use crate::database::repository::{NewUser, UserChanges, UserRepository};
use crate::error::ApiError;
use crate::middleware::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// All fields optional; absent fields leave the column untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

/// Wire shape for an account. Deliberately has no password field.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            is_active: user.is_active,
            is_admin: user.is_admin,
        }
    }
}

fn hash_or_500(plain: &str) -> Result<String, ApiError> {
    hash_password(plain).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("Could not hash password")
    })
}

/// POST /users/ - register a new account (admin only)
pub async fn user_post(
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if !rules::can_register_user(&actor) {
        return Err(ApiError::forbidden("You dont have admin role"));
    }

    let digest = hash_or_500(&body.password)?;

    let users = UserRepository::new().await?;
    let user = users
        .create(NewUser {
            username: body.username,
            password: digest,
            full_name: body.full_name,
            email: body.email,
        })
        .await?;

    Ok(Json(user.into()))
}

/// PUT /users/:user_id - partial account update (admin only)
pub async fn user_put(
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if !rules::can_edit_user(&actor) {
        return Err(ApiError::forbidden("You dont have admin role"));
    }

    // An empty password string counts as "not provided"; anything else is
    // re-hashed before it reaches the row.
    let password = match body.password.filter(|p| !p.is_empty()) {
        Some(plain) => Some(hash_or_500(&plain)?),
        None => None,
    };

    let users = UserRepository::new().await?;
    let user = users
        .update(
            user_id,
            UserChanges {
                username: body.username,
                password,
                full_name: body.full_name,
                email: body.email,
                is_active: body.is_active,
                is_admin: body.is_admin,
            },
        )
        .await?;

    Ok(Json(user.into()))
}
