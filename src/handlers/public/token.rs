use axum::{Form, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::auth::issue_token;
use crate::config::config;
use crate::database::repository::UserRepository;
use crate::error::ApiError;

/// Form body of the token endpoint, OAuth2 password-flow style.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /token/ - exchange form credentials for a bearer token.
/// Unknown usernames and wrong passwords get the same answer.
pub async fn token_post(Form(form): Form<LoginForm>) -> Result<Json<TokenResponse>, ApiError> {
    let users = UserRepository::new().await?;
    let user = users
        .authenticate(&form.username, &form.password)
        .await?
        .ok_or_else(|| ApiError::bad_request("Incorrect username or password"))?;

    let ttl = Duration::minutes(config().security.token_expire_minutes as i64);
    let token = issue_token(&user.username, user.is_admin, ttl).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Could not issue token")
    })?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}
