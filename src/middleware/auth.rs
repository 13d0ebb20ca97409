use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};

use crate::auth::token::verify_token;
use crate::database::models::User;
use crate::database::repository::UserRepository;
use crate::error::ApiError;

/// Authenticated user injected into request extensions by `require_auth`.
/// Handlers take it via `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Bearer-token middleware for all protected routes. Verifies the token,
/// then resolves the subject to a live user row so a deleted account stops
/// working even while its token is still unexpired.
pub async fn require_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token =
        extract_bearer_token(&headers).ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let claims = verify_token(&token)
        .map_err(|_| ApiError::unauthorized("Invalid authentication credentials"))?;

    let users = UserRepository::new().await?;
    let user = users
        .find_by_username(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(
            extract_bearer_token(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn rejects_missing_header() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn rejects_other_schemes() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn rejects_empty_token() {
        let headers = headers_with("Bearer ");
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
