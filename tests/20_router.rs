//! Router-level tests driven through `tower::ServiceExt::oneshot`, covering
//! the paths that resolve before any database access.

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use groupchat_api::app;
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn root_is_public() -> Result<()> {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["name"], "groupchat-api");

    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_token() -> Result<()> {
    for (method, uri) in [
        ("POST", "/users/"),
        ("PUT", "/users/1"),
        ("POST", "/groups/"),
        ("PUT", "/groups/1"),
        ("DELETE", "/groups/1"),
        ("GET", "/groups/search?name=x"),
        ("POST", "/groups/1/members/?user_id=2"),
        ("DELETE", "/groups/1/members/2"),
        ("POST", "/groups/1/messages/"),
        ("POST", "/groups/1/messages/1/likes/"),
    ] {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require a token",
            method,
            uri
        );
        let body = body_json(response).await?;
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "Not authenticated");
    }

    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_garbage_token() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/groups/")
                .header(header::AUTHORIZATION, "Bearer not.a.real.jwt")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await?;
    assert_eq!(body["message"], "Invalid authentication credentials");

    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/groups/")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await?;
    assert_eq!(body["message"], "Not authenticated");

    Ok(())
}

#[tokio::test]
async fn token_endpoint_rejects_wrong_content_type() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/token/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"a","password":"b"}"#))?,
        )
        .await?;

    // The endpoint takes form-encoded credentials only
    assert!(
        response.status().is_client_error(),
        "expected client error, got {}",
        response.status()
    );

    Ok(())
}

#[tokio::test]
async fn unknown_route_is_404() -> Result<()> {
    let response = app()
        .oneshot(Request::builder().uri("/nope").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn wrong_method_is_405() -> Result<()> {
    let response = app()
        .oneshot(Request::builder().uri("/token/").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}
