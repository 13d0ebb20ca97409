pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the full application router. Lives in the library so integration
/// tests can drive it directly without a listening socket.
pub fn app() -> Router {
    let protected = user_routes()
        .merge(group_routes())
        .merge(message_routes())
        .layer(axum::middleware::from_fn(middleware::require_auth));

    Router::new()
        // Ops surface
        .route("/", get(root))
        .route("/health", get(health))
        // Token acquisition, no auth
        .merge(token_routes())
        // Everything else requires a bearer token
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn token_routes() -> Router {
    use handlers::public::token;

    Router::new().route("/token/", post(token::token_post))
}

fn user_routes() -> Router {
    use handlers::protected::users;

    Router::new()
        .route("/users/", post(users::user_post))
        .route("/users/:user_id", put(users::user_put))
}

fn group_routes() -> Router {
    use handlers::protected::{groups, members};

    Router::new()
        .route("/groups/", post(groups::group_post))
        // Static segment registered alongside /groups/:group_id; the router
        // prefers the literal match for /groups/search
        .route("/groups/search", get(groups::search_get))
        .route(
            "/groups/:group_id",
            put(groups::group_put).delete(groups::group_delete),
        )
        .route("/groups/:group_id/members/", post(members::member_post))
        .route(
            "/groups/:group_id/members/:user_id",
            delete(members::member_delete),
        )
}

fn message_routes() -> Router {
    use handlers::protected::messages;

    Router::new()
        .route("/groups/:group_id/messages/", post(messages::message_post))
        .route(
            "/groups/:group_id/messages/:message_id/likes/",
            post(messages::like_post),
        )
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "groupchat-api",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Group chat backend - users, groups, membership, messages and likes",
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::Database::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
