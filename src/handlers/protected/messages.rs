use axum::{extract::Path, Extension, Json};
use serde::Deserialize;

use crate::auth::rules;
use crate::database::models::{Message, MessageLike};
use crate::database::repository::{GroupRepository, MessageRepository};
use crate::error::ApiError;
use crate::middleware::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub message: String,
}

/// POST /groups/:group_id/messages/ - post a message (members only)
pub async fn message_post(
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(group_id): Path<i64>,
    Json(body): Json<CreateMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let groups = GroupRepository::new().await?;
    let group = groups
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Group not found"))?;

    let membership = groups.find_member(group.id, actor.id).await?;
    if !rules::can_post_message(&actor, membership.as_ref()) {
        return Err(ApiError::forbidden("You are not a member of this group"));
    }

    let messages = MessageRepository::new().await?;
    let message = messages.create(group.id, actor.id, &body.message).await?;

    Ok(Json(message))
}

/// POST /groups/:group_id/messages/:message_id/likes/ - like a message
/// (members only, once per user)
pub async fn like_post(
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path((group_id, message_id)): Path<(i64, i64)>,
) -> Result<Json<MessageLike>, ApiError> {
    let groups = GroupRepository::new().await?;
    let group = groups
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Group not found"))?;

    let membership = groups.find_member(group.id, actor.id).await?;
    if !rules::can_like_message(&actor, membership.as_ref()) {
        return Err(ApiError::forbidden("You are not a member of this group"));
    }

    let messages = MessageRepository::new().await?;
    let message = messages
        .find_by_id(message_id)
        .await?
        // A message from some other group is invisible here
        .filter(|m| m.group_id == group.id)
        .ok_or_else(|| ApiError::not_found("Message not found"))?;

    let like = messages.like(message.id, actor.id).await?;

    Ok(Json(like))
}
