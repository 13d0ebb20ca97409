use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::rules;
use crate::database::repository::{GroupRepository, UserRepository};
use crate::error::ApiError;
use crate::middleware::CurrentUser;

use super::users::UserResponse;

#[derive(Debug, Deserialize)]
pub struct AddMemberQuery {
    pub user_id: i64,
}

/// Membership row plus the member's account, the shape clients render
/// member lists from.
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    pub user: UserResponse,
}

/// POST /groups/:group_id/members/?user_id= - enroll a user (owner only)
pub async fn member_post(
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(group_id): Path<i64>,
    Query(query): Query<AddMemberQuery>,
) -> Result<Json<MemberResponse>, ApiError> {
    let groups = GroupRepository::new().await?;
    let group = groups
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Group not found"))?;

    if !rules::can_manage_membership(&actor, &group) {
        return Err(ApiError::forbidden("You are not the owner of this group"));
    }

    let users = UserRepository::new().await?;
    let user = users
        .find_by_id(query.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let member = groups.add_member(group.id, user.id).await?;

    Ok(Json(MemberResponse {
        id: member.id,
        group_id: member.group_id,
        user_id: member.user_id,
        user: user.into(),
    }))
}

/// DELETE /groups/:group_id/members/:user_id - remove a member (owner only)
pub async fn member_delete(
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path((group_id, user_id)): Path<(i64, i64)>,
) -> Result<Json<MemberResponse>, ApiError> {
    let groups = GroupRepository::new().await?;
    let group = groups
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Group not found"))?;

    if !rules::can_manage_membership(&actor, &group) {
        return Err(ApiError::forbidden("You are not the owner of this group"));
    }

    let users = UserRepository::new().await?;
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let removed = groups.remove_member(group.id, user.id).await?;

    Ok(Json(MemberResponse {
        id: removed.id,
        group_id: removed.group_id,
        user_id: removed.user_id,
        user: user.into(),
    }))
}
