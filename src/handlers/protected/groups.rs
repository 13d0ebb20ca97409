use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::rules;
use crate::database::models::Group;
use crate::database::repository::{GroupChanges, GroupRepository};
use crate::error::ApiError;
use crate::middleware::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGroupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

/// POST /groups/ - create a group; the caller becomes owner and first member
pub async fn group_post(
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Json(body): Json<CreateGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let groups = GroupRepository::new().await?;
    let group = groups
        .create(&body.name, body.description.as_deref(), actor.id)
        .await?;

    Ok(Json(group))
}

/// PUT /groups/:group_id - partial group update (any authenticated user)
pub async fn group_put(
    Extension(CurrentUser(_actor)): Extension<CurrentUser>,
    Path(group_id): Path<i64>,
    Json(body): Json<UpdateGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let groups = GroupRepository::new().await?;
    let group = groups
        .update(
            group_id,
            GroupChanges {
                name: body.name,
                description: body.description,
            },
        )
        .await?;

    Ok(Json(group))
}

/// DELETE /groups/:group_id - delete a group and everything in it (owner only)
pub async fn group_delete(
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(group_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let groups = GroupRepository::new().await?;
    let group = groups
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Group not found"))?;

    if !rules::can_delete_group(&actor, &group) {
        return Err(ApiError::forbidden("You are not the owner of this group"));
    }

    groups.delete(group.id).await?;

    Ok(Json(json!({ "message": "Group deleted" })))
}

/// GET /groups/search?name= - substring search on group names
pub async fn search_get(
    Extension(CurrentUser(_actor)): Extension<CurrentUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let groups = GroupRepository::new().await?;
    let matches = groups.search(&query.name).await?;

    let groups: Vec<Value> = matches
        .iter()
        .map(|g| json!({ "id": g.id, "name": g.name, "description": g.description }))
        .collect();

    Ok(Json(json!({ "groups": groups })))
}
