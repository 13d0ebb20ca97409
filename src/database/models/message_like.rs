use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MessageLike {
    pub id: i64,
    pub message_id: i64,
    pub user_id: i64,
}
