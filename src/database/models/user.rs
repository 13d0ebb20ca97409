use sqlx::FromRow;

/// Account row. Carries the bcrypt digest in `password`, so this type is
/// never serialized to clients; handlers build their own response shape.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
}
