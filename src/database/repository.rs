use sqlx::PgPool;

use crate::auth::password::verify_password;
use crate::database::manager::{Database, DatabaseError};
use crate::database::models::{Group, GroupMember, Message, MessageLike, User};

/// New user row. `password` must already be a bcrypt digest.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Partial update for a user row. `None` leaves the column untouched;
/// `password`, when set, must already be a bcrypt digest.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

/// Partial update for a group row. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct GroupChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation
    )
}

/// Map a unique-constraint violation to a readable conflict; pass the rest
/// through. The constraint is the backstop for concurrent inserts that slip
/// past the application-level pre-check.
fn conflict_on_unique(err: sqlx::Error, message: &str) -> DatabaseError {
    if is_unique_violation(&err) {
        DatabaseError::Conflict(message.to_string())
    } else {
        DatabaseError::Sqlx(err)
    }
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self {
            pool: Database::pool().await?,
        })
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        if self.find_by_username(&new_user.username).await?.is_some() {
            return Err(DatabaseError::Conflict(
                "Username already registered".to_string(),
            ));
        }

        let user = sqlx::query_as(
            "INSERT INTO users (username, password, full_name, email)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, password, full_name, email, is_active, is_admin",
        )
        .bind(&new_user.username)
        .bind(&new_user.password)
        .bind(&new_user.full_name)
        .bind(&new_user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Username already registered"))?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as(
            "SELECT id, username, password, full_name, email, is_active, is_admin
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as(
            "SELECT id, username, password, full_name, email, is_active, is_admin
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Apply a partial update. Unknown id maps to `NotFound`; renaming onto
    /// a taken username maps to `Conflict`.
    pub async fn update(&self, user_id: i64, changes: UserChanges) -> Result<User, DatabaseError> {
        if let Some(username) = &changes.username {
            if let Some(existing) = self.find_by_username(username).await? {
                if existing.id != user_id {
                    return Err(DatabaseError::Conflict(
                        "Username already registered".to_string(),
                    ));
                }
            }
        }

        let updated: Option<User> = sqlx::query_as(
            "UPDATE users SET
                username  = COALESCE($2, username),
                password  = COALESCE($3, password),
                full_name = COALESCE($4, full_name),
                email     = COALESCE($5, email),
                is_active = COALESCE($6, is_active),
                is_admin  = COALESCE($7, is_admin)
             WHERE id = $1
             RETURNING id, username, password, full_name, email, is_active, is_admin",
        )
        .bind(user_id)
        .bind(changes.username)
        .bind(changes.password)
        .bind(changes.full_name)
        .bind(changes.email)
        .bind(changes.is_active)
        .bind(changes.is_admin)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Username already registered"))?;

        updated.ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    /// Check credentials against the stored digest. Unknown usernames and
    /// wrong passwords both come back as `None`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let user = match self.find_by_username(username).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        if !verify_password(password, &user.password) {
            return Ok(None);
        }

        Ok(Some(user))
    }
}

pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self {
            pool: Database::pool().await?,
        })
    }

    /// Create a group and enroll the owner as its first member, in one
    /// transaction so a failed membership insert never leaves an empty group.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        owner_id: i64,
    ) -> Result<Group, DatabaseError> {
        if self.find_by_name(name).await?.is_some() {
            return Err(DatabaseError::Conflict(
                "Group name already registered".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let group: Group = sqlx::query_as(
            "INSERT INTO groups (name, description, owner_id)
             VALUES ($1, $2, $3)
             RETURNING id, name, description, owner_id",
        )
        .bind(name)
        .bind(description)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Group name already registered"))?;

        sqlx::query("INSERT INTO group_members (group_id, user_id) VALUES ($1, $2)")
            .bind(group.id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(group)
    }

    pub async fn find_by_id(&self, group_id: i64) -> Result<Option<Group>, DatabaseError> {
        let group =
            sqlx::query_as("SELECT id, name, description, owner_id FROM groups WHERE id = $1")
                .bind(group_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(group)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Group>, DatabaseError> {
        let group =
            sqlx::query_as("SELECT id, name, description, owner_id FROM groups WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(group)
    }

    /// Apply a partial update. Unknown id maps to `NotFound`.
    pub async fn update(&self, group_id: i64, changes: GroupChanges) -> Result<Group, DatabaseError> {
        if let Some(name) = &changes.name {
            if let Some(existing) = self.find_by_name(name).await? {
                if existing.id != group_id {
                    return Err(DatabaseError::Conflict(
                        "Group name already registered".to_string(),
                    ));
                }
            }
        }

        let updated: Option<Group> = sqlx::query_as(
            "UPDATE groups SET
                name        = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING id, name, description, owner_id",
        )
        .bind(group_id)
        .bind(changes.name)
        .bind(changes.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Group name already registered"))?;

        updated.ok_or_else(|| DatabaseError::NotFound("Group not found".to_string()))
    }

    /// Delete a group. Foreign keys cascade to memberships, messages and
    /// message likes.
    pub async fn delete(&self, group_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(group_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Group not found".to_string()));
        }

        Ok(())
    }

    /// Substring match on group name, case-sensitive, no pagination.
    pub async fn search(&self, name: &str) -> Result<Vec<Group>, DatabaseError> {
        let groups = sqlx::query_as(
            "SELECT id, name, description, owner_id FROM groups WHERE name LIKE $1 ORDER BY id",
        )
        .bind(format!("%{}%", name))
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    pub async fn add_member(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<GroupMember, DatabaseError> {
        if self.find_member(group_id, user_id).await?.is_some() {
            return Err(DatabaseError::Conflict(
                "User is already a member of this group".to_string(),
            ));
        }

        let member = sqlx::query_as(
            "INSERT INTO group_members (group_id, user_id)
             VALUES ($1, $2)
             RETURNING id, group_id, user_id",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "User is already a member of this group"))?;

        Ok(member)
    }

    /// Remove a membership and return the removed row. Missing membership
    /// maps to `NotFound`.
    pub async fn remove_member(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<GroupMember, DatabaseError> {
        let removed: Option<GroupMember> = sqlx::query_as(
            "DELETE FROM group_members
             WHERE group_id = $1 AND user_id = $2
             RETURNING id, group_id, user_id",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        removed.ok_or_else(|| DatabaseError::NotFound("User not found in group".to_string()))
    }

    pub async fn find_member(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<Option<GroupMember>, DatabaseError> {
        let member = sqlx::query_as(
            "SELECT id, group_id, user_id FROM group_members
             WHERE group_id = $1 AND user_id = $2",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }
}

pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self {
            pool: Database::pool().await?,
        })
    }

    pub async fn create(
        &self,
        group_id: i64,
        user_id: i64,
        text: &str,
    ) -> Result<Message, DatabaseError> {
        let message = sqlx::query_as(
            "INSERT INTO messages (group_id, user_id, message)
             VALUES ($1, $2, $3)
             RETURNING id, group_id, user_id, message",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    pub async fn find_by_id(&self, message_id: i64) -> Result<Option<Message>, DatabaseError> {
        let message =
            sqlx::query_as("SELECT id, group_id, user_id, message FROM messages WHERE id = $1")
                .bind(message_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(message)
    }

    /// Record a like. A second like of the same message by the same user
    /// maps to `Conflict`.
    pub async fn like(&self, message_id: i64, user_id: i64) -> Result<MessageLike, DatabaseError> {
        let existing: Option<MessageLike> = sqlx::query_as(
            "SELECT id, message_id, user_id FROM message_likes
             WHERE message_id = $1 AND user_id = $2",
        )
        .bind(message_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if existing.is_some() {
            return Err(DatabaseError::Conflict(
                "You already liked this message".to_string(),
            ));
        }

        let like = sqlx::query_as(
            "INSERT INTO message_likes (message_id, user_id)
             VALUES ($1, $2)
             RETURNING id, message_id, user_id",
        )
        .bind(message_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "You already liked this message"))?;

        Ok(like)
    }
}
