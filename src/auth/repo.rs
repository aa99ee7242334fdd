use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::datetime::sql_datetime;

/// Account role, stored as the Postgres `user_role` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Lenient reading of client-supplied role fields: anything that is not
    /// exactly `admin` or `user` falls back to `user`.
    pub fn coerce(raw: &str) -> Role {
        Role::parse(raw).unwrap_or(Role::User)
    }

    /// Strict reading, for operator-facing input (CLI). Matching is
    /// case-sensitive; only the literal lowercase names are roles.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// Full user row, including the password hash. Never serialized to clients.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: PrimitiveDateTime,
}

/// Listing row for the admin dashboard, without the password hash.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(with = "sql_datetime")]
    pub created_at: PrimitiveDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Insert a new user. Email uniqueness is the column constraint's job;
    /// callers translate the unique violation into a 409.
    pub async fn insert(
        db: &PgPool,
        full_name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, full_name, email, password_hash, role, created_at
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(db)
        .await
    }

    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<UserRow>> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, full_name, email, role, created_at
            FROM users
            ORDER BY id DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        id: i64,
        full_name: &str,
        email: &str,
        role: Role,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET full_name = $1, email = $2, role = $3
            WHERE id = $4
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(role)
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
