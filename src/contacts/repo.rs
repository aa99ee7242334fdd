use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::datetime::sql_datetime;

#[derive(Debug, Clone, FromRow)]
pub struct Contact {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: PrimitiveDateTime,
}

/// Admin listing row with the linked account's display fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContactWithUser {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user_full_name: Option<String>,
    pub user_email: Option<String>,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(with = "sql_datetime")]
    pub created_at: PrimitiveDateTime,
}

impl Contact {
    pub async fn insert_public(
        db: &PgPool,
        user_id: Option<i64>,
        name: &str,
        email: &str,
        message: &str,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO contacts (user_id, name, email, message)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(email)
        .bind(message)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn list_with_user(db: &PgPool) -> sqlx::Result<Vec<ContactWithUser>> {
        sqlx::query_as::<_, ContactWithUser>(
            r#"
            SELECT
                c.id,
                c.user_id,
                u.full_name AS user_full_name,
                u.email AS user_email,
                c.name,
                c.email,
                c.message,
                c.created_at
            FROM contacts c
            LEFT JOIN users u ON u.id = c.user_id
            ORDER BY c.id DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn insert_admin(
        db: &PgPool,
        name: &str,
        email: &str,
        message: &str,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO contacts (name, email, message)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(message)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn update(
        db: &PgPool,
        id: i64,
        name: &str,
        email: &str,
        message: &str,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE contacts
            SET name = $1, email = $2, message = $3
            WHERE id = $4
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(message)
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
