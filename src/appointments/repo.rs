use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::datetime::sql_datetime;

#[derive(Debug, Clone, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub appointment_date: PrimitiveDateTime,
    pub message: Option<String>,
}

/// Admin listing row with the linked account's display fields, when the
/// booking came from a logged-in visitor.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AppointmentWithUser {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user_full_name: Option<String>,
    pub user_email: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "sql_datetime")]
    pub appointment_date: PrimitiveDateTime,
    pub message: Option<String>,
}

impl Appointment {
    pub async fn insert_public(
        db: &PgPool,
        user_id: Option<i64>,
        name: &str,
        email: &str,
        phone: &str,
        appointment_date: PrimitiveDateTime,
        message: Option<&str>,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments (user_id, name, email, phone, appointment_date, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(appointment_date)
        .bind(message)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn list_by_email(db: &PgPool, email: &str) -> sqlx::Result<Vec<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            r#"
            SELECT id, user_id, name, email, phone, appointment_date, message
            FROM appointments
            WHERE email = $1
            ORDER BY appointment_date DESC
            "#,
        )
        .bind(email)
        .fetch_all(db)
        .await
    }

    pub async fn list_with_user(db: &PgPool) -> sqlx::Result<Vec<AppointmentWithUser>> {
        sqlx::query_as::<_, AppointmentWithUser>(
            r#"
            SELECT
                a.id,
                a.user_id,
                u.full_name AS user_full_name,
                u.email AS user_email,
                a.name,
                a.email,
                a.phone,
                a.appointment_date,
                a.message
            FROM appointments a
            LEFT JOIN users u ON u.id = a.user_id
            ORDER BY a.id DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Admin creation leaves `user_id` unset; only the public form links
    /// bookings to accounts.
    pub async fn insert_admin(
        db: &PgPool,
        name: &str,
        email: &str,
        phone: &str,
        appointment_date: PrimitiveDateTime,
        message: &str,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments (name, email, phone, appointment_date, message)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(appointment_date)
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
        phone: &str,
        appointment_date: PrimitiveDateTime,
        message: &str,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE appointments
            SET name = $1,
                email = $2,
                phone = $3,
                appointment_date = $4,
                message = $5
            WHERE id = $6
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(appointment_date)
        .bind(message)
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
