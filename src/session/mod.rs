use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

use crate::auth::Role;
use crate::error::ApiError;
use crate::state::AppState;

/// What a session remembers about its user. A copy of the user row at login
/// time; admin edits to the user do not rewrite live sessions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionData {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

/// Key-value session storage keyed by an opaque token. Injected into
/// handlers through `AppState` instead of living in ambient globals.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a fresh session and return its token.
    async fn create(&self, data: &SessionData) -> anyhow::Result<String>;

    /// Look up a live (non-expired) session.
    async fn get(&self, token: &str) -> anyhow::Result<Option<SessionData>>;

    /// Drop a session. Unknown tokens are a no-op.
    async fn destroy(&self, token: &str) -> anyhow::Result<()>;
}

pub(crate) fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Postgres-backed store; rows expire by timestamp and are swept
/// opportunistically on create.
pub struct PgSessionStore {
    db: PgPool,
    ttl_minutes: i64,
}

impl PgSessionStore {
    pub fn new(db: PgPool, ttl_minutes: i64) -> Self {
        Self { db, ttl_minutes }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, data: &SessionData) -> anyhow::Result<String> {
        sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.db)
            .await?;

        let token = generate_token();
        let expires_at = OffsetDateTime::now_utc() + Duration::minutes(self.ttl_minutes);
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, full_name, email, role, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&token)
        .bind(data.user_id)
        .bind(&data.full_name)
        .bind(&data.email)
        .bind(data.role)
        .bind(expires_at)
        .execute(&self.db)
        .await?;
        Ok(token)
    }

    async fn get(&self, token: &str) -> anyhow::Result<Option<SessionData>> {
        let session = sqlx::query_as::<_, SessionData>(
            r#"
            SELECT user_id, full_name, email, role
            FROM sessions
            WHERE token = $1 AND expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;
        Ok(session)
    }

    async fn destroy(&self, token: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

pub fn session_cookie(name: &str, token: String) -> Cookie<'static> {
    Cookie::build((name.to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn removal_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/")
        .build()
}

/// Optional session for public endpoints: a missing cookie, an unknown
/// token or a store hiccup all read as "not logged in".
pub struct MaybeSession(pub Option<SessionData>);

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(&state.config.session.cookie_name) else {
            return Ok(MaybeSession(None));
        };

        match state.sessions.get(cookie.value()).await {
            Ok(session) => Ok(MaybeSession(session)),
            Err(e) => {
                warn!(error = %e, "session lookup failed, treating request as anonymous");
                Ok(MaybeSession(None))
            }
        }
    }
}

/// Admin guard: rejects with 403 before the handler runs any query.
#[derive(Debug)]
pub struct AdminSession(pub SessionData);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let forbidden = || ApiError::Forbidden("Accès refusé. Administrateur requis.".into());

        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar
            .get(&state.config.session.cookie_name)
            .ok_or_else(forbidden)?;

        let session = state
            .sessions
            .get(cookie.value())
            .await
            .map_err(|e| ApiError::internal("Une erreur interne est survenue.", e))?
            .ok_or_else(forbidden)?;

        if session.role != Role::Admin {
            warn!(user_id = session.user_id, "non-admin hit an admin endpoint");
            return Err(forbidden());
        }

        Ok(AdminSession(session))
    }
}
