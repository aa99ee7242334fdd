use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Uniform success envelope returned by mutation endpoints.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Application error type. Every variant maps to one HTTP status and a
/// client-safe localized message; driver detail stays in the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: FieldErrors,
    },

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    /// 422 with a per-field error map.
    pub fn validation(errors: FieldErrors) -> Self {
        ApiError::Validation {
            message: "Certains champs sont invalides.".into(),
            errors,
        }
    }

    /// Wrap a persistence failure. A unique violation on the users email
    /// column is the one conflict the schema can produce; everything else
    /// becomes a generic 500 carrying the given localized message.
    pub fn database(message: impl Into<String>, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return ApiError::Conflict("Cette adresse email est déjà utilisée.".into());
            }
        }
        ApiError::Internal {
            message: message.into(),
            source: err.into(),
        }
    }

    pub fn internal(message: impl Into<String>, source: anyhow::Error) -> Self {
        ApiError::Internal {
            message: message.into(),
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Validation { message, errors } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, Some(errors))
            }
            ApiError::Unprocessable(message) => (StatusCode::UNPROCESSABLE_ENTITY, message, None),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, message, None),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message, None),
            ApiError::MethodNotAllowed(message) => (StatusCode::METHOD_NOT_ALLOWED, message, None),
            ApiError::Internal { message, source } => {
                tracing::error!(error = %source, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message, None)
            }
        };

        let body = match errors {
            Some(errors) => json!({ "success": false, "message": message, "errors": errors }),
            None => json!({ "success": false, "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

// Method-not-allowed fallbacks wired onto each route's MethodRouter.

pub async fn post_only() -> ApiError {
    ApiError::MethodNotAllowed("Méthode HTTP non autorisée. Utilisez POST.".into())
}

pub async fn get_only() -> ApiError {
    ApiError::MethodNotAllowed("Méthode HTTP non autorisée. Utilisez GET.".into())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Méthode HTTP non autorisée.".into())
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    /// Driver error reporting a unique violation, as Postgres would for the
    /// users email constraint.
    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint \"users_email_key\"")
        }
    }

    impl StdError for UniqueViolation {}

    impl DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_email_key\""
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn validation_error_maps_to_422_with_field_map() {
        let mut errors = FieldErrors::default();
        errors.insert("email", "L'adresse email n'est pas valide.");
        let response = ApiError::validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn unique_violations_map_to_conflict() {
        let err = ApiError::database(
            "Une erreur interne est survenue lors de l'inscription.",
            sqlx::Error::Database(Box::new(UniqueViolation)),
        );
        match &err {
            ApiError::Conflict(message) => {
                assert_eq!(message, "Cette adresse email est déjà utilisée.")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn plain_sqlx_errors_stay_internal() {
        // Only a driver-reported unique violation becomes a 409.
        let err = ApiError::database("Une erreur interne est survenue.", sqlx::Error::RowNotFound);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn status_mapping_covers_the_taxonomy() {
        let cases = [
            (
                ApiError::BadRequest("Action invalide.".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Unauthorized("Identifiants incorrects.".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Forbidden("Accès refusé. Administrateur requis.".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::Conflict("Cette adresse email est déjà utilisée.".into()),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::MethodNotAllowed("Méthode HTTP non autorisée.".into()),
                StatusCode::METHOD_NOT_ALLOWED,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
