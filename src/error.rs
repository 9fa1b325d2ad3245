use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Unknown or non-matching credential. Also covers "unauthorized": callers
    /// cannot tell which field was wrong.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("At least 2 participants are required for a draw (have {count})")]
    InsufficientParticipants { count: usize },

    #[error("No valid draw found after {attempts} attempts")]
    DrawExhausted { attempts: u32 },

    #[error("Duplicate credential: {0}")]
    DuplicateCredential(String),

    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// The single error used for every credential miss.
    pub fn credential_miss() -> Self {
        AppError::NotFound("Not found".to_string())
    }

    /// True when the caller should fix its input and resubmit; false for
    /// server-side problems.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_)
                | AppError::NotFound(_)
                | AppError::InsufficientParticipants { .. }
                | AppError::DuplicateCredential(_)
                | AppError::DuplicateRegistration(_)
        )
    }

    /// Translate a unique-index violation into the matching duplicate error.
    /// `on_unique` receives the violated constraint message.
    pub fn from_insert_error(err: DbErr, on_unique: impl FnOnce(&str) -> AppError) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => on_unique(&msg),
            _ => AppError::DatabaseError(err),
        }
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InsufficientParticipants { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INSUFFICIENT_PARTICIPANTS",
                self.to_string(),
            ),
            AppError::DrawExhausted { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DRAW_EXHAUSTED",
                "Draw could not be completed".to_string(),
            ),
            AppError::DuplicateCredential(msg) => {
                (StatusCode::CONFLICT, "DUPLICATE_CREDENTIAL", msg.clone())
            }
            AppError::DuplicateRegistration(msg) => {
                (StatusCode::CONFLICT, "DUPLICATE_REGISTRATION", msg.clone())
            }
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Database error".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.parts();

        match self {
            AppError::ValidationError(msg) => log::warn!("Validation error: {msg}"),
            AppError::NotFound(_) => log::debug!("Lookup miss"),
            AppError::DuplicateCredential(_)
            | AppError::DuplicateRegistration(_)
            | AppError::InsufficientParticipants { .. } => log::warn!("{self}"),
            AppError::DatabaseError(err) => log::error!("Database error: {err}"),
            _ => log::error!("Internal error: {self}"),
        }

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_client_vs_server_classification() {
        assert!(AppError::ValidationError("x".into()).is_client_error());
        assert!(AppError::credential_miss().is_client_error());
        assert!(AppError::InsufficientParticipants { count: 1 }.is_client_error());
        assert!(AppError::DuplicateCredential("pin".into()).is_client_error());
        assert!(AppError::DuplicateRegistration("email".into()).is_client_error());
        assert!(!AppError::DrawExhausted { attempts: 1000 }.is_client_error());
        assert!(!AppError::DatabaseError(DbErr::Custom("boom".into())).is_client_error());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InsufficientParticipants { count: 0 }.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::DrawExhausted { attempts: 3 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::DuplicateCredential("pin".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::credential_miss().status_code(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_error_body_envelope() {
        let resp = AppError::DuplicateRegistration("Email already registered".into())
            .error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "DUPLICATE_REGISTRATION");
        assert_eq!(v["error"]["message"], "Email already registered");
    }

    #[test]
    fn test_non_unique_db_error_passes_through() {
        let err = AppError::from_insert_error(DbErr::Custom("boom".into()), |_| {
            AppError::DuplicateCredential("unreachable".into())
        });
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
