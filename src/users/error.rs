use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::users::{password::HashError, repo_types::StoreError};

pub const FIELDS_REQUIRED: &str = "All fields are required.";
pub const EMAIL_TAKEN: &str = "This email is already in use.";
pub const SIGNUP_FAILED: &str = "Signup failed.";

/// Outcome of a rejected signup attempt.
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("all fields are required")]
    Validation,
    #[error("email already in use")]
    DuplicateEmail,
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for SignupError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => SignupError::DuplicateEmail,
            other => SignupError::Internal(other.into()),
        }
    }
}

impl From<HashError> for SignupError {
    fn from(e: HashError) -> Self {
        SignupError::Internal(e.into())
    }
}

impl IntoResponse for SignupError {
    fn into_response(self) -> Response {
        match self {
            SignupError::Validation => (StatusCode::BAD_REQUEST, FIELDS_REQUIRED).into_response(),
            SignupError::DuplicateEmail => (StatusCode::BAD_REQUEST, EMAIL_TAKEN).into_response(),
            SignupError::Internal(e) => {
                error!(error = ?e, "signup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, SIGNUP_FAILED).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(
            SignupError::Validation.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SignupError::DuplicateEmail.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SignupError::Internal(anyhow::anyhow!("db exploded")).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn late_duplicate_from_store_is_a_duplicate_email() {
        let err = SignupError::from(StoreError::DuplicateEmail);
        assert!(matches!(err, SignupError::DuplicateEmail));

        let err = SignupError::from(StoreError::Unavailable(sqlx::Error::PoolClosed));
        assert!(matches!(err, SignupError::Internal(_)));
    }
}
