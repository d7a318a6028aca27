use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use tracing::warn;

use crate::users::{dto::SignupRequest, error::SignupError};

/// Reads a `SignupRequest` from a JSON or urlencoded body.
///
/// An unreadable body is treated as one with no fields.
pub struct SignupBody(pub SignupRequest);

#[async_trait]
impl<S> FromRequest<S> for SignupBody
where
    S: Send + Sync,
{
    type Rejection = SignupError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("application/json"))
            .unwrap_or(false);

        let body = if is_json {
            Json::<SignupRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|e| {
                    warn!(error = %e, "unreadable json signup body");
                    SignupError::Validation
                })?
        } else {
            Form::<SignupRequest>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|e| {
                    warn!(error = %e, "unreadable form signup body");
                    SignupError::Validation
                })?
        };
        Ok(SignupBody(body))
    }
}
