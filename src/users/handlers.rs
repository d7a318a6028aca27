use axum::{extract::State, http::StatusCode, routing::post, Router};
use tracing::{info, instrument};

use crate::{
    state::AppState,
    users::{error::SignupError, extractors::SignupBody, services},
};

pub const SIGNUP_OK: &str = "Signup successful.";

pub fn signup_routes() -> Router<AppState> {
    Router::new().route("/signup", post(signup))
}

#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    SignupBody(body): SignupBody,
) -> Result<(StatusCode, &'static str), SignupError> {
    let user = services::register(&state, body).await?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, SIGNUP_OK))
}
