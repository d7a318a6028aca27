use anyhow::Context;
use tracing::{debug, warn};

use crate::{
    state::AppState,
    users::{
        dto::{SignupRequest, ValidSignup},
        error::SignupError,
        password::CredentialHasher,
        repo_types::{NewUserAccount, UserAccount},
    },
};

/// Registers one account: validate, check the email, hash, insert.
///
/// The pre-check only short-circuits the common case; two concurrent requests
/// for the same email can both pass it, and the store's `create` decides.
///
/// `signup_timeout` bounds the check and the hash only. Once `create` is
/// issued it runs to completion so a committed insert is never reported as
/// a failure; its wait is bounded by the pool's acquire timeout.
pub async fn register(state: &AppState, req: SignupRequest) -> Result<UserAccount, SignupError> {
    let ValidSignup {
        name,
        email,
        password,
        food_pref,
        hobby,
    } = req.validate()?;

    let prepare = async {
        if state.store.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(SignupError::DuplicateEmail);
        }
        hash_off_thread(&state.hasher, password).await
    };
    let password_hash = tokio::time::timeout(state.config.signup_timeout, prepare)
        .await
        .context("signup timed out")??;

    let account = state
        .store
        .create(NewUserAccount {
            name,
            email,
            password_hash,
            food_pref,
            hobby,
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "create user rejected");
            SignupError::from(e)
        })?;
    Ok(account)
}

async fn hash_off_thread(
    hasher: &CredentialHasher,
    password: String,
) -> Result<String, SignupError> {
    let hasher = hasher.clone();
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .context("hashing task failed")??;
    debug!("password hashed");
    Ok(hash)
}
