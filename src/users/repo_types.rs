use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the store.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserAccount {
    pub id: Uuid,                   // assigned by the store
    pub name: String,
    pub email: String,              // unique, compared exactly
    #[serde(skip_serializing)]
    #[allow(dead_code)] // read only by `CredentialHasher::verify`
    pub password_hash: String,      // Argon2 PHC string, never plaintext
    pub food_pref: String,
    pub hobby: String,
    pub created_at: OffsetDateTime, // creation timestamp
}

/// Fields supplied by the caller when creating a record.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub food_pref: String,
    pub hobby: String,
}

impl NewUserAccount {
    pub(crate) fn into_account(self, id: Uuid, created_at: OffsetDateTime) -> UserAccount {
        UserAccount {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            food_pref: self.food_pref,
            hobby: self.hobby,
            created_at,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("user store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::DuplicateEmail
            }
            other => StoreError::Unavailable(other),
        }
    }
}
