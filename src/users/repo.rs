use std::collections::{hash_map::Entry, HashMap};

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::repo_types::{NewUserAccount, StoreError, UserAccount};

/// Persistence contract for user accounts.
///
/// `create` must reject a duplicate email atomically: callers rely on it as
/// the only guard against two concurrent signups for the same address.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError>;

    async fn create(&self, account: NewUserAccount) -> Result<UserAccount, StoreError>;

    async fn close(&self) {}
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let user = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, name, email, password_hash, food_pref, hobby, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Uniqueness comes from the `users_email_key` constraint.
    async fn create(&self, account: NewUserAccount) -> Result<UserAccount, StoreError> {
        let user = sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO users (name, email, password_hash, food_pref, hobby)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, food_pref, hobby, created_at
            "#,
        )
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.food_pref)
        .bind(&account.hobby)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// In-process store keyed by email.
#[derive(Default)]
pub struct MemoryUserStore {
    accounts: RwLock<HashMap<String, UserAccount>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn create(&self, account: NewUserAccount) -> Result<UserAccount, StoreError> {
        let mut accounts = self.accounts.write().await;
        match accounts.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let created = account.into_account(Uuid::new_v4(), OffsetDateTime::now_utc());
                Ok(slot.insert(created).clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_account(email: &str, name: &str) -> NewUserAccount {
        NewUserAccount {
            name: name.into(),
            email: email.into(),
            password_hash: "hash".into(),
            food_pref: "sushi".into(),
            hobby: "chess".into(),
        }
    }

    #[tokio::test]
    async fn create_then_find() {
        let store = MemoryUserStore::new();
        let created = store.create(new_account("a@x.com", "Ana")).await.unwrap();

        let found = store.find_by_email("a@x.com").await.unwrap().expect("present");
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Ana");
        assert!(store.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_original_kept() {
        let store = MemoryUserStore::new();
        store.create(new_account("a@x.com", "Ana")).await.unwrap();

        let err = store.create(new_account("a@x.com", "Bob")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        let kept = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(kept.name, "Ana");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let store = MemoryUserStore::new();
        store.create(new_account("a@x.com", "Ana")).await.unwrap();
        store.create(new_account("A@x.com", "Ana")).await.unwrap();
        assert!(store.find_by_email("A@X.COM").await.unwrap().is_none());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_creates_admit_one() {
        let store = Arc::new(MemoryUserStore::new());
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.create(new_account("race@x.com", &format!("user{i}"))).await
                })
            })
            .collect();

        let mut ok = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.len().await, 1);
    }
}
