use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};
use crate::db;
use crate::users::{
    password::CredentialHasher,
    repo::{MemoryUserStore, PgUserStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub hasher: CredentialHasher,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let hasher = CredentialHasher::new(&config.hash)?;

        let store = match config.store_backend {
            StoreBackend::Postgres => {
                let pool = db::connect_lazy(&config)?;
                db::migrate(&pool).await;
                Arc::new(PgUserStore::new(pool)) as Arc<dyn UserStore>
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory user store; accounts are lost on restart");
                Arc::new(MemoryUserStore::new()) as Arc<dyn UserStore>
            }
        };

        Ok(Self::from_parts(store, hasher, config))
    }

    pub fn from_parts(
        store: Arc<dyn UserStore>,
        hasher: CredentialHasher,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            hasher,
            config,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let mut config = AppConfig::from_lookup(|_| None).expect("default config");
        config.store_backend = StoreBackend::Memory;
        config.public_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("public");

        Self::from_parts(
            Arc::new(MemoryUserStore::new()),
            crate::users::password::cheap_hasher(),
            Arc::new(config),
        )
    }

    #[cfg(test)]
    pub fn with_store(self, store: Arc<dyn UserStore>) -> Self {
        Self { store, ..self }
    }
}
