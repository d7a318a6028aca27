use std::{path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;

/// Which `UserStore` implementation backs the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown user store backend {other:?}"),
        }
    }
}

/// Argon2 cost parameters.
#[derive(Debug, Clone)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub public_dir: PathBuf,
    pub signup_timeout: Duration,
    pub hash: HashConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Missing keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = HashConfig::default();
        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "APP_PORT", 3000)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost:5432/rencontre_repas".into()),
            store_backend: parse_or(&lookup, "USER_STORE", StoreBackend::Postgres)?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            signup_timeout: Duration::from_secs(parse_or(&lookup, "SIGNUP_TIMEOUT_SECS", 10)?),
            hash: HashConfig {
                memory_kib: parse_or(&lookup, "HASH_MEMORY_KIB", defaults.memory_kib)?,
                iterations: parse_or(&lookup, "HASH_ITERATIONS", defaults.iterations)?,
                parallelism: parse_or(&lookup, "HASH_PARALLELISM", defaults.parallelism)?,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid value {raw:?} for {key}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_original_constants() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.database_url, "postgres://localhost:5432/rencontre_repas");
        assert_eq!(cfg.store_backend, StoreBackend::Postgres);
        assert_eq!(cfg.public_dir, PathBuf::from("public"));
        assert_eq!(cfg.bind_addr(), "0.0.0.0:3000");
        assert_eq!(cfg.hash.memory_kib, argon2::Params::DEFAULT_M_COST);
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = config_from(&[
            ("APP_PORT", "8081"),
            ("USER_STORE", "Memory"),
            ("SIGNUP_TIMEOUT_SECS", "3"),
            ("HASH_ITERATIONS", "4"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.store_backend, StoreBackend::Memory);
        assert_eq!(cfg.signup_timeout, Duration::from_secs(3));
        assert_eq!(cfg.hash.iterations, 4);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = config_from(&[("APP_PORT", "not-a-port")]).unwrap_err();
        assert!(format!("{err:#}").contains("APP_PORT"));

        let err = config_from(&[("USER_STORE", "mongo")]).unwrap_err();
        assert!(format!("{err:#}").contains("USER_STORE"));
    }
}
