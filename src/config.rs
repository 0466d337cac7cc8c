use std::time::Duration;

use anyhow::{bail, Context};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3001";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub store_timeout: Duration,
    /// Refresh cached video scores whenever their channel is saved.
    pub recompute_on_channel_update: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => bail!("Unknown STORE_BACKEND: {}", other),
        };

        let database_url = lookup("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND is postgres");
        }

        let store_timeout = match lookup("STORE_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("Invalid STORE_TIMEOUT_MS: {}", raw))?,
            None => DEFAULT_STORE_TIMEOUT_MS,
        };

        let recompute_on_channel_update = lookup("RECOMPUTE_ON_CHANNEL_UPDATE")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            store_backend,
            database_url,
            store_timeout: Duration::from_millis(store_timeout),
            recompute_on_channel_update,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            store_backend: StoreBackend::Memory,
            database_url: None,
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            recompute_on_channel_update: false,
        }
    }
}
