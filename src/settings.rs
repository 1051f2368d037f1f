use crate::common::env::FromEnv;
use std::env;
use std::net::IpAddr;
use std::ops::Deref;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis,
}

impl StoreBackend {
    fn from_env(env_var: &str) -> anyhow::Result<Self> {
        match env::var(env_var).as_deref() {
            Ok("memory") | Err(env::VarError::NotPresent) => Ok(StoreBackend::Memory),
            Ok("redis") => Ok(StoreBackend::Redis),
            Ok(other) => anyhow::bail!("Unknown {env_var}: {other}"),
            Err(e) => Err(e.clone().into()),
        }
    }
}

pub struct AppSettings {
    pub app_component: String,
    pub level: Level,
    pub app_host: IpAddr,
    pub app_port: u16,

    pub store_backend: StoreBackend,
    pub event_buffer_size: usize,

    pub redis_url: Option<String>,
    pub redis_max_connections: usize,
    pub redis_connection_timeout: Duration,
    pub redis_response_timeout: Duration,
    pub redis_wait_timeout: Duration,

    pub transaction_max_attempts: u32,
    pub transaction_backoff: Duration,
}

impl AppSettings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();

        let app_component = env::var("APP_COMPONENT")?;
        let level = Level::from_env("LOG_LEVEL")?;
        let app_host = IpAddr::from_env("APP_HOST")?;
        let app_port = u16::from_env("APP_PORT")?;

        let store_backend = StoreBackend::from_env("STORE_BACKEND")?;
        let event_buffer_size = usize::from_env_or("EVENT_BUFFER_SIZE", 1024)?;

        let redis_url = env::var("REDIS_URL").ok();
        let redis_max_connections = usize::from_env_or("REDIS_MAX_CONNECTIONS", 16)?;
        let redis_connection_timeout_secs = u64::from_env_or("REDIS_CONNECTION_TIMEOUT_SECS", 5)?;
        let redis_connection_timeout = Duration::from_secs(redis_connection_timeout_secs);
        let redis_response_timeout_secs = u64::from_env_or("REDIS_RESPONSE_TIMEOUT_SECS", 5)?;
        let redis_response_timeout = Duration::from_secs(redis_response_timeout_secs);
        let redis_wait_timeout_secs = u64::from_env_or("REDIS_WAIT_TIMEOUT_SECS", 5)?;
        let redis_wait_timeout = Duration::from_secs(redis_wait_timeout_secs);

        let transaction_max_attempts = u32::from_env_or("TRANSACTION_MAX_ATTEMPTS", 5)?;
        let transaction_backoff_ms = u64::from_env_or("TRANSACTION_BACKOFF_MS", 25)?;
        let transaction_backoff = Duration::from_millis(transaction_backoff_ms);

        Ok(AppSettings {
            app_component,
            level,
            app_port,
            app_host,

            store_backend,
            event_buffer_size,

            redis_url,
            redis_max_connections,
            redis_connection_timeout,
            redis_response_timeout,
            redis_wait_timeout,

            transaction_max_attempts,
            transaction_backoff,
        })
    }

    pub fn get() -> &'static AppSettings {
        settings()
    }
}

pub fn settings() -> &'static AppSettings {
    static SETTINGS: LazyLock<AppSettings> =
        LazyLock::new(|| AppSettings::load_from_env().expect("Failed to load settings"));
    SETTINGS.deref()
}
