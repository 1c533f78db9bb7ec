use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use stubby_telemetry::LogFormat;

pub const LISTEN_ADDR_ENV: &str = "STUBBY_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "STUBBY_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "STUBBY_STORAGE_BACKEND";
pub const DATABASE_URL_ENV: &str = "STUBBY_DATABASE_URL";
pub const CACHE_CAPACITY_ENV: &str = "STUBBY_CACHE_CAPACITY";
pub const CACHE_TTL_SECS_ENV: &str = "STUBBY_CACHE_TTL_SECS";
pub const MAX_ATTEMPTS_ENV: &str = "STUBBY_MAX_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "STUBBY_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "sqlite")]
    Sqlite,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "stubby", about = "URL shortener HTTP server")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public base URL that short codes are appended to.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    /// e.g. `sqlite://stubby.db`
    #[arg(long, env = DATABASE_URL_ENV, required_if_eq("storage", "sqlite"))]
    pub database_url: Option<String>,

    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = stubby_cache::DEFAULT_MAX_CAPACITY)]
    pub cache_capacity: u64,

    #[arg(long, env = CACHE_TTL_SECS_ENV)]
    pub cache_ttl_secs: Option<u64>,

    #[arg(long, env = MAX_ATTEMPTS_ENV, default_value_t = stubby_shortener::DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}
