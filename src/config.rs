use anyhow::{anyhow, Context};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const WEBHOOK_ENV: &str = "GOOGLE_APPS_SCRIPT_WEBHOOK";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_WEBHOOK_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub public_dir: PathBuf,
    pub webhook: Option<String>,
    pub webhook_timeout: Duration,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let val = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = match val("HOST") {
            Some(v) => v.parse().with_context(|| format!("HOST is not an IP address: {v}"))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };
        let port = match val("PORT") {
            Some(v) => v.parse().with_context(|| format!("PORT is not a valid port: {v}"))?,
            None => DEFAULT_PORT,
        };
        let timeout_ms = match val("OBSERVD_WEBHOOK_TIMEOUT_MS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|ms| (100..=120_000).contains(ms))
                .ok_or_else(|| {
                    anyhow!("OBSERVD_WEBHOOK_TIMEOUT_MS must be an integer in 100..=120000: {v}")
                })?,
            None => DEFAULT_WEBHOOK_TIMEOUT_MS,
        };
        let log_json = matches!(
            val("OBSERVD_LOG_JSON")
                .map(|v| v.to_ascii_lowercase())
                .as_deref(),
            Some("1" | "true" | "yes" | "on")
        );

        Ok(Self {
            host,
            port,
            data_dir: PathBuf::from(val("OBSERVD_DATA_DIR").unwrap_or_else(|| "data".into())),
            public_dir: PathBuf::from(val("OBSERVD_PUBLIC_DIR").unwrap_or_else(|| "public".into())),
            webhook: val(WEBHOOK_ENV),
            webhook_timeout: Duration::from_millis(timeout_ms),
            log_json,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
