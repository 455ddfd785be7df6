use std::env;
use std::str::FromStr;

use eyre::{WrapErr, bail};

use aura_storage::entity::StoreLimits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    S3,
    Memory,
}

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub storage: StorageKind,
    pub bucket: String,
    pub region: String,
    /// Bedrock model id. `None` disables the generative assistant.
    pub model_id: Option<String>,
    /// Serve over plain HTTP on this address instead of running under Lambda.
    pub listen_addr: Option<String>,
    pub limits: StoreLimits,
    pub max_upload_bytes: usize,
}

impl ApiConfig {
    pub fn from_env() -> eyre::Result<Self> {
        let storage = match env::var("AURA_STORAGE").as_deref() {
            Err(_) | Ok("s3") => StorageKind::S3,
            Ok("memory") => StorageKind::Memory,
            Ok(other) => bail!("AURA_STORAGE must be `s3` or `memory`, got `{other}`"),
        };

        let defaults = StoreLimits::default();
        let limits = StoreLimits {
            max_page_size: parse_var("AURA_MAX_PAGE_SIZE", defaults.max_page_size)?,
            seed_concurrency: parse_var("AURA_SEED_CONCURRENCY", defaults.seed_concurrency)?,
            max_mutate_attempts: parse_var("AURA_MAX_MUTATE_ATTEMPTS", defaults.max_mutate_attempts)?,
        };
        check_limits(&limits)?;

        Ok(Self {
            storage,
            bucket: env::var("AURA_BUCKET").unwrap_or_else(|_| "aura".to_string()),
            region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            model_id: non_empty_var("AURA_MODEL_ID"),
            listen_addr: non_empty_var("AURA_LISTEN_ADDR"),
            limits,
            max_upload_bytes: parse_var("AURA_MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

/// Upper bound on per-request storage fan-out.
pub const MAX_FANOUT: usize = 50;

/// Reject limits that would exceed the platform's per-request sub-operation
/// ceiling or disable work entirely.
pub fn check_limits(limits: &StoreLimits) -> eyre::Result<()> {
    for (name, value) in [
        ("AURA_MAX_PAGE_SIZE", limits.max_page_size),
        ("AURA_SEED_CONCURRENCY", limits.seed_concurrency),
    ] {
        if value == 0 || value > MAX_FANOUT {
            bail!("{name} must be between 1 and {MAX_FANOUT}, got {value}");
        }
    }
    if limits.max_mutate_attempts == 0 {
        bail!("AURA_MAX_MUTATE_ATTEMPTS must be at least 1");
    }
    Ok(())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("invalid value for {name}: `{raw}`")),
        None => Ok(default),
    }
}
