use std::env;
use std::net::SocketAddr;

use eyre::{WrapErr, bail};

/// Where documents live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    S3,
    /// In-process only; contents are lost on exit.
    Memory,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bucket: String,
    pub store: StoreBackend,
    /// Serve on this address instead of the Lambda runtime.
    pub local_addr: Option<SocketAddr>,
}

impl AppConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let bucket = lookup("GERIA_BUCKET")
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "geria".to_string());

        let store = match lookup("GERIA_STORE").as_deref() {
            None | Some("") | Some("s3") => StoreBackend::S3,
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("GERIA_STORE must be \"s3\" or \"memory\", got {other:?}"),
        };

        let local_addr = lookup("GERIA_LOCAL_ADDR")
            .filter(|a| !a.is_empty())
            .map(|a| {
                a.parse::<SocketAddr>()
                    .wrap_err_with(|| format!("invalid GERIA_LOCAL_ADDR {a:?}"))
            })
            .transpose()?;

        Ok(Self {
            bucket,
            store,
            local_addr,
        })
    }
}
