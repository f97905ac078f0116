//! Client configuration.
//!
//! Defaults match the purchasing backend's development setup. The binary
//! overlays environment variables on top; the composer itself never reads
//! the environment.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "https://localhost:7288/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Hubo un error al enviar la orden.";
pub const DEFAULT_SUBMIT_LABEL: &str = "Guardar Pedido";

pub const ENV_API_URL: &str = "MARKETDESK_API_URL";
pub const ENV_TIMEOUT_MS: &str = "MARKETDESK_TIMEOUT_MS";
pub const ENV_FALLBACK_MESSAGE: &str = "MARKETDESK_FALLBACK_MESSAGE";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
        .expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the purchasing API, without trailing slash.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Shown when a submission fails without a server-supplied message.
    pub fallback_error_message: String,
    /// Label of the submit action when it is not busy.
    pub submit_label: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fallback_error_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            submit_label: DEFAULT_SUBMIT_LABEL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Defaults overlaid with `MARKETDESK_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.base_url = expand_placeholders(&url, &lookup)?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = raw.trim().parse().map_err(|e| {
                ClientError::Config(format!("{ENV_TIMEOUT_MS} must be milliseconds: {e}"))
            })?;
        }

        if let Some(message) = lookup(ENV_FALLBACK_MESSAGE) {
            config.fallback_error_message = message;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::Config("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}

/// Expand `${VAR}` and `${VAR:-default}` using `lookup`.
pub fn expand_placeholders(
    input: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ClientError> {
    let mut result = String::with_capacity(input.len());
    let mut last = 0;

    for cap in PLACEHOLDER.captures_iter(input) {
        let Some(full) = cap.get(0) else { continue };
        let name = cap.get(1).map(|m| m.as_str()).unwrap_or_default();

        let value = match (lookup(name), cap.get(2)) {
            (Some(value), _) => value,
            (None, Some(default)) => default.as_str().to_string(),
            (None, None) => {
                return Err(ClientError::Config(format!(
                    "environment variable '{name}' not found"
                )));
            }
        };

        result.push_str(&input[last..full.start()]);
        result.push_str(&value);
        last = full.end();
    }

    result.push_str(&input[last..]);
    Ok(result)
}
