//! Command-line flags and environment, resolved into one config.

use std::time::Duration;

use anyhow::{bail, Context, Result};

use chainweb3_http::HttpProviderConfig;

/// Endpoint used when neither `--url` nor the env var is set.
pub const DEFAULT_URL: &str = "localhost:8545";
pub const URL_ENV: &str = "CHAINWEB3_RPC_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub url: String,
    pub timeout: Option<Duration>,
}

impl CliConfig {
    /// `--url` wins over `env_url`, which wins over [`DEFAULT_URL`].
    pub fn resolve(args: &[String], env_url: Option<String>) -> Result<Self> {
        let url = parse_flag(args, "--url")
            .or(env_url.filter(|u| !u.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_URL.to_string());

        let timeout = match parse_flag(args, "--timeout-ms") {
            Some(raw) => {
                let ms: u64 = raw
                    .parse()
                    .with_context(|| format!("--timeout-ms expects milliseconds, got {raw:?}"))?;
                if ms == 0 {
                    bail!("--timeout-ms must be positive");
                }
                Some(Duration::from_millis(ms))
            }
            None => None,
        };

        Ok(Self { url, timeout })
    }

    pub fn provider_config(&self) -> HttpProviderConfig {
        let mut config = HttpProviderConfig::default();
        if let Some(timeout) = self.timeout {
            config.request_timeout = timeout;
        }
        config
    }
}

/// Value following `flag`, if both are present.
pub fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}
