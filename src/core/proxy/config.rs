//! Selection configuration types and validation

use super::address::DEFAULT_PROXY_PORT;
use super::subnet::{is_valid_ipv4_range, is_valid_ipv6_range};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Proxy selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySelectorConfig {
    /// Whether the selector is enabled; disabled selectors answer the
    /// direct descriptor for every URI
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds a failed proxy endpoint is skipped before being retried
    #[serde(default = "default_retry_window_secs")]
    pub retry_window_secs: u64,

    /// Port applied when a PAC directive omits one
    #[serde(default = "default_proxy_port")]
    pub default_proxy_port: u16,

    /// Subnet-range literals for bypass/whitelist matching by outer
    /// layers; validated for shape here, never for membership
    #[serde(default)]
    pub bypass_ranges: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_retry_window_secs() -> u64 {
    600 // 10 minutes
}

fn default_proxy_port() -> u16 {
    DEFAULT_PROXY_PORT
}

impl Default for ProxySelectorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            retry_window_secs: default_retry_window_secs(),
            default_proxy_port: default_proxy_port(),
            bypass_ranges: Vec::new(),
        }
    }
}

impl ProxySelectorConfig {
    /// Get the retry window as a Duration
    pub fn retry_window(&self) -> Duration {
        Duration::from_secs(self.retry_window_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.retry_window_secs == 0 {
            anyhow::bail!("Retry window must be greater than 0 seconds");
        }
        if self.retry_window_secs > 86400 {
            anyhow::bail!("Retry window must not exceed 86400 seconds (1 day)");
        }
        if self.default_proxy_port == 0 {
            anyhow::bail!("Default proxy port must be between 1 and 65535");
        }
        for range in &self.bypass_ranges {
            if !is_valid_ipv4_range(range) && !is_valid_ipv6_range(range) {
                anyhow::bail!("Invalid bypass range literal: {}", range);
            }
        }
        Ok(())
    }
}
