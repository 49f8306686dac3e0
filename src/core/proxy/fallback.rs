//! Failure-aware fallback selection
//!
//! Wraps any delegate selector and temporarily removes candidates whose
//! endpoint recently failed, so callers move on to later candidates or a
//! direct connection instead of re-trying a dead proxy on every query.

use super::config::ProxySelectorConfig;
use super::model::{no_proxy_chain, Endpoint, ProxyChain};
use super::{errors::ProxyError, ProxySelector};
use dashmap::DashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use url::Url;

/// Exclusion window applied to a failed endpoint before it is retried
pub const DEFAULT_RETRY_WINDOW: Duration = Duration::from_secs(10 * 60);

/// Selector decorator with failure memory
///
/// `select` filters the delegate's chain against the failure store;
/// `connect_failed` feeds the store. Records expire lazily once the
/// retry window has elapsed since the last reported failure; there is
/// no background sweeper, stale entries are dropped when a selection
/// touches them.
///
/// Safe for concurrent use from many threads. The store is sharded per
/// key, and the retry window lives behind its own lock.
pub struct FallbackProxySelector {
    delegate: Box<dyn ProxySelector>,
    failed: DashMap<Endpoint, Instant>,
    retry_window: RwLock<Duration>,
}

impl FallbackProxySelector {
    /// Wrap a delegate with the default retry window
    pub fn new(delegate: Box<dyn ProxySelector>) -> Self {
        Self::with_retry_window(delegate, DEFAULT_RETRY_WINDOW)
    }

    /// Wrap a delegate with an explicit retry window
    pub fn with_retry_window(delegate: Box<dyn ProxySelector>, retry_window: Duration) -> Self {
        Self {
            delegate,
            failed: DashMap::new(),
            retry_window: RwLock::new(retry_window),
        }
    }

    /// Wrap a delegate, taking the retry window from configuration
    pub fn with_config(delegate: Box<dyn ProxySelector>, config: &ProxySelectorConfig) -> Self {
        Self::with_retry_window(delegate, config.retry_window())
    }

    /// Change the retry window. Not retroactive: exclusion is recomputed
    /// against the new window on the next `select` call.
    pub fn set_retry_window(&self, retry_window: Duration) {
        *self.retry_window.write().unwrap() = retry_window;
    }

    /// The currently configured retry window
    pub fn retry_window(&self) -> Duration {
        *self.retry_window.read().unwrap()
    }

    /// Number of endpoints currently carrying a failure record,
    /// expired or not. Diagnostic only.
    pub fn tracked_failures(&self) -> usize {
        self.failed.len()
    }

    /// Check whether an endpoint is under a live exclusion, dropping the
    /// record if it has expired
    fn has_live_failure(&self, endpoint: &Endpoint, retry_window: Duration) -> bool {
        self.failed
            .remove_if(endpoint, |_, failed_at| failed_at.elapsed() >= retry_window);
        self.failed.contains_key(endpoint)
    }
}

impl ProxySelector for FallbackProxySelector {
    fn select(&self, uri: &Url) -> ProxyChain {
        let retry_window = self.retry_window();
        let chain = self.delegate.select(uri);

        let filtered: ProxyChain = chain
            .into_iter()
            .filter(|descriptor| match descriptor.endpoint() {
                Some(endpoint) => !self.has_live_failure(endpoint, retry_window),
                // Direct candidates are never excluded
                None => true,
            })
            .collect();

        if filtered.is_empty() {
            tracing::debug!("All proxy candidates excluded for {}, using direct", uri);
            return no_proxy_chain();
        }
        filtered
    }

    fn connect_failed(&self, uri: &Url, endpoint: &Endpoint, cause: &ProxyError) {
        tracing::warn!("Proxy {} failed for {}: {}", endpoint, uri, cause);
        // Repeated failures simply refresh the timestamp, extending the
        // exclusion window from this point
        self.failed.insert(endpoint.clone(), Instant::now());
    }
}
