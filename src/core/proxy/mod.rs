//! Proxy selection core: PAC result parsing with failure-aware fallback
//!
//! This module provides:
//! - Proxy descriptor types produced per query
//! - PAC directive parsing and the evaluation-engine seam
//! - Endpoint token resolution and subnet-range literal validation
//! - A fallback selector that temporarily skips recently failed proxies

pub mod address;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod model;
pub mod pac;
pub mod subnet;

pub use address::{resolve_endpoint, DEFAULT_PROXY_PORT};
pub use config::ProxySelectorConfig;
pub use errors::{EvaluationError, ProxyError};
pub use fallback::FallbackProxySelector;
pub use model::{no_proxy_chain, Endpoint, ProxyChain, ProxyDescriptor, ProxyKind};
pub use pac::{parse_pac_result, PacEvaluation, PacEvaluationEngine, PacProxySelector};
pub use subnet::{is_valid_ipv4_range, is_valid_ipv6_range};

use url::Url;

/// Trait for proxy selectors
///
/// A selector answers, for a target URI, which proxies the caller should
/// try and in what order. Callers report connection failures back so a
/// wrapping selector can exclude unresponsive proxies for a while.
pub trait ProxySelector: Send + Sync {
    /// Produce the ordered proxy candidate list for the given URI
    fn select(&self, uri: &Url) -> ProxyChain;

    /// Report that connecting through `endpoint` failed while fetching `uri`
    ///
    /// Never fails. The URI and cause are diagnostic only.
    fn connect_failed(&self, uri: &Url, endpoint: &Endpoint, cause: &ProxyError);
}
