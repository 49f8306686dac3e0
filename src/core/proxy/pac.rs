//! PAC evaluation seam, result parsing, and the PAC-backed selector
//!
//! The evaluation engine is consumed as a narrow capability so any
//! scripting backend can be plugged in without touching the parser or
//! the fallback logic. Evaluation failures never reach `select` callers:
//! they are logged and converted to the no-proxy chain (fail-open).

use super::config::ProxySelectorConfig;
use super::errors::{EvaluationError, ProxyError};
use super::model::{no_proxy_chain, Endpoint, ProxyChain, ProxyDescriptor};
use super::{address, ProxySelector};
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

/// Capability consumed by [`PacProxySelector`]: evaluate the PAC policy
/// for a URL and return the raw directive string.
///
/// `Ok(None)` means the policy produced no directive for this URL.
pub trait PacEvaluationEngine: Send + Sync {
    fn evaluate(&self, url: &str, host: &str) -> Result<Option<String>, EvaluationError>;
}

/// Outcome of one PAC evaluation step
///
/// Keeps the fail-open conversion visible in a type instead of hiding it
/// in control flow: callers of `select` only ever see a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacEvaluation {
    /// The policy produced at least one directive
    Chain(ProxyChain),
    /// No policy, no result, or nothing but blanks
    Empty,
    /// The policy logic raised; recovered at this boundary
    Failed(EvaluationError),
}

/// Parse a raw PAC result string into an ordered proxy chain.
///
/// `None` yields an empty chain ("no proxy required"). Directives are
/// the `;`-separated non-blank pieces; each is whitespace-split, the
/// first token picks the proxy kind by case-insensitive prefix, and the
/// remaining tokens are concatenated without separators before endpoint
/// resolution (a historical quirk this parser preserves). A directive
/// with a malformed port is skipped; the rest of the chain survives.
pub fn parse_pac_result(raw: Option<&str>, default_port: u16) -> ProxyChain {
    let Some(raw) = raw else {
        return ProxyChain::new();
    };

    let mut chain = ProxyChain::new();
    for directive in raw.split(';') {
        let directive = directive.trim();
        if directive.is_empty() {
            continue;
        }
        match parse_directive(directive, default_port) {
            Ok(descriptor) => chain.push(descriptor),
            Err(err) => {
                tracing::warn!("Skipping malformed PAC directive {:?}: {}", directive, err);
            }
        }
    }
    chain
}

/// Build one descriptor from a single non-blank directive
fn parse_directive(directive: &str, default_port: u16) -> Result<ProxyDescriptor, ProxyError> {
    let mut tokens = directive.split_whitespace();
    let Some(type_token) = tokens.next() else {
        return Ok(ProxyDescriptor::direct());
    };

    let type_token = type_token.to_ascii_uppercase();
    if type_token.starts_with("DIRECT") {
        // Trailing tokens on a DIRECT directive are ignored
        return Ok(ProxyDescriptor::direct());
    }

    // Address tokens are joined without separating whitespace
    let address_token: String = tokens.collect();
    if address_token.is_empty() {
        // A proxy directive without an address degrades to direct
        return Ok(ProxyDescriptor::direct());
    }

    let endpoint = address::resolve_endpoint(&address_token, default_port)?;
    if type_token.starts_with("SOCKS") {
        // SOCKS, SOCKS4, SOCKS5
        Ok(ProxyDescriptor::socks(endpoint))
    } else {
        // PROXY, HTTP, HTTPS and anything unrecognized
        Ok(ProxyDescriptor::http(endpoint))
    }
}

/// Proxy selector backed by a PAC evaluation engine
///
/// Holds the engine (or nothing, when engine construction failed; every
/// query then degrades to the no-proxy chain for the lifetime of the
/// selector) and an instance-level enable switch. When disabled, `select`
/// returns the single direct descriptor without evaluating the policy.
pub struct PacProxySelector {
    engine: Option<Box<dyn PacEvaluationEngine>>,
    enabled: AtomicBool,
    default_port: u16,
}

impl PacProxySelector {
    /// Create a selector from an engine construction result.
    ///
    /// An `Err` is logged once and the selector stays permanently
    /// degraded, answering the no-proxy chain for every query.
    pub fn new(engine: Result<Box<dyn PacEvaluationEngine>, ProxyError>) -> Self {
        Self::with_config(engine, &ProxySelectorConfig::default())
    }

    /// Create a selector seeded from configuration (enable switch and
    /// default proxy port).
    pub fn with_config(
        engine: Result<Box<dyn PacEvaluationEngine>, ProxyError>,
        config: &ProxySelectorConfig,
    ) -> Self {
        let engine = match engine {
            Ok(engine) => Some(engine),
            Err(err) => {
                tracing::error!("PAC engine unavailable, selector degraded to no-proxy: {}", err);
                None
            }
        };

        Self {
            engine,
            enabled: AtomicBool::new(config.enabled),
            default_port: config.default_proxy_port,
        }
    }

    /// Enable or disable the selector. Disabled selectors answer the
    /// single direct descriptor for every URI.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Check if the selector is currently enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Run one evaluation step and classify its outcome
    pub fn evaluate(&self, uri: &Url) -> PacEvaluation {
        let Some(engine) = &self.engine else {
            return PacEvaluation::Empty;
        };

        let host = uri.host_str().unwrap_or("");
        match engine.evaluate(uri.as_str(), host) {
            Ok(Some(raw)) => {
                let chain = parse_pac_result(Some(&raw), self.default_port);
                if chain.is_empty() {
                    PacEvaluation::Empty
                } else {
                    PacEvaluation::Chain(chain)
                }
            }
            Ok(None) => PacEvaluation::Empty,
            Err(err) => PacEvaluation::Failed(err),
        }
    }
}

impl ProxySelector for PacProxySelector {
    fn select(&self, uri: &Url) -> ProxyChain {
        if !self.is_enabled() {
            return no_proxy_chain();
        }

        match self.evaluate(uri) {
            PacEvaluation::Chain(chain) => chain,
            PacEvaluation::Empty => no_proxy_chain(),
            PacEvaluation::Failed(err) => {
                tracing::error!(
                    "PAC evaluation error for {}: {}\n{}",
                    uri,
                    err.message,
                    err.script
                );
                no_proxy_chain()
            }
        }
    }

    fn connect_failed(&self, uri: &Url, endpoint: &Endpoint, cause: &ProxyError) {
        // Failure memory lives in the fallback wrapper
        tracing::debug!("Connect failure reported for {} via {}: {}", uri, endpoint, cause);
    }
}
