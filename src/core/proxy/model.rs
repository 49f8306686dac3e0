//! Proxy descriptor types produced by PAC evaluation

use serde::{Deserialize, Serialize};

/// Proxy category of a single PAC directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    /// Fetch directly, no proxy
    Direct,
    /// HTTP proxy (covers the PROXY/HTTP/HTTPS directive keywords)
    Http,
    /// SOCKS proxy (covers SOCKS, SOCKS4, SOCKS5)
    Socks,
}

impl std::fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Http => write!(f, "http"),
            Self::Socks => write!(f, "socks"),
        }
    }
}

/// Logical proxy endpoint: a host and port, never DNS-resolved here
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// One proxy candidate within a chain
///
/// `Direct` carries no endpoint; the other kinds always do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProxyDescriptor {
    Direct,
    Http(Endpoint),
    Socks(Endpoint),
}

impl ProxyDescriptor {
    pub fn direct() -> Self {
        Self::Direct
    }

    pub fn http(endpoint: Endpoint) -> Self {
        Self::Http(endpoint)
    }

    pub fn socks(endpoint: Endpoint) -> Self {
        Self::Socks(endpoint)
    }

    pub fn kind(&self) -> ProxyKind {
        match self {
            Self::Direct => ProxyKind::Direct,
            Self::Http(_) => ProxyKind::Http,
            Self::Socks(_) => ProxyKind::Socks,
        }
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        match self {
            Self::Direct => None,
            Self::Http(endpoint) | Self::Socks(endpoint) => Some(endpoint),
        }
    }
}

impl std::fmt::Display for ProxyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Http(endpoint) => write!(f, "http {}", endpoint),
            Self::Socks(endpoint) => write!(f, "socks {}", endpoint),
        }
    }
}

/// Ordered proxy candidate list, preference order, built fresh per query
pub type ProxyChain = Vec<ProxyDescriptor>;

/// The "no proxy required" chain: a single direct descriptor
pub fn no_proxy_chain() -> ProxyChain {
    vec![ProxyDescriptor::Direct]
}
