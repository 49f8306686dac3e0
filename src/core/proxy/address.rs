//! Endpoint token resolution for PAC directive addresses

use super::errors::ProxyError;
use super::model::Endpoint;

/// Port applied when a directive address omits one
pub const DEFAULT_PROXY_PORT: u16 = 80;

/// Resolve a `host`, `host:port`, `[ipv6]` or `[ipv6]:port` token into a
/// logical endpoint. No DNS lookup is performed.
///
/// The split point is the last `:` of the token, but only when it comes
/// after the last `]`; otherwise the colon belongs to a bracketed IPv6
/// literal and the whole token is the host with the default port.
/// A non-numeric port suffix is a hard error for the token.
pub fn resolve_endpoint(token: &str, default_port: u16) -> Result<Endpoint, ProxyError> {
    let token = token.trim();

    let port_separator = token.rfind(':');
    let bracket_end = token.rfind(']');

    match port_separator {
        Some(separator) if bracket_end.map_or(true, |end| end < separator) => {
            // such as 10.0.0.1:8080 or [2001:db8::1]:3128
            let host = token[..separator].trim();
            let port = token[separator + 1..]
                .trim()
                .parse::<u16>()
                .map_err(|_| ProxyError::malformed_port(token))?;
            Ok(Endpoint::new(host, port))
        }
        // such as [2001:db8::1] where the last colon is part of the
        // address, or a bare host with no port at all
        _ => Ok(Endpoint::new(token, default_port)),
    }
}
