//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Only the credential endpoints (`POST /LogIn`, `POST /SignUp`) are
//! limited; browsing is not.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor keyed on the client IP.
///
/// `X-Forwarded-For` and `X-Real-IP` are only read when `trust_proxy` is
/// set; otherwise any client could pick its own bucket. Requests with no
/// usable address (in-process tests) share a single bucket.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy: bool,
}

impl ClientIpKeyExtractor {
    fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
        let headers = req.headers();

        // X-Forwarded-For: first IP in the chain
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            })
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy
            && let Some(ip) = Self::forwarded_ip(req)
        {
            return Ok(ip);
        }

        if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            return Ok(addr.ip());
        }

        Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for sign-in and sign-up: ~10 requests per minute per IP.
///
/// `trust_proxy` decides whether forwarded-IP headers key the bucket.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(6)` and `burst_size(5)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter(trust_proxy: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor { trust_proxy })
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    const TRUSTING: ClientIpKeyExtractor = ClientIpKeyExtractor { trust_proxy: true };
    const DIRECT: ClientIpKeyExtractor = ClientIpKeyExtractor { trust_proxy: false };

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn from_peer(peer: &str, forwarded: &str) -> Request<()> {
        let mut req = Request::builder()
            .header("x-forwarded-for", forwarded)
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::new(ip(peer), 40000)));
        req
    }

    #[test]
    fn test_trusted_proxy_uses_forwarded_for() {
        let req = from_peer("10.0.0.1", "203.0.113.7, 10.0.0.1");
        assert_eq!(TRUSTING.extract(&req).unwrap(), ip("203.0.113.7"));
    }

    #[test]
    fn test_trusted_proxy_falls_back_to_real_ip() {
        let req = Request::builder()
            .header("x-real-ip", "198.51.100.4")
            .body(())
            .unwrap();
        assert_eq!(TRUSTING.extract(&req).unwrap(), ip("198.51.100.4"));
    }

    #[test]
    fn test_spoofed_forwarded_for_is_ignored_without_proxy() {
        let req = from_peer("192.0.2.10", "203.0.113.7");
        assert_eq!(DIRECT.extract(&req).unwrap(), ip("192.0.2.10"));
    }

    #[test]
    fn test_falls_back_to_shared_bucket() {
        let req = Request::builder().body(()).unwrap();
        assert_eq!(
            DIRECT.extract(&req).unwrap(),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }
}
