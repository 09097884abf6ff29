//! Base-address resolution and client configuration.
//!
//! Resolution order: an explicitly configured endpoint wins; otherwise
//! requests go through a reverse-proxy gateway origin under `/api`;
//! in development the well-known local backend address is used.

use std::time::Duration;

/// Development fallback when nothing is configured.
pub const DEV_LOOPBACK: &str = "http://127.0.0.1:8000";

/// Resolved base address of the backend gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    /// Resolves the base address from an optional explicit endpoint and
    /// an optional reverse-proxy origin.
    ///
    /// Note that endpoint paths already carry their own `/api` prefix,
    /// so an explicit endpoint and the dev fallback are bare origins,
    /// while a proxy origin is used as-is and the proxy rewrites `/api`.
    pub fn resolve(explicit: Option<&str>, proxy_origin: Option<&str>) -> Self {
        let base = match (explicit, proxy_origin) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, Some(origin)) => origin.trim_end_matches('/').to_string(),
            (None, None) => DEV_LOOPBACK.to_string(),
        };
        Self { base }
    }

    /// An endpoint pointing directly at the given origin.
    pub fn explicit(url: &str) -> Self {
        Self::resolve(Some(url), None)
    }

    /// The full URL for an absolute endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

/// Connection settings for [`GatewayClient`](crate::GatewayClient).
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub endpoint: Endpoint,
    /// Per-request timeout; `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl GatewayConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
