//! Typed HTTP client for the policy-drafting backend gateway.
//!
//! Every call goes through one [`GatewayClient`] over a resolved
//! [`Endpoint`](config::Endpoint) and fails with one normalized
//! [`ApiError`]. The client also implements the core
//! [`ChatBackend`](polidraft_core::chat::ChatBackend) trait so the
//! session manager can dispatch to it directly.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::GatewayClient;
pub use config::{Endpoint, GatewayConfig, DEV_LOOPBACK};
pub use error::ApiError;
