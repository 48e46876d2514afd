//! kalshi-gateway: signing reverse proxy for the Kalshi trading API
//!
//! This library provides the core components for:
//! - RSA private key import (PKCS#1 or PKCS#8 PEM)
//! - RSA-PSS request signing and `KALSHI-ACCESS-*` headers
//! - A CORS-enabled proxy that signs and relays browser requests
//! - Market normalization (cents to decimal prices, derived fields)
//! - Trending / ending-soon / hot market rankings
//! - Logging and Prometheus metrics

pub mod auth;
pub mod cli;
pub mod config;
pub mod market;
pub mod proxy;
pub mod telemetry;
