//! Integration tests

mod common;
mod e2e_test;
mod market_test;
mod proxy_test;
