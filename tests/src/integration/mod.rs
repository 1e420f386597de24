//! Integration tests against the public API of `governance-registry`.

pub mod concurrency;
pub mod persistence;
pub mod scenarios;
