//! # Adapters Layer (Outer Hexagon)
//!
//! Adapters connect the registry to storage and key material.
//!
//! - Adapters implement domain ports
//! - The domain never depends on an adapter

pub mod keygen;
pub mod snapshot_store;

pub use keygen::*;
pub use snapshot_store::*;
