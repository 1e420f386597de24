//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the governance registry.
//!
//! - **Driving Ports (Inbound)**: `GovernanceRegistryApi`, `AuditTrail`
//! - **Driven Ports (Outbound)**: `SnapshotStore`, `KeyGenerator`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
