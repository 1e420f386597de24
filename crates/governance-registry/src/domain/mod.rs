//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for the governance registry.
//! NO I/O, NO async, NO locking.
//!
//! - This is the **inner layer** of the hexagonal architecture.
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).

pub mod entities;
pub mod invariants;
pub mod registry;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use registry::*;
pub use services::*;
pub use value_objects::*;
