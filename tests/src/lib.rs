//! # Governance Registry Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scenarios.rs     # Literal scenarios and registry properties
//!     ├── concurrency.rs   # Many tasks writing and reading one service
//!     └── persistence.rs   # Snapshot files, restore, crash safety
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p registry-tests
//!
//! # By category
//! cargo test -p registry-tests integration::scenarios
//! cargo test -p registry-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p registry-tests
//! ```

pub mod integration;

use governance_registry::prelude::PrincipalId;

/// Deterministic test principal `[byte; 20]`.
#[must_use]
pub fn principal(byte: u8) -> PrincipalId {
    PrincipalId::new([byte; 20])
}
