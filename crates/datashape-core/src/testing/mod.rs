//! Testing utilities for datashape.
//!
//! Enable the `testing` feature to use these from other crates:
//!
//! ```toml
//! [dev-dependencies]
//! datashape-core = { path = "../datashape-core", features = ["testing"] }
//! ```

pub mod assertions;

pub use assertions::*;
pub use crate::text::normalize_newlines;
