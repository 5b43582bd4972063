//! Panel persistence.
//!
//! - Parquet write/read of panels (`store`)

pub mod store;

pub use store::*;
