//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the observation window and business-day calendar (`ObservationWindow`)
//! - per-country series and long-form panels (`Series`, `Panel`)
//! - the country registry (`Country`, `CountryRegistry`)

pub mod registry;
pub mod types;

pub use registry::*;
pub use types::*;
