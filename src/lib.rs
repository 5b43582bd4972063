//! `sovereign-panels` library crate.
//!
//! Collects daily 10y sovereign bond yields (ECB) and 5y CDS spreads
//! (worldgovernmentbonds.com) for EU-27 + UK and assembles them into two
//! long-form panels sorted by `(country, date)`.
//!
//! The binary (`panels`) is a thin wrapper around this library so the whole
//! collection can be driven offline through `data::ReplayTransport`.

pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
