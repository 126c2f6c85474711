//! cod-rs library
//!
//! Command implementations and the asset importer behind the `cod-rs` binary.

pub mod cli;
pub mod commands;
pub mod import;
pub mod utils;
