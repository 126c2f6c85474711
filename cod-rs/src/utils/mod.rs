//! Shared utilities for the cod-rs CLI

pub mod format;
pub mod table;

pub use format::*;
pub use table::*;
