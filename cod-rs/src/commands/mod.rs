//! Command implementations for each file format

pub mod ibsp;
pub mod import;
pub mod iwi;
pub mod material;
pub mod xmodel;
