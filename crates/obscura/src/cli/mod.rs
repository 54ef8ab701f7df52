//! CLI command implementations.

pub mod apply;
pub mod config;
pub mod overlay;
