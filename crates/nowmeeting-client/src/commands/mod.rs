//! Command implementations.

pub mod config;
#[cfg(feature = "bmlt")]
pub mod fetch;
pub mod show;
