//! CLI command implementations.

pub mod check;
pub mod config;
pub mod edit;
pub mod estimate;
pub mod filter;
pub mod show;
pub mod watch;
