//! fleetscore: device counts per OS and supervisor version for a balena fleet
//!
//! # Modules
//!
//! - [`api`]: HTTP client for the fleet API (device listing, token refresh)
//! - [`commands`]: Subcommand handlers wired to the fleet pipeline
//! - [`config`]: Environment selection, config file and output paths
//! - [`fleet`]: Fetch, normalize, aggregate and report device versions
//! - [`logging`]: Diagnostics log setup
//! - [`session`]: Authentication and background token refresh

pub mod api;
pub mod commands;
pub mod config;
pub mod fleet;
pub mod logging;
pub mod session;
