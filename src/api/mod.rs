//! Fleet API access
//!
//! - [`client`]: reqwest client for device listing and token refresh

pub mod client;
