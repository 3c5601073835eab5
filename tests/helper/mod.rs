//! Shared test utilities

pub mod fleet;

pub use fleet::{RecordingSink, mock_device_list, recent_filter};
