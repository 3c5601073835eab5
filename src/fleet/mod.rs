//! Fleet version scoring
//!
//! Fetches the recently active devices of a fleet, groups them by their
//! OS/supervisor version pair and renders a sorted report.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Fetch    │────▶│  Normalize  │────▶│  Aggregate  │────▶│   Report    │
//! │   (retry)   │     │(version key)│     │   (count)   │     │ (sort,sink) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                                           │
//!        ▼                                                           ▼
//! ┌─────────────┐                                             ┌─────────────┐
//! │ DeviceSource│                                             │  LineSink   │
//! │  (fleet API)│                                             │(stdout,file)│
//! └─────────────┘                                             └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`aggregate`]: Counting devices per version key
//! - [`error`]: Error types for fetching, versions and sinks
//! - [`fetch`]: Device source trait, filter and retry loop
//! - [`normalize`]: Version key derivation for a single device
//! - [`report`]: Ordering and rendering of fleet groups
//! - [`score`]: The whole pipeline in one call
//! - [`sink`]: Line sinks and the fan-out writer
//! - [`types`]: Device records, version keys and fleet groups

pub mod aggregate;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod report;
pub mod score;
pub mod sink;
pub mod types;
