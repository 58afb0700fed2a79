//! # Quill - A transport-packet classification and payload rewrite engine
//!
//! Quill implements the hot-path core of an outbound IPv4 traffic filter:
//! per-packet classification by destination port, and in-place text
//! rewriting of the payload for one designated port.
//!
//! ## Features
//!
//! * Port blocking - Block all traffic to one remote port, with a
//!   one-time diagnostic on the first hit
//! * Payload rewriting - Scan bounded payload text for configured token
//!   pairs and substitute them in place, bidirectionally
//! * Chain traversal - Walk the host's segmented buffer representation
//!   as one flat sequence of segments
//! * Diagnostics - Line-oriented before/after snapshots and hex dumps
//!   through the `log` facade
//!
//! ## Architecture
//!
//! The platform interception host (driver lifecycle, callout
//! registration, filter sessions) stays outside this crate. It calls
//! [`network::classify::Classifier::classify`] once per packet with the
//! flow four-tuple and an optional buffer chain, and consumes the
//! returned verdict. The call is synchronous, lock-free, and never
//! fails: rewrite problems degrade to forwarding the packet unmodified.
//!
//! ## Quick Start
//!
//! ```rust
//! use quill::prelude::*;
//!
//! let classifier = Classifier::new();
//!
//! let flow = FlowTuple::new(0x0A00_0001, 0x0A00_0002, 50000, 27015);
//! let mut chain =
//!     PacketBufferChain::from_segments(vec![MemorySegment::from_text("I Love Alice", 255)]);
//!
//! assert_eq!(classifier.classify(&flow, Some(&mut chain)), Verdict::Permit);
//! ```

/// Centralized error handling
pub mod error;
/// Packet classification and rewriting functionality
pub mod network;
/// Prelude for convenient imports
pub mod prelude;
/// Configuration settings for packet filtering
pub mod settings;
/// Shared utility functions
pub mod utils;

// Re-export commonly used types
pub use error::{QuillError, Result};
