//! Core network data structures.
//!
//! Contains the segmented packet buffer representation the walker
//! traverses and the flow metadata types the classifier decides on.

pub mod chain;
pub mod flow;

// Re-export commonly used types
pub use chain::{MemorySegment, PacketBuffer, PacketBufferChain};
pub use flow::{FlowTuple, Verdict};
