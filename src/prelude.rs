//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types and traits from the crate,
//! allowing users to import everything they need with a single use statement:
//!
//! ```rust
//! use quill::prelude::*;
//! ```

// Error handling
pub use crate::error::{QuillError, Result};

// Network core
pub use crate::network::core::{FlowTuple, MemorySegment, PacketBuffer, PacketBufferChain, Verdict};

// Classification
pub use crate::network::classify::Classifier;
pub use crate::network::stats::ClassifyStatistics;

// Rewrite engine
pub use crate::network::modules::rewrite::{
    rewrite_text, PayloadRewriter, RewriteOutcome, RewriteRule, RuleSet, REWRITE_CAPACITY,
};

// Module traits
pub use crate::network::modules::traits::{ModuleOptions, SegmentVisitor};

// Settings
pub use crate::settings::{Settings, SettingsBuilder};

// Individual feature options (for advanced usage)
pub use crate::settings::{
    block::BlockOptions,
    rewrite::{RewriteOptions, RulePair},
};
