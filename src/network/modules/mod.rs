//! Segment processing modules.
//!
//! Contains the payload rewrite engine and the visitor seam the chain
//! walker drives it through.

pub mod rewrite;
pub mod traits;

// Re-export module types for convenience
pub use rewrite::{
    rewrite_text, PayloadRewriter, RewriteOutcome, RewriteRule, RuleSet, REWRITE_CAPACITY,
};
pub use traits::{ModuleOptions, SegmentVisitor};
