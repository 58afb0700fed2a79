//! Trait definitions for segment processing strategies.
//!
//! The chain walker is generic over what happens to each segment; the
//! rewrite pass and the diagnostic helpers are just different visitors
//! over the same traversal.

/// Strategy applied to each mapped segment during a chain traversal.
///
/// Implemented by stateful visitors such as the payload rewriter, and
/// blanket-implemented for closures so ad-hoc passes stay lightweight:
///
/// ```rust
/// # use quill::network::core::chain::{MemorySegment, PacketBufferChain};
/// let mut chain = PacketBufferChain::from_segments(vec![MemorySegment::mapped(vec![0; 4])]);
/// let mut total = 0;
/// chain.traverse(&mut |segment: &mut [u8]| total += segment.len());
/// assert_eq!(total, 4);
/// ```
pub trait SegmentVisitor {
    /// Processes one contiguous segment. May mutate it in place.
    fn visit(&mut self, segment: &mut [u8]);
}

/// Common surface of per-feature option structs.
pub trait ModuleOptions {
    /// Whether the feature should participate in classification at all.
    fn is_enabled(&self) -> bool;
}

impl<F> SegmentVisitor for F
where
    F: FnMut(&mut [u8]),
{
    fn visit(&mut self, segment: &mut [u8]) {
        self(segment)
    }
}
