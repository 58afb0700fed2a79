//! Segmented packet buffer representation and traversal.
//!
//! Interception hosts hand a packet over as a chain of buffers, each buffer
//! holding a list of memory segments, with only the segments actually
//! mapped into memory. The walker here flattens that nesting into a single
//! lazy sequence of contiguous byte slices so the same traversal can serve
//! both the read-only diagnostic dump and the mutating rewrite pass.

use crate::network::modules::traits::SegmentVisitor;
use log::debug;
use std::fmt::Write as _;

/// One contiguous byte range inside a packet buffer.
///
/// A segment may fail to resolve to a mapping at all; such segments are
/// represented as unmapped and skipped during traversal rather than
/// treated as errors.
#[derive(Debug, Clone)]
pub struct MemorySegment {
    /// Backing bytes, or `None` when the mapping is unavailable
    data: Option<Vec<u8>>,

    /// Byte offset of this range within its backing mapping
    offset: usize,
}

impl MemorySegment {
    /// Creates a mapped segment owning the given bytes.
    pub fn mapped(data: Vec<u8>) -> Self {
        Self {
            data: Some(data),
            offset: 0,
        }
    }

    /// Creates a segment whose mapping is unavailable.
    pub fn unmapped() -> Self {
        Self {
            data: None,
            offset: 0,
        }
    }

    /// Creates a mapped segment of `capacity` bytes holding `text` as a
    /// NUL-terminated string, zero-padded to the full capacity.
    ///
    /// Text longer than the capacity is cut off at the capacity.
    pub fn from_text(text: &str, capacity: usize) -> Self {
        let mut data = vec![0u8; capacity];
        let n = text.len().min(capacity);
        data[..n].copy_from_slice(&text.as_bytes()[..n]);
        Self::mapped(data)
    }

    /// Sets the offset of this range within its backing mapping.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the number of bytes in the segment, 0 when unmapped.
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether the segment resolved to a mapping.
    pub fn is_mapped(&self) -> bool {
        self.data.is_some()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the segment bytes, or `None` when unmapped.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Returns the segment bytes mutably, or `None` when unmapped.
    pub fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        self.data.as_deref_mut()
    }
}

/// An ordered list of memory segments with a current-segment cursor.
///
/// Traversal starts at the cursor, mirroring hosts that advance a buffer's
/// current segment past headers they have already consumed.
#[derive(Debug, Clone, Default)]
pub struct PacketBuffer {
    segments: Vec<MemorySegment>,
    cursor: usize,
}

impl PacketBuffer {
    /// Creates a buffer whose traversal starts at the first segment.
    pub fn new(segments: Vec<MemorySegment>) -> Self {
        Self {
            segments,
            cursor: 0,
        }
    }

    /// Creates a buffer whose traversal starts at `cursor`.
    ///
    /// A cursor at or beyond the end yields an empty traversal.
    pub fn with_cursor(segments: Vec<MemorySegment>, cursor: usize) -> Self {
        Self { segments, cursor }
    }

    /// Returns the segments from the cursor onward, mapped or not.
    pub fn segments(&self) -> &[MemorySegment] {
        &self.segments[self.cursor.min(self.segments.len())..]
    }

    /// Iterates the mapped segment slices from the cursor onward.
    pub fn mapped_segments(&self) -> impl Iterator<Item = &[u8]> {
        self.segments().iter().filter_map(MemorySegment::bytes)
    }

    /// Iterates the mapped segment slices mutably from the cursor onward.
    pub fn mapped_segments_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        let start = self.cursor.min(self.segments.len());
        self.segments[start..]
            .iter_mut()
            .filter_map(MemorySegment::bytes_mut)
    }
}

/// The segmented data of one classification event.
///
/// May be empty: metadata-only invocations carry no payload at all.
#[derive(Debug, Clone, Default)]
pub struct PacketBufferChain {
    buffers: Vec<PacketBuffer>,
}

impl PacketBufferChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain from pre-built buffers.
    pub fn from_buffers(buffers: Vec<PacketBuffer>) -> Self {
        Self { buffers }
    }

    /// Creates a chain holding a single buffer of the given segments.
    pub fn from_segments(segments: Vec<MemorySegment>) -> Self {
        Self {
            buffers: vec![PacketBuffer::new(segments)],
        }
    }

    /// Appends a buffer to the end of the chain.
    pub fn push_buffer(&mut self, buffer: PacketBuffer) {
        self.buffers.push(buffer);
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Iterates every mapped segment of every buffer, in list order.
    ///
    /// Unmapped segments are skipped; an empty chain yields nothing.
    pub fn segments(&self) -> impl Iterator<Item = &[u8]> {
        self.buffers.iter().flat_map(PacketBuffer::mapped_segments)
    }

    /// Iterates every mapped segment mutably, in list order.
    pub fn segments_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        self.buffers
            .iter_mut()
            .flat_map(PacketBuffer::mapped_segments_mut)
    }

    /// Applies `visitor` to every mapped segment of the chain, in list
    /// order, without mutating the chain topology.
    pub fn traverse<V>(&mut self, visitor: &mut V)
    where
        V: SegmentVisitor + ?Sized,
    {
        for segment in self.segments_mut() {
            visitor.visit(segment);
        }
    }

    /// Logs a hex dump of every segment, including unmapped ones.
    ///
    /// Purely observational; shares its walk order with `traverse`.
    pub fn dump(&self) {
        for buffer in &self.buffers {
            for segment in buffer.segments() {
                debug!(
                    "segment: count={} offset={}",
                    segment.len(),
                    segment.offset()
                );

                match segment.bytes() {
                    None => debug!("unmapped segment"),
                    Some(bytes) => {
                        let mut line = String::with_capacity(bytes.len() * 5);
                        for byte in bytes {
                            let _ = write!(line, "0x{:X} ", byte);
                        }
                        debug!("{}", line);
                    }
                }
            }
        }
    }
}
