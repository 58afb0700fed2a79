//! In-place payload text rewriting.
//!
//! Scans bounded text inside a packet segment for configured token pairs
//! and substitutes them as the scan advances. The scan and the scratch
//! space are both capped at [`REWRITE_CAPACITY`] bytes; text beyond the
//! cap is never read and overlong results are truncated, never overflowed.

use crate::error::{QuillError, Result};
use crate::network::modules::traits::SegmentVisitor;
use lazy_static::lazy_static;
use log::debug;
use std::sync::Arc;

/// Fixed upper bound for the rewrite scan and scratch space, in bytes.
pub const REWRITE_CAPACITY: usize = 255;

/// An ordered (match token, replace token) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    find: Vec<u8>,
    replace: Vec<u8>,
}

impl RewriteRule {
    pub fn new(find: impl Into<Vec<u8>>, replace: impl Into<Vec<u8>>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// The token searched for in scanned text.
    pub fn find(&self) -> &[u8] {
        &self.find
    }

    /// The token written in place of a matched token.
    pub fn replace(&self) -> &[u8] {
        &self.replace
    }
}

/// An ordered list of rewrite rules plus the reversal flag.
///
/// Rule order is significant: the first rule that matches at the current
/// scan position wins, and its match token is always tested before its
/// replace token. With reversal enabled the replace token substitutes
/// back to the match token, making the rule set an involution on text
/// containing only whole tokens.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<RewriteRule>,
    bidirectional: bool,
}

impl RuleSet {
    /// Creates a rule set without validating the tokens.
    ///
    /// Empty tokens never match; tokens longer than the scratch capacity
    /// can never complete within the scan window. Use [`RuleSet::validated`]
    /// to reject such rules instead of silently carrying them.
    pub fn new(rules: Vec<RewriteRule>, bidirectional: bool) -> Self {
        Self {
            rules,
            bidirectional,
        }
    }

    /// Creates a rule set, rejecting tokens that are empty or too long
    /// for the scratch capacity.
    pub fn validated(rules: Vec<RewriteRule>, bidirectional: bool) -> Result<Self> {
        for rule in &rules {
            for token in [rule.find(), rule.replace()] {
                if token.is_empty() {
                    return Err(QuillError::invalid_rule("empty token"));
                }
                if token.len() >= REWRITE_CAPACITY {
                    return Err(QuillError::invalid_rule(format!(
                        "token of {} bytes exceeds the {}-byte rewrite capacity",
                        token.len(),
                        REWRITE_CAPACITY
                    )));
                }
            }
        }
        Ok(Self::new(rules, bidirectional))
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn bidirectional(&self) -> bool {
        self.bidirectional
    }
}

lazy_static! {
    /// The built-in rule set, shared read-only across all invocations.
    pub static ref DEFAULT_RULE_SET: Arc<RuleSet> = Arc::new(RuleSet::new(
        vec![
            RewriteRule::new("Love", "Hate"),
            RewriteRule::new("Alice", "Trudy"),
            RewriteRule::new("Rob", "Bob"),
        ],
        true,
    ));
}

/// Result of one rewrite pass over a segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// No rule matched; the segment is byte-for-byte unchanged
    Unchanged,
    /// At least one substitution was written back in full
    Rewritten,
    /// A capacity bound clipped the rewritten text
    Truncated,
}

/// Rewrites the text at the start of `buf` in place.
///
/// The text is bounded by the first NUL byte or by `REWRITE_CAPACITY`,
/// whichever comes first. Each scanned byte is appended to a scratch
/// buffer; after each append the rules are tried in order against the
/// window that starts at the current write-origin. A substitution
/// replaces the window's matching tail, advances the write-origin past
/// the inserted replacement, and ends rule evaluation for that byte.
/// The scratch content then replaces the original text.
///
/// Never reads or writes past the scan bound and never fails; bounds
/// problems degrade to truncation reported in the outcome.
pub fn rewrite_text(buf: &mut [u8], rules: &RuleSet) -> RewriteOutcome {
    let bound = buf.len().min(REWRITE_CAPACITY);
    let scan_end = buf[..bound]
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(bound);

    let mut scratch = [0u8; REWRITE_CAPACITY];
    let mut origin = 0; // start of the pending-token window
    let mut len = 0; // bytes occupied in the scratch
    let mut substituted = false;
    let mut truncated = false;

    for &byte in &buf[..scan_end] {
        if len >= REWRITE_CAPACITY {
            truncated = true;
            break;
        }
        scratch[len] = byte;
        len += 1;

        for rule in rules.rules() {
            let hit = substitute_tail(&mut scratch, origin, &mut len, rule.find(), rule.replace())
                .or_else(|| {
                    if rules.bidirectional() {
                        substitute_tail(&mut scratch, origin, &mut len, rule.replace(), rule.find())
                    } else {
                        None
                    }
                });

            if let Some(clipped) = hit {
                substituted = true;
                truncated |= clipped;
                origin = len;
                break;
            }
        }
    }

    // Copy the scratch back over the original text, clipping at whichever
    // capacity runs out first.
    let written = len.min(buf.len());
    buf[..written].copy_from_slice(&scratch[..written]);
    if written < len {
        truncated = true;
    }
    if written < bound {
        buf[written] = 0;
    }

    if truncated {
        RewriteOutcome::Truncated
    } else if substituted {
        RewriteOutcome::Rewritten
    } else {
        RewriteOutcome::Unchanged
    }
}

/// Replaces the window tail with `replacement` if it ends with `token`.
///
/// The window is `scratch[origin..len]`. On a hit, `len` is moved to
/// cover the inserted replacement and `Some(clipped)` reports whether
/// the scratch capacity cut the replacement short. `None` means the
/// window does not end with `token`; empty tokens never match.
fn substitute_tail(
    scratch: &mut [u8; REWRITE_CAPACITY],
    origin: usize,
    len: &mut usize,
    token: &[u8],
    replacement: &[u8],
) -> Option<bool> {
    if token.is_empty() || !scratch[origin..*len].ends_with(token) {
        return None;
    }

    let start = *len - token.len();
    let copied = replacement.len().min(REWRITE_CAPACITY - start);
    scratch[start..start + copied].copy_from_slice(&replacement[..copied]);
    *len = start + copied;
    Some(copied < replacement.len())
}

/// Segment visitor applying a shared rule set to each segment's text.
///
/// Emits a before/after snapshot of each segment to the log sink; the
/// snapshots are observational only and never influence the verdict.
#[derive(Debug)]
pub struct PayloadRewriter<'a> {
    rules: &'a RuleSet,
    segments_rewritten: usize,
    segments_truncated: usize,
}

impl<'a> PayloadRewriter<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            segments_rewritten: 0,
            segments_truncated: 0,
        }
    }

    /// Returns whether any visited segment was modified.
    pub fn changed(&self) -> bool {
        self.segments_rewritten > 0 || self.segments_truncated > 0
    }

    /// Number of segments rewritten in full.
    pub fn segments_rewritten(&self) -> usize {
        self.segments_rewritten
    }

    /// Number of segments whose rewritten text was clipped.
    pub fn segments_truncated(&self) -> usize {
        self.segments_truncated
    }
}

impl SegmentVisitor for PayloadRewriter<'_> {
    fn visit(&mut self, segment: &mut [u8]) {
        let before = segment_text(segment);
        let outcome = rewrite_text(segment, self.rules);

        debug!("before copy:\t{}", before);
        debug!("after copy:\t{}", segment_text(segment));

        match outcome {
            RewriteOutcome::Unchanged => {}
            RewriteOutcome::Rewritten => self.segments_rewritten += 1,
            RewriteOutcome::Truncated => self.segments_truncated += 1,
        }
    }
}

/// Text content of a segment, bounded like the rewrite scan.
pub fn segment_text(segment: &[u8]) -> String {
    let bound = segment.len().min(REWRITE_CAPACITY);
    let end = segment[..bound]
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(bound);
    String::from_utf8_lossy(&segment[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_rules() -> RuleSet {
        RuleSet::new(
            vec![
                RewriteRule::new("Love", "Hate"),
                RewriteRule::new("Alice", "Trudy"),
                RewriteRule::new("Rob", "Bob"),
            ],
            true,
        )
    }

    fn text_buf(text: &str, capacity: usize) -> Vec<u8> {
        let mut buf = vec![0u8; capacity];
        buf[..text.len()].copy_from_slice(text.as_bytes());
        buf
    }

    fn text_of(buf: &[u8]) -> String {
        segment_text(buf)
    }

    #[test]
    fn test_forward_scenario() {
        let mut buf = text_buf("I Love Alice and Rob", 64);

        let outcome = rewrite_text(&mut buf, &fixed_rules());

        assert_eq!(outcome, RewriteOutcome::Rewritten);
        assert_eq!(text_of(&buf), "I Hate Trudy and Bob");
    }

    #[test]
    fn test_reverse_scenario() {
        let mut buf = text_buf("I Hate Trudy and Bob", 64);

        let outcome = rewrite_text(&mut buf, &fixed_rules());

        assert_eq!(outcome, RewriteOutcome::Rewritten);
        assert_eq!(text_of(&buf), "I Love Alice and Rob");
    }

    #[test]
    fn test_involution_on_single_token() {
        let mut buf = text_buf("Love", 16);

        rewrite_text(&mut buf, &fixed_rules());
        assert_eq!(text_of(&buf), "Hate");

        rewrite_text(&mut buf, &fixed_rules());
        assert_eq!(text_of(&buf), "Love");
    }

    #[test]
    fn test_no_match_leaves_bytes_untouched() {
        let mut buf = text_buf("nothing to see here", 32);
        let original = buf.clone();

        let outcome = rewrite_text(&mut buf, &fixed_rules());

        assert_eq!(outcome, RewriteOutcome::Unchanged);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_first_rule_in_list_order_wins() {
        // Both rules complete on the same byte; the earlier rule must win.
        let rules = RuleSet::new(
            vec![RewriteRule::new("ab", "X"), RewriteRule::new("b", "Y")],
            false,
        );
        let mut buf = text_buf("ab", 8);

        rewrite_text(&mut buf, &rules);

        assert_eq!(text_of(&buf), "X");
    }

    #[test]
    fn test_match_checked_before_replace() {
        // With reversal on and a rule whose tokens chain into each other,
        // each completed token toggles exactly once per scan position.
        let rules = RuleSet::new(vec![RewriteRule::new("a", "b")], true);
        let mut buf = text_buf("ab", 8);

        rewrite_text(&mut buf, &rules);

        assert_eq!(text_of(&buf), "ba");
    }

    #[test]
    fn test_reversal_disabled_only_rewrites_forward() {
        let rules = RuleSet::new(vec![RewriteRule::new("Love", "Hate")], false);

        let mut forward = text_buf("Love", 16);
        rewrite_text(&mut forward, &rules);
        assert_eq!(text_of(&forward), "Hate");

        let mut reverse = text_buf("Hate", 16);
        let outcome = rewrite_text(&mut reverse, &rules);
        assert_eq!(outcome, RewriteOutcome::Unchanged);
        assert_eq!(text_of(&reverse), "Hate");
    }

    #[test]
    fn test_scan_stops_at_first_nul() {
        let mut buf = text_buf("Love", 16);
        buf[5..9].copy_from_slice(b"Love");

        rewrite_text(&mut buf, &fixed_rules());

        // Only the text before the NUL is scanned.
        assert_eq!(&buf[..4], b"Hate");
        assert_eq!(&buf[5..9], b"Love");
    }

    #[test]
    fn test_255_byte_bound_is_never_crossed() {
        // 300 bytes, no NUL, with a token straddling the scan bound. Only
        // the first 255 bytes are scanned and written.
        let mut buf = vec![b'A'; 300];
        buf[252..256].copy_from_slice(b"Love");
        let original = buf.clone();

        let outcome = rewrite_text(&mut buf, &fixed_rules());

        assert_eq!(outcome, RewriteOutcome::Unchanged);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_full_capacity_input_rewrites_in_place() {
        let mut buf = vec![b'x'; REWRITE_CAPACITY];
        buf[0..4].copy_from_slice(b"Love");

        let outcome = rewrite_text(&mut buf, &fixed_rules());

        assert_eq!(outcome, RewriteOutcome::Rewritten);
        assert_eq!(&buf[0..4], b"Hate");
        assert_eq!(buf.len(), REWRITE_CAPACITY);
        assert!(buf[4..].iter().all(|&b| b == b'x'));
    }

    #[test]
    fn test_growth_beyond_segment_truncates() {
        let rules = RuleSet::new(vec![RewriteRule::new("a", "XYZ")], false);
        let mut buf = vec![b'a'];

        let outcome = rewrite_text(&mut buf, &rules);

        assert_eq!(outcome, RewriteOutcome::Truncated);
        assert_eq!(buf, b"X");
    }

    #[test]
    fn test_shrinking_replacement_nul_terminates() {
        let rules = RuleSet::new(vec![RewriteRule::new("abc", "z")], false);
        let mut buf = text_buf("abc!", 8);

        rewrite_text(&mut buf, &rules);

        assert_eq!(text_of(&buf), "z!");
        assert_eq!(buf[2], 0);
    }

    #[test]
    fn test_empty_segment_is_unchanged() {
        let mut buf: Vec<u8> = Vec::new();
        assert_eq!(rewrite_text(&mut buf, &fixed_rules()), RewriteOutcome::Unchanged);
    }

    #[test]
    fn test_validated_rejects_bad_tokens() {
        assert!(RuleSet::validated(vec![RewriteRule::new("", "x")], true).is_err());
        assert!(RuleSet::validated(
            vec![RewriteRule::new("x", vec![b'y'; REWRITE_CAPACITY])],
            true
        )
        .is_err());
        assert!(RuleSet::validated(vec![RewriteRule::new("x", "y")], true).is_ok());
    }

    #[test]
    fn test_rewriter_visitor_counts_segments() {
        let rules = fixed_rules();
        let mut rewriter = PayloadRewriter::new(&rules);

        let mut hit = text_buf("Love", 16);
        let mut miss = text_buf("nope", 16);
        rewriter.visit(&mut hit);
        rewriter.visit(&mut miss);

        assert!(rewriter.changed());
        assert_eq!(rewriter.segments_rewritten(), 1);
        assert_eq!(rewriter.segments_truncated(), 0);
        assert_eq!(text_of(&hit), "Hate");
        assert_eq!(text_of(&miss), "nope");
    }

    #[test]
    fn test_default_rule_set_is_the_builtin_table() {
        let rules = DEFAULT_RULE_SET.rules();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].find(), b"Love");
        assert_eq!(rules[0].replace(), b"Hate");
        assert!(DEFAULT_RULE_SET.bidirectional());
    }
}
