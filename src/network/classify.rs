//! Per-packet classification decisions.
//!
//! The host invokes [`Classifier::classify`] once per outbound packet,
//! concurrently and with no ordering guarantees. The call is fully
//! synchronous, never blocks, and always returns a verdict: rewrite
//! problems degrade to forwarding the packet unmodified, never to
//! blocking or failing the call.

use crate::error::Result;
use crate::network::core::chain::PacketBufferChain;
use crate::network::core::flow::{FlowTuple, Verdict};
use crate::network::modules::rewrite::{PayloadRewriter, RuleSet, DEFAULT_RULE_SET};
use crate::network::modules::traits::ModuleOptions;
use crate::network::stats::ClassifyStatistics;
use crate::settings::block::DEFAULT_BLOCK_PORT;
use crate::settings::rewrite::DEFAULT_REWRITE_PORT;
use crate::settings::Settings;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Classification decision engine.
///
/// Holds the shared immutable rule configuration and the only two pieces
/// of cross-packet state, both atomic: the one-time block log latch and
/// the statistics counters.
#[derive(Debug)]
pub struct Classifier {
    rules: Arc<RuleSet>,
    block_port: Option<u16>,
    rewrite_port: Option<u16>,
    block_seen: AtomicBool,
    stats: ClassifyStatistics,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// Creates a classifier with the default configuration: block port
    /// 443, rewrite port 27015, built-in rule set.
    pub fn new() -> Self {
        Self {
            rules: Arc::clone(&DEFAULT_RULE_SET),
            block_port: Some(DEFAULT_BLOCK_PORT),
            rewrite_port: Some(DEFAULT_REWRITE_PORT),
            block_seen: AtomicBool::new(false),
            stats: ClassifyStatistics::new(),
        }
    }

    /// Builds a classifier from settings.
    ///
    /// Disabled or absent features turn the corresponding branch off
    /// entirely. Fails only on invalid rewrite rules; classification
    /// itself can never fail.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let block_port = settings
            .block
            .as_ref()
            .filter(|options| options.is_enabled())
            .map(|options| options.port);

        let rewrite = settings
            .rewrite
            .as_ref()
            .filter(|options| options.is_enabled());

        let rules = match rewrite {
            Some(options) => Arc::new(options.compile()?),
            None => Arc::clone(&DEFAULT_RULE_SET),
        };

        Ok(Self {
            rules,
            block_port,
            rewrite_port: rewrite.map(|options| options.port),
            block_seen: AtomicBool::new(false),
            stats: ClassifyStatistics::new(),
        })
    }

    /// Classifies one packet.
    ///
    /// `payload` is absent for metadata-only invocations. For the rewrite
    /// port, every mapped segment of the chain is run through the payload
    /// rewriter before the packet is permitted.
    pub fn classify(&self, flow: &FlowTuple, payload: Option<&mut PacketBufferChain>) -> Verdict {
        if Some(flow.remote_port) == self.block_port {
            // Latch set exactly once for the life of the process.
            if !self.block_seen.swap(true, Ordering::Relaxed) {
                info!("first packet for port {} detected", flow.remote_port);
                info!("blocking all traffic to port {}", flow.remote_port);
            }
            self.stats.record_block();
            return Verdict::Block;
        }

        if Some(flow.remote_port) == self.rewrite_port {
            if let Some(chain) = payload {
                debug!("packet data for {}:", flow);

                let mut rewriter = PayloadRewriter::new(&self.rules);
                chain.traverse(&mut rewriter);

                if rewriter.changed() {
                    self.stats.record_rewrite();
                }
            }
            debug!("permitting packet for {}", flow);
        }

        self.stats.record_permit();
        Verdict::Permit
    }

    /// Whether the one-time block message has already been emitted.
    pub fn block_latched(&self) -> bool {
        self.block_seen.load(Ordering::Relaxed)
    }

    /// The rule set shared by all invocations.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn statistics(&self) -> &ClassifyStatistics {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::core::chain::MemorySegment;
    use crate::network::modules::rewrite::segment_text;
    use crate::settings::builder::SettingsBuilder;
    use std::thread;

    fn payload_chain(text: &str) -> PacketBufferChain {
        PacketBufferChain::from_segments(vec![MemorySegment::from_text(text, 255)])
    }

    fn first_segment_text(chain: &PacketBufferChain) -> String {
        segment_text(chain.segments().next().unwrap())
    }

    #[test]
    fn test_block_port_is_always_blocked() {
        let classifier = Classifier::new();

        let flow = FlowTuple::to_remote_port(443);
        assert_eq!(classifier.classify(&flow, None), Verdict::Block);

        let mut chain = payload_chain("Love");
        assert_eq!(classifier.classify(&flow, Some(&mut chain)), Verdict::Block);

        // A blocked packet's payload is never touched.
        assert_eq!(first_segment_text(&chain), "Love");
        assert_eq!(classifier.statistics().blocked(), 2);
    }

    #[test]
    fn test_block_latch_sets_once_and_stays() {
        let classifier = Classifier::new();
        assert!(!classifier.block_latched());

        let flow = FlowTuple::to_remote_port(443);
        classifier.classify(&flow, None);
        assert!(classifier.block_latched());

        classifier.classify(&flow, None);
        assert!(classifier.block_latched());
    }

    #[test]
    fn test_rewrite_port_permits_and_rewrites() {
        let classifier = Classifier::new();
        let mut chain = payload_chain("I Love Alice and Rob");

        let flow = FlowTuple::to_remote_port(27015);
        let verdict = classifier.classify(&flow, Some(&mut chain));

        assert_eq!(verdict, Verdict::Permit);
        assert_eq!(first_segment_text(&chain), "I Hate Trudy and Bob");
        assert_eq!(classifier.statistics().rewritten(), 1);
    }

    #[test]
    fn test_rewrite_spans_every_segment() {
        let classifier = Classifier::new();
        let mut chain = PacketBufferChain::from_segments(vec![
            MemorySegment::from_text("Love", 255),
            MemorySegment::unmapped(),
            MemorySegment::from_text("Alice", 255),
        ]);

        classifier.classify(&FlowTuple::to_remote_port(27015), Some(&mut chain));

        let texts: Vec<String> = chain.segments().map(segment_text).collect();
        assert_eq!(texts, vec!["Hate", "Trudy"]);
    }

    #[test]
    fn test_rewrite_port_without_payload_permits() {
        let classifier = Classifier::new();

        let verdict = classifier.classify(&FlowTuple::to_remote_port(27015), None);

        assert_eq!(verdict, Verdict::Permit);
        assert_eq!(classifier.statistics().rewritten(), 0);
    }

    #[test]
    fn test_other_ports_permit_untouched() {
        let classifier = Classifier::new();
        let mut chain = payload_chain("I Love Alice and Rob");

        let verdict = classifier.classify(&FlowTuple::to_remote_port(80), Some(&mut chain));

        assert_eq!(verdict, Verdict::Permit);
        assert_eq!(first_segment_text(&chain), "I Love Alice and Rob");
    }

    #[test]
    fn test_settings_can_disable_blocking() {
        let settings = SettingsBuilder::new().rewrite(27015).build();
        let classifier = Classifier::from_settings(&settings).unwrap();

        let verdict = classifier.classify(&FlowTuple::to_remote_port(443), None);

        assert_eq!(verdict, Verdict::Permit);
        assert!(!classifier.block_latched());
    }

    #[test]
    fn test_settings_override_ports_and_rules() {
        let settings = SettingsBuilder::new()
            .block(8443)
            .with_rule("foo", "bar")
            .with_rewrite_port(1234)
            .build();
        let classifier = Classifier::from_settings(&settings).unwrap();

        assert_eq!(classifier.classify(&FlowTuple::to_remote_port(8443), None), Verdict::Block);

        let mut chain = payload_chain("foo");
        classifier.classify(&FlowTuple::to_remote_port(1234), Some(&mut chain));
        assert_eq!(first_segment_text(&chain), "bar");
    }

    #[test]
    fn test_concurrent_classification_is_consistent() {
        let classifier = Arc::new(Classifier::new());
        let threads: u64 = 8;
        let per_thread: u64 = 50;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let classifier = Arc::clone(&classifier);
                thread::spawn(move || {
                    for i in 0..per_thread {
                        let port = if i % 2 == 0 { 443 } else { 80 };
                        classifier.classify(&FlowTuple::to_remote_port(port), None);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(classifier.statistics().blocked(), threads * per_thread / 2);
        assert_eq!(classifier.statistics().permitted(), threads * per_thread / 2);
        assert!(classifier.block_latched());
    }
}
