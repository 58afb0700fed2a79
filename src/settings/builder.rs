//! Packet filtering settings builder.
//!
//! Provides a fluent builder API for constructing `Settings` in a
//! type-safe and ergonomic way.
//!
//! # Example
//!
//! ```rust
//! use quill::settings::builder::SettingsBuilder;
//!
//! let settings = SettingsBuilder::new()
//!     .block(443)
//!     .rewrite(27015)  // built-in rule set
//!     .build();
//! ```

use crate::settings::block::BlockOptions;
use crate::settings::filtering::Settings;
use crate::settings::rewrite::{default_rules, RewriteOptions, RulePair};

/// Builder for constructing `Settings`.
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Creates a new builder with default (empty) settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables blocking of traffic to the given remote port.
    pub fn block(mut self, port: u16) -> Self {
        self.settings.block = Some(BlockOptions {
            enabled: true,
            port,
        });
        self
    }

    /// Enables payload rewriting on the given remote port with the
    /// built-in rule set.
    pub fn rewrite(mut self, port: u16) -> Self {
        self.settings.rewrite = Some(RewriteOptions {
            enabled: true,
            port,
            rules: default_rules(),
            enable_reversal: true,
        });
        self
    }

    /// Appends a match/replace pair to the rewrite rules.
    ///
    /// Starts an empty-ruled rewrite feature on the default port if none
    /// was configured yet, so chained `with_rule` calls build a custom
    /// rule list rather than extending the built-in one.
    pub fn with_rule(mut self, find: impl Into<String>, replace: impl Into<String>) -> Self {
        let rewrite = self.settings.rewrite.get_or_insert_with(|| RewriteOptions {
            rules: Vec::new(),
            ..Default::default()
        });
        rewrite.rules.push(RulePair::new(find, replace));
        self
    }

    /// Sets the rewrite port, keeping the configured rules.
    pub fn with_rewrite_port(mut self, port: u16) -> Self {
        if let Some(ref mut rewrite) = self.settings.rewrite {
            rewrite.port = port;
        }
        self
    }

    /// Sets whether replace tokens substitute back to match tokens.
    pub fn with_reversal(mut self, enabled: bool) -> Self {
        if let Some(ref mut rewrite) = self.settings.rewrite {
            rewrite.enable_reversal = enabled;
        }
        self
    }

    /// Consumes the builder and returns the settings.
    pub fn build(self) -> Settings {
        self.settings
    }
}
