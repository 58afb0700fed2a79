use crate::error::Result;
use crate::network::modules::rewrite::{RewriteRule, RuleSet};
use crate::settings::default_true;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Port rewritten by default.
pub const DEFAULT_REWRITE_PORT: u16 = 27015;

/// One match/replace token pair as it appears in configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RulePair {
    /// Token searched for in payload text
    pub find: String,
    /// Token substituted in its place
    pub replace: String,
}

impl RulePair {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }
}

#[derive(Parser, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Whether this feature is enabled
    #[arg(skip = true)]
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Remote (destination) port whose payload text is rewritten
    #[arg(long = "rewrite-port", id = "rewrite-port", default_value_t = DEFAULT_REWRITE_PORT)]
    #[serde(default = "default_rewrite_port")]
    pub port: u16,

    /// Match/replace pairs, applied in order with first-match-wins
    #[arg(skip)]
    #[serde(default = "default_rules")]
    pub rules: Vec<RulePair>,

    /// Whether replace tokens are substituted back to their match tokens
    #[arg(skip = true)]
    #[serde(default = "default_true")]
    pub enable_reversal: bool,
}

fn default_rewrite_port() -> u16 {
    DEFAULT_REWRITE_PORT
}

/// The built-in rule set.
pub fn default_rules() -> Vec<RulePair> {
    vec![
        RulePair::new("Love", "Hate"),
        RulePair::new("Alice", "Trudy"),
        RulePair::new("Rob", "Bob"),
    ]
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            port: DEFAULT_REWRITE_PORT,
            rules: default_rules(),
            enable_reversal: true,
        }
    }
}

impl RewriteOptions {
    /// Compiles the configured pairs into a validated rule set.
    pub fn compile(&self) -> Result<RuleSet> {
        let rules = self
            .rules
            .iter()
            .map(|pair| RewriteRule::new(pair.find.as_str(), pair.replace.as_str()))
            .collect();
        RuleSet::validated(rules, self.enable_reversal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_compile_to_builtin_rules() {
        let rules = RewriteOptions::default().compile().unwrap();

        assert_eq!(rules.rules().len(), 3);
        assert_eq!(rules.rules()[1].find(), b"Alice");
        assert_eq!(rules.rules()[1].replace(), b"Trudy");
        assert!(rules.bidirectional());
    }

    #[test]
    fn test_compile_rejects_empty_tokens() {
        let options = RewriteOptions {
            rules: vec![RulePair::new("", "x")],
            ..Default::default()
        };
        assert!(options.compile().is_err());
    }
}
