use crate::settings::default_true;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Port blocked by default: HTTPS.
pub const DEFAULT_BLOCK_PORT: u16 = 443;

#[derive(Parser, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BlockOptions {
    /// Whether this feature is enabled
    #[arg(skip = true)]
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Remote (destination) port whose traffic is blocked
    #[arg(long = "block-port", id = "block-port", default_value_t = DEFAULT_BLOCK_PORT)]
    #[serde(default = "default_block_port")]
    pub port: u16,
}

fn default_block_port() -> u16 {
    DEFAULT_BLOCK_PORT
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            port: DEFAULT_BLOCK_PORT,
        }
    }
}
