use crate::error::Result;
use crate::network::modules::traits::ModuleOptions;
use crate::settings::block::BlockOptions;
use crate::settings::rewrite::RewriteOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// All packet filtering settings.
///
/// Each feature is optional; an absent or disabled feature turns the
/// corresponding classification branch off entirely.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Controls port-based blocking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockOptions>,

    /// Controls payload text rewriting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<RewriteOptions>,
}

impl Settings {
    /// Settings with both features enabled on their default ports and
    /// the built-in rules.
    pub fn builtin() -> Self {
        Self {
            block: Some(BlockOptions::default()),
            rewrite: Some(RewriteOptions::default()),
        }
    }

    /// Parses settings from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes settings to a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Loads settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Saves settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

impl ModuleOptions for BlockOptions {
    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl ModuleOptions for RewriteOptions {
    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
