//! Settings module for packet filtering parameters.
//!
//! Configuration structures for the classification features: port-based
//! blocking and payload text rewriting.
//!
//! # Example
//!
//! ```rust
//! use quill::settings::builder::SettingsBuilder;
//!
//! let settings = SettingsBuilder::new()
//!     .block(443)
//!     .rewrite(27015)
//!     .build();
//! ```

pub mod block;
pub mod builder;
pub mod filtering;
pub mod rewrite;

// Re-export commonly used types
pub use builder::SettingsBuilder;
pub use filtering::Settings;

/// Serde default helper for flags that default to on.
pub fn default_true() -> bool {
    true
}
