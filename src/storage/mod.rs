//! # Storage Layer
//!
//! Vault access and document persistence.
//!
//! ## Layout
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Profile questions | Markdown lines | `<vault>/Profile.md` |
//! | Topic questions | Markdown lines | `<vault>/Topics/{topic}.md` |
//! | Config | TOML | `<config dir>/config.toml` |
//! | Activity log | Timestamped lines | `<vault>/.memoir/activity.log` |
//!
//! ## Write Discipline
//!
//! Documents are rewritten whole (temp file + rename) with exactly one
//! line record changed per transition. Tool processes serialize on an
//! advisory vault lock (`fs2`); external editors are unprotected.

mod config;
mod document;
mod log;
mod vault;

pub use config::{Config, ConfigError, NarrativeConfig};
pub use document::Document;
pub use log::ActivityLog;
pub use vault::{Vault, VaultError, VaultLock, STATE_DIR_NAME};
