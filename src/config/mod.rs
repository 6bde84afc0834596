// src/config/mod.rs

//! Persisted e-mail settings for taskmail.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and settings layers (`model.rs`).
//! - Locate, load, merge and write settings files (`loader.rs`).
//! - Validate addresses and completeness (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{ConfigPaths, load_layer, merge_layers, resolve, system_defaults, updated_user_settings, write_user_settings};
pub use model::{EmailSettings, MailSettings, SettingsFile};
pub use validate::{settings_from_file, switch_address};
