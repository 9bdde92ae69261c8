// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `SubInfo` Store
//!
//! Configuration for the `SubInfo` subscription checker.
//!
//! This crate provides:
//!
//! - **Settings**: The JSON settings file and its defaults
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use subinfo_store::Settings;
//!
//! let settings = Settings::load_or_default(&Settings::default_path()).await;
//! let fetch = settings.fetch_settings();
//! let mapping = settings.mapping_source();
//! ```

pub mod config;
pub mod error;
pub mod persistence;

pub use config::Settings;
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_settings_path, ensure_dir, load_json, save_json,
};
