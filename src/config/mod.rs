//! Configuration module for medscribe
//!
//! Handles loading and managing application settings from TOML files.

mod settings;

pub use settings::{ConfigSource, GeneralSettings, LlmSettings, ServerSettings, Settings};
