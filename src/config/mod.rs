//! Configuration management for bandscope.
//!
//! Analyzer and playback settings are loaded from a TOML file in the user's
//! config directory (or an explicit path). Every field has a default, so a
//! missing or partial file still yields a complete configuration.

pub mod file;

pub use file::{default_config_path, BandscopeConfig, PlaybackConfig};
