//! Command handlers for the bandscope binary.
//!
//! # Commands
//! - `analyze`: Run a WAV file through the band analyzer and print levels per frame
//! - `bands`: Show a band layout and the spectrum bins each band covers
//! - `config`: Print or write the effective configuration
//! - `logs`: Display recent log entries

pub mod analyze;
pub mod bands;
pub mod config;
pub mod logs;

pub use analyze::handle_analyze;
pub use bands::handle_bands;
pub use config::handle_config;
pub use logs::handle_logs;
