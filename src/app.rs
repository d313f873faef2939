//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to the command handlers.

use crate::commands;
use bandscope::config::BandscopeConfig;
use bandscope::logging;
use bandscope::{BandType, SmoothingMode};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

/// Perceptual band analysis of audio spectra for real-time visualizations
#[derive(Parser)]
#[command(name = "bandscope")]
#[command(version)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/bandscope/bandscope.toml\n    Logs:               ~/.local/state/bandscope/bandscope.log.*"
)]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a WAV file through the band analyzer
    ///
    /// Prints amplitude and per-band levels for every Nth frame, then the
    /// calibration each band reached.
    #[command(visible_alias = "a")]
    Analyze {
        /// WAV file to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        overrides: AnalyzerOverrides,

        /// Analysis frames per second
        #[arg(long, value_name = "FPS")]
        frame_rate: Option<f32>,

        /// Channel to analyze instead of the mix-down
        #[arg(long, value_name = "N")]
        channel: Option<usize>,

        /// Print one line every N frames
        #[arg(long, value_name = "N", default_value_t = 1)]
        every: usize,
    },

    /// Show a band layout and the spectrum bins each band sums
    #[command(visible_alias = "b")]
    Bands {
        #[command(flatten)]
        overrides: AnalyzerOverrides,

        /// Sample rate in Hz used to map frequencies to bins
        #[arg(long, value_name = "HZ", default_value_t = 44100.0)]
        sample_rate: f32,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write the configuration to ~/.config/bandscope/bandscope.toml
        #[arg(long)]
        write: bool,
    },

    /// Show recent log entries
    Logs {
        /// Number of lines to show
        #[arg(short = 'n', long, value_name = "N")]
        lines: Option<usize>,
    },

    /// Generate shell completion script
    ///
    /// Examples:
    ///   bandscope completions bash > bandscope.bash
    ///   bandscope completions zsh > _bandscope
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Command-line overrides for the `[analyzer]` config section.
#[derive(Args, Debug, Default)]
struct AnalyzerOverrides {
    /// Band layout preset
    #[arg(long, value_enum)]
    band_type: Option<BandType>,

    /// Raw spectrum length in bins
    #[arg(long, value_name = "N")]
    samples: Option<usize>,

    /// Peak-hold fall rate per second
    #[arg(long)]
    fall_speed: Option<f32>,

    /// Mean filter steepness
    #[arg(long)]
    sensitivity: Option<f32>,

    /// Mean and amplitude peak-hold formula
    #[arg(long, value_enum)]
    smoothing: Option<SmoothingMode>,
}

impl AnalyzerOverrides {
    fn apply(&self, config: &mut BandscopeConfig) {
        let analyzer = &mut config.analyzer;
        if let Some(band_type) = self.band_type {
            analyzer.band_type = band_type;
        }
        if let Some(samples) = self.samples {
            analyzer.number_of_samples = samples;
        }
        if let Some(fall_speed) = self.fall_speed {
            analyzer.fall_speed = fall_speed;
        }
        if let Some(sensitivity) = self.sensitivity {
            analyzer.sensitivity = sensitivity;
        }
        if let Some(smoothing) = self.smoothing {
            analyzer.smoothing = smoothing;
        }
    }
}

/// Runs the application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If the configuration cannot be loaded or is invalid
/// - If command execution fails
pub fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that need neither logging nor config
    match &cli.command {
        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "bandscope", &mut io::stdout());
            return Ok(());
        }
        Commands::Logs { lines } => return commands::handle_logs(*lines),
        _ => {}
    }

    logging::init_logging()?;
    tracing::info!("=== bandscope {} started ===", env!("CARGO_PKG_VERSION"));

    let mut config = BandscopeConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            file,
            overrides,
            frame_rate,
            channel,
            every,
        } => {
            overrides.apply(&mut config);
            if let Some(frame_rate) = frame_rate {
                config.playback.frame_rate = frame_rate;
            }
            if channel.is_some() {
                config.playback.channel = channel;
            }
            config.validate()?;
            commands::handle_analyze(&config, &file, every)?;
        }
        Commands::Bands {
            overrides,
            sample_rate,
        } => {
            overrides.apply(&mut config);
            config.validate()?;
            commands::handle_bands(
                config.analyzer.band_type,
                config.analyzer.number_of_samples,
                sample_rate,
            );
        }
        Commands::Config { write } => {
            commands::handle_config(&config, write)?;
        }
        Commands::Completions { .. } | Commands::Logs { .. } => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "bandscope",
            "bands",
            "--band-type",
            "twenty-six-band",
            "--samples",
            "2048",
            "--smoothing",
            "corrected",
        ])
        .unwrap();

        let Commands::Bands { overrides, .. } = cli.command else {
            panic!("expected bands command");
        };
        let mut config = BandscopeConfig::default();
        overrides.apply(&mut config);

        assert_eq!(config.analyzer.band_type, BandType::TwentySixBand);
        assert_eq!(config.analyzer.number_of_samples, 2048);
        assert_eq!(config.analyzer.smoothing, SmoothingMode::Corrected);
        assert_eq!(config.analyzer.fall_speed, 0.08);
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut config = BandscopeConfig::default();
        AnalyzerOverrides::default().apply(&mut config);
        assert_eq!(config, BandscopeConfig::default());
    }
}
