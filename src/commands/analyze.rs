//! Offline analysis of a WAV file.
//!
//! Steps a [`WavSpectrumSource`] through the file at the configured frame rate,
//! feeds every frame to a [`BandAnalyzer`] and prints the resulting levels.

use anyhow::anyhow;
use bandscope::config::BandscopeConfig;
use bandscope::{BandAnalyzer, WavSpectrumSource};
use std::io::{self, Write};
use std::path::Path;

/// Analyzes `file` and prints one line every `every` frames followed by a summary.
///
/// # Errors
/// - If the WAV file cannot be opened or decoded
/// - If `every` is zero
/// - If writing to stdout fails
pub fn handle_analyze(config: &BandscopeConfig, file: &Path, every: usize) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_analysis(config, file, every, &mut out)
}

/// Runs the analysis loop, writing frames and the summary to `out`.
pub fn run_analysis<W: Write>(
    config: &BandscopeConfig,
    file: &Path,
    every: usize,
    out: &mut W,
) -> anyhow::Result<()> {
    if every == 0 {
        return Err(anyhow!("--every must be at least 1"));
    }

    let mut source = WavSpectrumSource::open(file, config.playback.channel)?;
    let mut analyzer = BandAnalyzer::new(config.analyzer.clone());
    let delta_time = 1.0 / config.playback.frame_rate;

    tracing::info!(
        "Analyzing {} with {} bands, {} bins, {} fps",
        file.display(),
        analyzer.band_count(),
        config.analyzer.number_of_samples,
        config.playback.frame_rate
    );

    write_header(&analyzer, out)?;

    while !source.is_finished() {
        source.advance(delta_time);
        analyzer.update(&mut source, delta_time);

        let frame = analyzer.frame_count();
        if (frame - 1) % every as u64 == 0 {
            write!(
                out,
                "{:>6} {:>8.3} {:>6.3} {:>6.3} |",
                frame,
                source.position(),
                analyzer.amplitude(),
                analyzer.amplitude_buffer()
            )?;
            for level in analyzer.levels() {
                write!(out, " {level:>5.2}")?;
            }
            writeln!(out)?;
        }
    }

    write_summary(&analyzer, &source, out)?;

    tracing::info!(
        "Analysis finished: {} frames, highest amplitude sum {:.3}",
        analyzer.frame_count(),
        analyzer.amplitude_highest()
    );
    Ok(())
}

fn write_header<W: Write>(analyzer: &BandAnalyzer, out: &mut W) -> io::Result<()> {
    write!(out, "{:>6} {:>8} {:>6} {:>6} |", "frame", "time", "amp", "buf")?;
    for &center in analyzer.settings().band_type.center_frequencies() {
        write!(out, " {:>5}", format_frequency(center))?;
    }
    writeln!(out)
}

fn write_summary<W: Write>(
    analyzer: &BandAnalyzer,
    source: &WavSpectrumSource,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Frames analyzed:   {}", analyzer.frame_count())?;
    writeln!(out, "Duration:          {:.3}s", source.duration())?;
    writeln!(out, "Highest amplitude: {:.4}", analyzer.amplitude_highest())?;
    writeln!(out, "Band maxima:")?;
    let centers = analyzer.settings().band_type.center_frequencies();
    for (&center, max_level) in centers.iter().zip(analyzer.max_levels()) {
        writeln!(out, "  {:>6}  {:.6}", format_frequency(center), max_level)?;
    }
    Ok(())
}

/// Short label for a center frequency, e.g. `31.5`, `500`, `16k`.
pub(crate) fn format_frequency(hz: f32) -> String {
    if hz >= 1000.0 {
        let khz = hz / 1000.0;
        if khz.fract() == 0.0 {
            format!("{khz:.0}k")
        } else {
            format!("{khz:.1}k")
        }
    } else if hz.fract() == 0.0 {
        format!("{hz:.0}")
    } else {
        format!("{hz:.1}")
    }
}
