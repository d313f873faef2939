//! Per-band analysis of a raw magnitude spectrum.
//!
//! Every frame the analyzer pulls a fresh spectrum from its source, sums the bins
//! under each band of the active [`BandType`], and normalizes each sum against the
//! loudest value that band has produced so far. On top of the normalized level it
//! keeps a peak-hold envelope that falls linearly in time and an exponential mean.
//! The summed levels feed an [`AmplitudeEstimator`].
//!
//! Calibration is self-referential: a level of `1.0` means "as loud as this band has
//! been since the last structural reset". Changing the spectrum length or the band
//! count goes through [`BandAnalyzer::reconfigure`], which reports what it reallocated.

use crate::amplitude::AmplitudeEstimator;
use crate::index::band_bin_range;
use crate::layout::BandType;
use crate::source::{copy_padded, SpectrumSource};
use crate::window::FftWindow;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Floor for every normalization denominator, so silent frames never divide by zero.
pub const LEVEL_EPSILON: f32 = 0.01;

/// Window the analyzer requests from its source.
pub const ANALYSIS_WINDOW: FftWindow = FftWindow::BlackmanHarris;

fn default_number_of_samples() -> usize {
    1024
}

fn default_fall_speed() -> f32 {
    0.08
}

fn default_sensitivity() -> f32 {
    8.0
}

/// How the per-band running maximum evolves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizationMode {
    /// The maximum only ever grows until the next structural reset
    #[default]
    Unbounded,
    /// The maximum relaxes toward the current band energy at `rate` per second,
    /// so a band recovers sensitivity after a loud passage
    Decaying { rate: f32 },
}

/// Formula used for the mean tracker and the amplitude peak-hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SmoothingMode {
    /// `mean = energy - (level - mean) * filter` and an amplitude buffer equal to the
    /// amplitude. Matches the established visual behavior.
    #[default]
    Reference,
    /// Single-pole low-pass of the level, and an amplitude buffer that holds its
    /// previous value and falls at the peak-hold rate
    Corrected,
}

/// Analyzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerSettings {
    /// Length of the raw spectrum buffer (a power of two is expected)
    #[serde(default = "default_number_of_samples")]
    pub number_of_samples: usize,
    /// Band layout preset
    #[serde(default)]
    pub band_type: BandType,
    /// Peak-hold fall rate in level units per second
    #[serde(default = "default_fall_speed")]
    pub fall_speed: f32,
    /// Steepness of the exponential mean filter
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    #[serde(default)]
    pub smoothing: SmoothingMode,
    #[serde(default)]
    pub normalization: NormalizationMode,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            number_of_samples: default_number_of_samples(),
            band_type: BandType::default(),
            fall_speed: default_fall_speed(),
            sensitivity: default_sensitivity(),
            smoothing: SmoothingMode::default(),
            normalization: NormalizationMode::default(),
        }
    }
}

/// What a call to [`BandAnalyzer::reconfigure`] reallocated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuralReset {
    /// The raw spectrum buffer was resized
    pub spectrum: bool,
    /// Band state (levels, peaks, means, running maxima) was reinitialized
    pub bands: bool,
}

impl StructuralReset {
    pub fn is_empty(&self) -> bool {
        !self.spectrum && !self.bands
    }
}

/// Owned copy of one frame of analyzer output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandFrame {
    pub levels: Vec<f32>,
    pub peak_levels: Vec<f32>,
    pub mean_levels: Vec<f32>,
    pub amplitude: f32,
    pub amplitude_buffer: f32,
}

/// Reduces raw spectra to normalized band levels, frame by frame.
#[derive(Debug, Clone)]
pub struct BandAnalyzer {
    settings: AnalyzerSettings,
    raw_spectrum: Vec<f32>,
    levels: Vec<f32>,
    peak_levels: Vec<f32>,
    mean_levels: Vec<f32>,
    max_levels: Vec<f32>,
    amplitude: AmplitudeEstimator,
    frame_count: u64,
}

impl Default for BandAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerSettings::default())
    }
}

impl BandAnalyzer {
    pub fn new(settings: AnalyzerSettings) -> Self {
        let band_count = settings.band_type.band_count();
        let mut analyzer = Self {
            raw_spectrum: vec![0.0; settings.number_of_samples],
            levels: Vec::new(),
            peak_levels: Vec::new(),
            mean_levels: Vec::new(),
            max_levels: Vec::new(),
            amplitude: AmplitudeEstimator::new(),
            frame_count: 0,
            settings,
        };
        analyzer.reset_bands(band_count);
        analyzer
    }

    /// Applies new settings, reallocating only what their structure requires.
    ///
    /// The raw spectrum is reallocated when `number_of_samples` changes and band
    /// state is reinitialized when the band count changes, discarding calibration.
    /// Switching between layouts with the same band count keeps calibration.
    /// Calling this again with the same settings changes nothing.
    pub fn reconfigure(&mut self, settings: AnalyzerSettings) -> StructuralReset {
        let mut reset = StructuralReset::default();

        if settings.number_of_samples != self.raw_spectrum.len() {
            self.raw_spectrum = vec![0.0; settings.number_of_samples];
            reset.spectrum = true;
        }

        let band_count = settings.band_type.band_count();
        if band_count != self.levels.len() {
            self.reset_bands(band_count);
            reset.bands = true;
        }

        if !reset.is_empty() {
            tracing::debug!(
                "Structural reset: spectrum={} ({} bins), bands={} ({} x {})",
                reset.spectrum,
                settings.number_of_samples,
                reset.bands,
                band_count,
                settings.band_type
            );
        }

        self.settings = settings;
        reset
    }

    /// Runs one frame: pulls a spectrum from `source` and updates every band.
    ///
    /// # Arguments
    /// * `source` - Spectrum provider, asked for channel 0 with a Blackman-Harris window
    /// * `delta_time` - Seconds elapsed since the previous frame
    pub fn update<S: SpectrumSource + ?Sized>(&mut self, source: &mut S, delta_time: f32) {
        source.spectrum_data(&mut self.raw_spectrum, 0, ANALYSIS_WINDOW);
        let sample_rate = source.sample_rate();
        self.analyze(sample_rate, delta_time);
    }

    /// Runs one frame from a spectrum the caller already has.
    ///
    /// `spectrum` is copied into the raw buffer, truncated or zero-padded to
    /// `number_of_samples`.
    pub fn update_from_spectrum(&mut self, spectrum: &[f32], sample_rate: f32, delta_time: f32) {
        copy_padded(spectrum, &mut self.raw_spectrum);
        self.analyze(sample_rate, delta_time);
    }

    fn analyze(&mut self, sample_rate: f32, delta_time: f32) {
        let band_type = self.settings.band_type;
        let bandwidth = band_type.bandwidth();
        let smoothing = self.settings.smoothing;

        let falldown = self.settings.fall_speed * delta_time;
        let filter = (-self.settings.sensitivity * delta_time).exp();
        let relax = match self.settings.normalization {
            NormalizationMode::Unbounded => None,
            NormalizationMode::Decaying { rate } => Some(1.0 - (-rate * delta_time).exp()),
        };

        let spectrum_len = self.raw_spectrum.len();
        for (band, &center) in band_type.center_frequencies().iter().enumerate() {
            let range = band_bin_range(center, bandwidth, spectrum_len, sample_rate);
            let energy = band_energy(&self.raw_spectrum, range);

            let max_level = &mut self.max_levels[band];
            if let Some(relax) = relax {
                *max_level = (*max_level + (energy - *max_level) * relax).max(LEVEL_EPSILON);
            }
            *max_level = (*max_level).max(energy);

            let level = energy / guarded_divisor(*max_level);
            self.levels[band] = level;
            self.peak_levels[band] = (self.peak_levels[band] - falldown).max(level);

            let mean = self.mean_levels[band];
            self.mean_levels[band] = match smoothing {
                SmoothingMode::Reference => energy - (level - mean) * filter,
                SmoothingMode::Corrected => level + (mean - level) * filter,
            };
        }

        self.amplitude.update(&self.levels, falldown, smoothing);
        self.frame_count += 1;
    }

    fn reset_bands(&mut self, band_count: usize) {
        self.levels = vec![0.0; band_count];
        self.peak_levels = vec![0.0; band_count];
        self.mean_levels = vec![0.0; band_count];
        self.max_levels = vec![LEVEL_EPSILON; band_count];
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    pub fn band_count(&self) -> usize {
        self.levels.len()
    }

    /// Normalized energy per band, in `0..=1` once calibrated.
    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    /// Peak-hold envelope per band. Never below the matching level.
    pub fn peak_levels(&self) -> &[f32] {
        &self.peak_levels
    }

    pub fn mean_levels(&self) -> &[f32] {
        &self.mean_levels
    }

    /// Running maximum of raw band energy, the normalization denominator.
    pub fn max_levels(&self) -> &[f32] {
        &self.max_levels
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude.amplitude()
    }

    pub fn amplitude_buffer(&self) -> f32 {
        self.amplitude.amplitude_buffer()
    }

    pub fn amplitude_highest(&self) -> f32 {
        self.amplitude.amplitude_highest()
    }

    pub fn raw_spectrum(&self) -> &[f32] {
        &self.raw_spectrum
    }

    /// Frames analyzed since this analyzer was created.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Bin range summed for each band at the given sample rate.
    pub fn band_ranges(&self, sample_rate: f32) -> Vec<RangeInclusive<usize>> {
        let band_type = self.settings.band_type;
        band_type
            .center_frequencies()
            .iter()
            .map(|&center| {
                band_bin_range(center, band_type.bandwidth(), self.raw_spectrum.len(), sample_rate)
            })
            .collect()
    }

    pub fn snapshot(&self) -> BandFrame {
        BandFrame {
            levels: self.levels.clone(),
            peak_levels: self.peak_levels.clone(),
            mean_levels: self.mean_levels.clone(),
            amplitude: self.amplitude(),
            amplitude_buffer: self.amplitude_buffer(),
        }
    }
}

/// Sum of the bins in `range`; zero for an empty or out-of-range span.
fn band_energy(spectrum: &[f32], range: RangeInclusive<usize>) -> f32 {
    if range.is_empty() {
        return 0.0;
    }
    spectrum.get(range).map_or(0.0, |bins| bins.iter().sum())
}

/// The running maximum is floored at [`LEVEL_EPSILON`] and can never be zero here.
fn guarded_divisor(max_level: f32) -> f32 {
    debug_assert!(max_level != 0.0, "Max level is zero");
    if max_level > 0.0 {
        max_level
    } else {
        LEVEL_EPSILON
    }
}
