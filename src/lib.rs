//! Perceptual band analysis of magnitude spectra.
//!
//! A [`BandAnalyzer`] reduces the raw spectrum produced by a [`SpectrumSource`] to a
//! handful of bands laid out by a [`BandType`] preset. Each band carries a
//! self-calibrating level, a peak-hold envelope and a smoothed mean, and the levels
//! combine into a single amplitude estimate. The output is meant to drive
//! real-time visualizations.

pub mod amplitude;
pub mod analyzer;
pub mod config;
pub mod index;
pub mod layout;
pub mod logging;
pub mod source;
pub mod window;

pub use amplitude::AmplitudeEstimator;
pub use analyzer::{
    AnalyzerSettings, BandAnalyzer, BandFrame, NormalizationMode, SmoothingMode, StructuralReset,
    LEVEL_EPSILON,
};
pub use index::{band_bin_range, frequency_to_spectrum_index};
pub use layout::BandType;
pub use source::{SpectrumSource, StaticSpectrum, WavSpectrumSource};
pub use window::FftWindow;
