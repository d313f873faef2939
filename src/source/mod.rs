//! Spectrum sources feeding the band analyzer.
//!
//! A source writes the current magnitude spectrum into a caller-provided buffer
//! once per frame. The analyzer never performs the transform itself; new kinds of
//! input (pre-rendered files, live capture, precomputed spectra) plug in here.

pub mod wav;

pub use wav::WavSpectrumSource;

use crate::window::FftWindow;

/// Provider of magnitude spectra, polled once per frame.
pub trait SpectrumSource {
    /// Output sample rate in Hz of the audio this source analyzes.
    fn sample_rate(&self) -> f32;

    /// Writes the current magnitude spectrum into `buffer`.
    ///
    /// The buffer length is the number of bins requested, covering `0 ..= sample_rate / 2`.
    /// `channel` selects the audio channel when the source has several.
    fn spectrum_data(&mut self, buffer: &mut [f32], channel: usize, window: FftWindow);
}

/// A fixed spectrum replayed on every frame.
///
/// Shorter spectra are zero-padded and longer ones truncated to the requested length.
#[derive(Debug, Clone)]
pub struct StaticSpectrum {
    bins: Vec<f32>,
    sample_rate: f32,
}

impl StaticSpectrum {
    pub fn new(bins: Vec<f32>, sample_rate: f32) -> Self {
        Self { bins, sample_rate }
    }

    /// Silent spectrum of `len` bins.
    pub fn silent(len: usize, sample_rate: f32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Replaces the replayed bins.
    pub fn set_bins(&mut self, bins: Vec<f32>) {
        self.bins = bins;
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }
}

impl SpectrumSource for StaticSpectrum {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn spectrum_data(&mut self, buffer: &mut [f32], _channel: usize, _window: FftWindow) {
        copy_padded(&self.bins, buffer);
    }
}

/// Copies `from` into `to`, truncating or zero-filling the tail.
pub(crate) fn copy_padded(from: &[f32], to: &mut [f32]) {
    let shared = from.len().min(to.len());
    to[..shared].copy_from_slice(&from[..shared]);
    to[shared..].fill(0.0);
}
