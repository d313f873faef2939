//! Overall loudness estimate derived from the per-band levels.

use crate::analyzer::{SmoothingMode, LEVEL_EPSILON};

/// Sum of band levels, normalized against the loudest sum ever seen.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeEstimator {
    amplitude: f32,
    amplitude_highest: f32,
    amplitude_buffer: f32,
}

impl Default for AmplitudeEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl AmplitudeEstimator {
    pub fn new() -> Self {
        Self {
            amplitude: 0.0,
            amplitude_highest: LEVEL_EPSILON,
            amplitude_buffer: 0.0,
        }
    }

    /// Folds one frame of band levels into the estimate.
    ///
    /// In [`SmoothingMode::Reference`] the buffer is `max(amplitude - falldown, amplitude)`,
    /// which is always just `amplitude`. [`SmoothingMode::Corrected`] holds the previous
    /// buffer value and lets it fall by `falldown` per frame instead.
    pub fn update(&mut self, levels: &[f32], falldown: f32, smoothing: SmoothingMode) {
        let current: f32 = levels.iter().sum();
        if current > self.amplitude_highest {
            self.amplitude_highest = current;
        }

        self.amplitude = current / self.amplitude_highest;
        self.amplitude_buffer = match smoothing {
            SmoothingMode::Reference => (self.amplitude - falldown).max(self.amplitude),
            SmoothingMode::Corrected => (self.amplitude_buffer - falldown).max(self.amplitude),
        };
    }

    /// Current total level relative to the highest total seen, normally in `0..=1`.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Running maximum of the summed band levels. Never decreases.
    pub fn amplitude_highest(&self) -> f32 {
        self.amplitude_highest
    }

    /// Peak-held amplitude.
    pub fn amplitude_buffer(&self) -> f32 {
        self.amplitude_buffer
    }
}
