//! Window functions applied to time-domain samples before the FFT.

use std::f32::consts::PI;

/// Window function requested from a spectrum source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FftWindow {
    Rectangular,
    Triangle,
    Hamming,
    Hanning,
    Blackman,
    /// Four-term Blackman-Harris; what the band analyzer asks for
    #[default]
    BlackmanHarris,
}

impl FftWindow {
    /// Window coefficient for sample `index` of a window of `len` samples.
    pub fn coefficient(self, index: usize, len: usize) -> f32 {
        if len <= 1 {
            return 1.0;
        }
        let x = index as f32 / (len - 1) as f32;
        match self {
            Self::Rectangular => 1.0,
            Self::Triangle => 1.0 - (2.0 * x - 1.0).abs(),
            Self::Hamming => 0.54 - 0.46 * (2.0 * PI * x).cos(),
            Self::Hanning => 0.5 * (1.0 - (2.0 * PI * x).cos()),
            Self::Blackman => 0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos(),
            Self::BlackmanHarris => {
                0.35875 - 0.48829 * (2.0 * PI * x).cos() + 0.14128 * (4.0 * PI * x).cos()
                    - 0.01168 * (6.0 * PI * x).cos()
            }
        }
    }

    /// Multiplies `samples` in place by this window.
    pub fn apply(self, samples: &mut [f32]) {
        let len = samples.len();
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample *= self.coefficient(i, len);
        }
    }
}
