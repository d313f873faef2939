//! Frequency to spectrum-bin mapping.
//!
//! A raw spectrum of `N` bins covers `0 ..= sample_rate / 2`, so a frequency maps
//! linearly onto `floor(f / sample_rate * 2 * N)`.

use std::ops::RangeInclusive;

/// Maps a frequency in Hz to an index into a spectrum of `spectrum_len` bins.
///
/// The result is always within `0..spectrum_len` (or 0 for an empty spectrum),
/// including for frequencies at or above Nyquist, negative frequencies and NaN.
pub fn frequency_to_spectrum_index(frequency: f32, spectrum_len: usize, sample_rate: f32) -> usize {
    if spectrum_len == 0 {
        return 0;
    }
    let last = spectrum_len - 1;
    let position = (frequency / sample_rate * 2.0 * spectrum_len as f32).floor();

    if position.is_nan() || position <= 0.0 {
        0
    } else if position >= last as f32 {
        last
    } else {
        position as usize
    }
}

/// Inclusive bin range covered by a band centered on `center` with the given bandwidth ratio.
///
/// The range is empty when the lower edge maps past the upper edge, which cannot
/// happen for a ratio above 1 but is not assumed.
pub fn band_bin_range(
    center: f32,
    bandwidth: f32,
    spectrum_len: usize,
    sample_rate: f32,
) -> RangeInclusive<usize> {
    let imin = frequency_to_spectrum_index(center / bandwidth, spectrum_len, sample_rate);
    let imax = frequency_to_spectrum_index(center * bandwidth, spectrum_len, sample_rate);
    imin..=imax
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 1024;
    const RATE: f32 = 44100.0;

    #[test]
    fn test_linear_mapping() {
        // 1000 / 44100 * 2048 = 46.44
        assert_eq!(frequency_to_spectrum_index(1000.0, N, RATE), 46);
        assert_eq!(frequency_to_spectrum_index(0.0, N, RATE), 0);
    }

    #[test]
    fn test_clamped_at_nyquist_and_beyond() {
        assert_eq!(frequency_to_spectrum_index(RATE / 2.0, N, RATE), N - 1);
        assert_eq!(frequency_to_spectrum_index(96000.0, N, RATE), N - 1);
        assert_eq!(frequency_to_spectrum_index(f32::INFINITY, N, RATE), N - 1);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(frequency_to_spectrum_index(-50.0, N, RATE), 0);
        assert_eq!(frequency_to_spectrum_index(f32::NAN, N, RATE), 0);
        assert_eq!(frequency_to_spectrum_index(1000.0, 0, RATE), 0);
        assert_eq!(frequency_to_spectrum_index(1000.0, N, 0.0), N - 1);
    }

    #[test]
    fn test_monotonic_and_in_bounds() {
        let mut previous = 0;
        let mut frequency = 0.0f32;
        while frequency < 30000.0 {
            let index = frequency_to_spectrum_index(frequency, N, RATE);
            assert!(index < N);
            assert!(index >= previous, "index decreased at {frequency} Hz");
            previous = index;
            frequency += 7.3;
        }
    }

    #[test]
    fn test_band_bin_range() {
        let range = band_bin_range(1000.0, 1.414, N, RATE);
        assert_eq!(*range.start(), 32);
        assert_eq!(*range.end(), 65);
        assert!(range.contains(&46));
    }
}
