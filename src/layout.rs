//! Band layout presets.
//!
//! Each preset is a fixed, ascending list of center frequencies together with a
//! bandwidth ratio. A band spans `center / ratio ..= center * ratio`, so a ratio of
//! 2^(1/2) gives octave-wide bands and 2^(1/6) gives third-octave bands.

use serde::{Deserialize, Serialize};

const FOUR_BAND: [f32; 4] = [125.0, 500.0, 1000.0, 2000.0];

const FOUR_BAND_VISUAL: [f32; 4] = [250.0, 400.0, 600.0, 800.0];

const EIGHT_BAND: [f32; 8] = [63.0, 125.0, 500.0, 1000.0, 2000.0, 4000.0, 6000.0, 8000.0];

const TEN_BAND: [f32; 10] = [
    31.5, 63.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
];

const TWENTY_SIX_BAND: [f32; 26] = [
    25.0, 31.5, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0, 400.0, 500.0,
    630.0, 800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0, 5000.0, 6300.0, 8000.0,
];

const THIRTY_ONE_BAND: [f32; 31] = [
    20.0, 25.0, 31.5, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0, 400.0,
    500.0, 630.0, 800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0, 5000.0, 6300.0,
    8000.0, 10000.0, 12500.0, 16000.0, 20000.0,
];

/// 2^(1/2)
const HALF_OCTAVE_RATIO: f32 = 1.414;
/// 2^(1/3)
const THIRD_OCTAVE_RATIO: f32 = 1.260;
/// 2^(1/6)
const SIXTH_OCTAVE_RATIO: f32 = 1.122;

/// Band layout preset used to reduce a raw spectrum.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum BandType {
    /// Four octave-wide bands from 125 Hz to 2 kHz
    FourBand,
    /// Four narrow mid-range bands tuned for visuals
    FourBandVisual,
    /// Eight bands from 63 Hz to 8 kHz
    EightBand,
    /// Classic ten-band graphic equalizer layout
    #[default]
    TenBand,
    /// Third-octave bands from 25 Hz to 8 kHz
    TwentySixBand,
    /// Third-octave bands covering the full audible range
    ThirtyOneBand,
}

impl BandType {
    pub const ALL: [BandType; 6] = [
        BandType::FourBand,
        BandType::FourBandVisual,
        BandType::EightBand,
        BandType::TenBand,
        BandType::TwentySixBand,
        BandType::ThirtyOneBand,
    ];

    /// Ascending center frequencies in Hz.
    pub const fn center_frequencies(self) -> &'static [f32] {
        match self {
            Self::FourBand => &FOUR_BAND,
            Self::FourBandVisual => &FOUR_BAND_VISUAL,
            Self::EightBand => &EIGHT_BAND,
            Self::TenBand => &TEN_BAND,
            Self::TwentySixBand => &TWENTY_SIX_BAND,
            Self::ThirtyOneBand => &THIRTY_ONE_BAND,
        }
    }

    /// Multiplicative half-width of every band in this layout. Always greater than 1.
    pub const fn bandwidth(self) -> f32 {
        match self {
            Self::FourBand | Self::EightBand | Self::TenBand => HALF_OCTAVE_RATIO,
            Self::FourBandVisual => THIRD_OCTAVE_RATIO,
            Self::TwentySixBand | Self::ThirtyOneBand => SIXTH_OCTAVE_RATIO,
        }
    }

    pub const fn band_count(self) -> usize {
        self.center_frequencies().len()
    }

    fn name(self) -> &'static str {
        match self {
            Self::FourBand => "four-band",
            Self::FourBandVisual => "four-band-visual",
            Self::EightBand => "eight-band",
            Self::TenBand => "ten-band",
            Self::TwentySixBand => "twenty-six-band",
            Self::ThirtyOneBand => "thirty-one-band",
        }
    }
}

impl std::fmt::Display for BandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_counts() {
        let expected = [4, 4, 8, 10, 26, 31];
        for (band_type, count) in BandType::ALL.iter().zip(expected) {
            assert_eq!(band_type.band_count(), count, "{band_type}");
            assert_eq!(band_type.center_frequencies().len(), count);
        }
    }

    #[test]
    fn test_center_frequencies_ascending() {
        for band_type in BandType::ALL {
            let freqs = band_type.center_frequencies();
            assert!(
                freqs.windows(2).all(|w| w[0] < w[1]),
                "{band_type} is not ascending"
            );
        }
    }

    #[test]
    fn test_bandwidth_above_one() {
        for band_type in BandType::ALL {
            assert!(band_type.bandwidth() > 1.0);
        }
    }

    #[test]
    fn test_ten_band_is_default() {
        let default = BandType::default();
        assert_eq!(default, BandType::TenBand);
        assert_eq!(default.center_frequencies()[0], 31.5);
        assert_eq!(default.bandwidth(), 1.414);
    }

    #[test]
    fn test_display_matches_serde_name() {
        #[derive(Deserialize)]
        struct Wrapper {
            band_type: BandType,
        }
        for band_type in BandType::ALL {
            let toml_str = format!("band_type = \"{band_type}\"");
            let parsed: Wrapper = toml::from_str(&toml_str).unwrap();
            assert_eq!(parsed.band_type, band_type);
        }
    }
}
