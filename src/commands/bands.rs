//! Band layout inspection.

use super::analyze::format_frequency;
use bandscope::{band_bin_range, BandType};

/// Prints each band of `band_type` with the spectrum bins it sums.
pub fn handle_bands(band_type: BandType, number_of_samples: usize, sample_rate: f32) {
    print!("{}", render_band_table(band_type, number_of_samples, sample_rate));
}

/// Formats the band table for a layout, spectrum length and sample rate.
pub fn render_band_table(band_type: BandType, number_of_samples: usize, sample_rate: f32) -> String {
    let bandwidth = band_type.bandwidth();
    let bin_width = sample_rate / (2.0 * number_of_samples as f32);

    let mut table = format!(
        "{} ({} bands, bandwidth x{:.3}) at {}Hz, {} bins of {:.2}Hz\n\n",
        band_type,
        band_type.band_count(),
        bandwidth,
        sample_rate,
        number_of_samples,
        bin_width
    );
    table.push_str(&format!(
        "{:>4} {:>7} {:>10} {:>10} {:>6} {:>6} {:>5}\n",
        "band", "center", "low Hz", "high Hz", "imin", "imax", "bins"
    ));

    for (band, &center) in band_type.center_frequencies().iter().enumerate() {
        let range = band_bin_range(center, bandwidth, number_of_samples, sample_rate);
        let bins = if range.is_empty() {
            0
        } else {
            range.end() - range.start() + 1
        };
        table.push_str(&format!(
            "{:>4} {:>7} {:>10.1} {:>10.1} {:>6} {:>6} {:>5}\n",
            band,
            format_frequency(center),
            center / bandwidth,
            center * bandwidth,
            range.start(),
            range.end(),
            bins
        ));
    }

    table
}
