//! Spectrum source backed by a pre-rendered WAV file.
//!
//! The file is decoded up front into a single stream (a mono mix-down or one
//! selected channel). Each frame takes the `2N` samples ending at the playhead,
//! windows them and runs a forward FFT, producing `N` magnitude bins.

use super::SpectrumSource;
use crate::window::FftWindow;
use anyhow::{anyhow, Context, Result};
use rustfft::{num_complex::Complex, FftPlanner};
use std::path::Path;

/// Plays a WAV file through an FFT, one frame at a time.
pub struct WavSpectrumSource {
    /// Decoded samples in -1.0..=1.0
    samples: Vec<f32>,
    sample_rate: u32,
    /// Playhead position in seconds
    position: f64,
    fft_planner: FftPlanner<f32>,
    scratch: Vec<Complex<f32>>,
}

impl WavSpectrumSource {
    /// Opens a WAV file and decodes it.
    ///
    /// # Arguments
    /// * `path` - WAV file to read (integer PCM or 32-bit float)
    /// * `channel` - Channel to analyze, or `None` to average all channels
    ///
    /// # Errors
    /// - If the file cannot be opened or is not a valid WAV file
    /// - If `channel` is out of range for the file
    pub fn open(path: &Path, channel: Option<usize>) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file {}", path.display()))?;
        let spec = reader.spec();
        let num_channels = spec.channels as usize;

        if let Some(channel) = channel {
            if channel >= num_channels {
                return Err(anyhow!(
                    "Channel {} is out of range (file has {} channel{})",
                    channel,
                    num_channels,
                    if num_channels == 1 { "" } else { "s" }
                ));
            }
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<Vec<f32>, _>>()
                .context("Failed to decode float samples")?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| s as f32 * scale))
                    .collect::<Result<Vec<f32>, _>>()
                    .context("Failed to decode integer samples")?
            }
        };

        let samples = extract_stream(&interleaved, num_channels, channel);

        tracing::info!(
            "Loaded {}: {}Hz, {} channel(s), {:.2}s, analyzing {}",
            path.display(),
            spec.sample_rate,
            num_channels,
            samples.len() as f64 / spec.sample_rate as f64,
            match channel {
                Some(c) => format!("channel {c}"),
                None => "mix-down".to_string(),
            }
        );

        Ok(Self::from_samples(samples, spec.sample_rate))
    }

    /// Creates a source from already decoded mono samples.
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            position: 0.0,
            fft_planner: FftPlanner::new(),
            scratch: Vec::new(),
        }
    }

    /// Moves the playhead forward by `delta_time` seconds.
    pub fn advance(&mut self, delta_time: f32) {
        self.position += f64::from(delta_time.max(0.0));
    }

    /// Moves the playhead to `seconds`.
    pub fn seek(&mut self, seconds: f64) {
        self.position = seconds.max(0.0);
    }

    /// Current playhead position in seconds.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Total length of the decoded stream in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Whether the playhead has reached the end of the stream.
    pub fn is_finished(&self) -> bool {
        self.position >= self.duration()
    }

    fn playhead_sample(&self) -> usize {
        let index = (self.position * f64::from(self.sample_rate)) as usize;
        index.min(self.samples.len())
    }
}

impl SpectrumSource for WavSpectrumSource {
    fn sample_rate(&self) -> f32 {
        self.sample_rate as f32
    }

    /// The stream chosen at open time is always analyzed; `channel` is ignored.
    fn spectrum_data(&mut self, buffer: &mut [f32], _channel: usize, window: FftWindow) {
        let bins = buffer.len();
        if bins == 0 {
            return;
        }
        let fft_size = bins * 2;

        // Samples ending at the playhead, zero-padded before the start of the file
        let end = self.playhead_sample();
        let start = end as isize - fft_size as isize;
        self.scratch.clear();
        self.scratch.extend((0..fft_size).map(|i| {
            let source_index = start + i as isize;
            let sample = if source_index >= 0 {
                self.samples[source_index as usize]
            } else {
                0.0
            };
            Complex::new(sample * window.coefficient(i, fft_size), 0.0)
        }));

        let fft = self.fft_planner.plan_fft_forward(fft_size);
        fft.process(&mut self.scratch);

        let scale = 1.0 / bins as f32;
        for (out, bin) in buffer.iter_mut().zip(self.scratch.iter()) {
            *out = bin.norm() * scale;
        }
    }
}

/// Pulls one stream out of interleaved samples, averaging channels when none is selected.
fn extract_stream(interleaved: &[f32], num_channels: usize, channel: Option<usize>) -> Vec<f32> {
    match (num_channels, channel) {
        (0, _) => Vec::new(),
        (1, _) => interleaved.to_vec(),
        (n, Some(c)) => interleaved.chunks_exact(n).map(|frame| frame[c]).collect(),
        (n, None) => interleaved
            .chunks_exact(n)
            .map(|frame| frame.iter().sum::<f32>() / n as f32)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use std::path::PathBuf;

    fn write_sine_wav(name: &str, frequency: f32, channels: u16) -> PathBuf {
        let path = std::env::temp_dir().join(format!("bandscope_{}_{}.wav", name, std::process::id()));
        let spec = hound::WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..44100 {
            let value = (2.0 * PI * frequency * i as f32 / 44100.0).sin() * 0.5;
            for c in 0..channels {
                // Right channel is silent
                let sample = if c == 0 { value } else { 0.0 };
                writer.write_sample((sample * i16::MAX as f32) as i16).unwrap();
            }
        }
        writer.finalize().unwrap();
        path
    }

    fn loudest_bin(bins: &[f32]) -> usize {
        bins.iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_sine_peaks_at_expected_bin() {
        let path = write_sine_wav("sine", 1000.0, 1);
        let mut source = WavSpectrumSource::open(&path, None).unwrap();
        source.advance(0.5);

        let mut bins = vec![0.0; 1024];
        source.spectrum_data(&mut bins, 0, FftWindow::BlackmanHarris);

        let peak = loudest_bin(&bins);
        assert!((45..=47).contains(&peak), "peak at bin {peak}");
        assert_eq!(source.sample_rate(), 44100.0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_start_of_file_is_silent() {
        let path = write_sine_wav("start", 440.0, 1);
        let mut source = WavSpectrumSource::open(&path, None).unwrap();

        let mut bins = vec![1.0; 512];
        source.spectrum_data(&mut bins, 0, FftWindow::Hanning);
        assert!(bins.iter().all(|&b| b == 0.0));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_channel_selection() {
        let path = write_sine_wav("stereo", 1000.0, 2);

        let mut right = WavSpectrumSource::open(&path, Some(1)).unwrap();
        right.advance(0.5);
        let mut bins = vec![0.0; 256];
        right.spectrum_data(&mut bins, 0, FftWindow::BlackmanHarris);
        assert!(bins.iter().all(|&b| b == 0.0));

        assert!(WavSpectrumSource::open(&path, Some(2)).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_playhead() {
        let mut source = WavSpectrumSource::from_samples(vec![0.0; 4410], 44100);
        assert!((source.duration() - 0.1).abs() < 1e-9);
        assert!(!source.is_finished());
        source.advance(0.05);
        source.advance(-1.0);
        assert!((source.position() - 0.05).abs() < 1e-6);
        source.advance(0.06);
        assert!(source.is_finished());
        source.seek(0.0);
        assert_eq!(source.position(), 0.0);
    }

    #[test]
    fn test_missing_file() {
        let result = WavSpectrumSource::open(Path::new("/nonexistent/bandscope.wav"), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_stream_mixdown() {
        let interleaved = [1.0, 0.0, 0.5, 0.5];
        assert_eq!(extract_stream(&interleaved, 2, None), vec![0.5, 0.5]);
        assert_eq!(extract_stream(&interleaved, 2, Some(0)), vec![1.0, 0.5]);
    }
}
