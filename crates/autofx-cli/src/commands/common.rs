//! WAV IO helpers shared by the subcommands.

use std::path::Path;

use anyhow::Context;

/// Planar audio plus its source sample rate.
pub struct WavData {
    /// One buffer per channel, all the same length.
    pub channels: Vec<Vec<f32>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl WavData {
    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// Read a WAV file into planar f32 buffers.
///
/// Integer sources are scaled to [-1, 1].
pub fn read_wav(path: &Path) -> anyhow::Result<WavData> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let num_channels = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let frames = interleaved.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(frames); num_channels];
    for frame in interleaved.chunks_exact(num_channels) {
        for (ch, &sample) in frame.iter().enumerate() {
            channels[ch].push(sample);
        }
    }

    Ok(WavData {
        channels,
        sample_rate: spec.sample_rate,
    })
}

/// Write planar f32 buffers as a WAV file.
///
/// `bit_depth` 16 writes integer PCM; 32 writes IEEE float.
pub fn write_wav(path: &Path, data: &WavData, bit_depth: u16) -> anyhow::Result<()> {
    anyhow::ensure!(
        bit_depth == 16 || bit_depth == 32,
        "unsupported bit depth {bit_depth} (expected 16 or 32)"
    );
    let spec = hound::WavSpec {
        channels: u16::try_from(data.channels.len()).context("too many channels")?,
        sample_rate: data.sample_rate,
        bits_per_sample: bit_depth,
        sample_format: if bit_depth == 16 {
            hound::SampleFormat::Int
        } else {
            hound::SampleFormat::Float
        },
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for frame in 0..data.frames() {
        for channel in &data.channels {
            let sample = channel[frame];
            if bit_depth == 16 {
                let clamped = sample.clamp(-1.0, 1.0);
                writer.write_sample((clamped * f32::from(i16::MAX)) as i16)?;
            } else {
                writer.write_sample(sample)?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt.wav");
        let data = WavData {
            channels: vec![vec![0.0, 0.5, -0.5], vec![1.0, -1.0, 0.25]],
            sample_rate: 48_000,
        };
        write_wav(&path, &data, 32).unwrap();

        let back = read_wav(&path).unwrap();
        assert_eq!(back.sample_rate, 48_000);
        assert_eq!(back.channels, data.channels);
    }

    #[test]
    fn int16_read_scales_to_unit_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("i16.wav");
        let data = WavData {
            channels: vec![vec![0.0, 0.5, -0.5]],
            sample_rate: 44_100,
        };
        write_wav(&path, &data, 16).unwrap();

        let back = read_wav(&path).unwrap();
        for (a, b) in back.channels[0].iter().zip(&data.channels[0]) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }
}
