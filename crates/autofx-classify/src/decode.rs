//! Decode an audio file to a mono f32 buffer via symphonia.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::{ClassifyError, is_supported_extension};

/// Decoded audio: mono samples plus the source sample rate.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono f32 samples, channels averaged.
    pub samples: Vec<f32>,
    /// Sample rate of the source file in Hz.
    pub sample_rate: u32,
}

/// Decode a file to mono f32 samples.
///
/// Enforces the extension allow-list, probes the container, decodes the
/// first audio track, and averages channels down to mono. Decode errors in
/// individual packets after the first successful one are tolerated (some
/// encoders write a final short frame) and simply end the stream.
pub fn decode_to_mono(path: &Path) -> Result<DecodedAudio, ClassifyError> {
    if !is_supported_extension(path) {
        return Err(ClassifyError::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(ClassifyError::NoAudioTrack)?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(ClassifyError::NoAudioTrack)?;
    if sample_rate == 0 {
        return Err(ClassifyError::InvalidSampleRate(sample_rate));
    }

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                if samples.is_empty() {
                    return Err(e.into());
                }
                tracing::debug!("decode stopped mid-stream: {e}");
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                // Recoverable per the symphonia contract; skip the packet.
                tracing::debug!("skipping undecodable packet: {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);

        let buf = sample_buf.get_or_insert_with(|| {
            SampleBuffer::<f32>::new(decoded.capacity() as u64, spec)
        });
        buf.copy_interleaved_ref(decoded);

        // Average interleaved frames down to mono.
        for frame in buf.samples().chunks_exact(channels) {
            let sum: f32 = frame.iter().sum();
            samples.push(sum / channels as f32);
        }
    }

    if samples.is_empty() {
        return Err(ClassifyError::EmptyAudio);
    }

    tracing::debug!(
        path = %path.display(),
        samples = samples.len(),
        sample_rate,
        "decoded audio file"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_wav(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer
                .write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn decodes_mono_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.wav");
        let sine: Vec<f32> = (0..4410)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect();
        write_test_wav(&path, &sine, 44100, 1);

        let decoded = decode_to_mono(&path).unwrap();
        assert_eq!(decoded.sample_rate, 44100);
        assert_eq!(decoded.samples.len(), 4410);
        // 16-bit quantization, loose tolerance.
        assert!((decoded.samples[100] - sine[100]).abs() < 1e-3);
    }

    #[test]
    fn stereo_mixes_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        // Interleaved L=0.8, R=0.2; mono average is 0.5.
        let interleaved: Vec<f32> = (0..2000)
            .map(|i| if i % 2 == 0 { 0.8 } else { 0.2 })
            .collect();
        write_test_wav(&path, &interleaved, 22050, 2);

        let decoded = decode_to_mono(&path).unwrap();
        assert_eq!(decoded.samples.len(), 1000);
        assert!((decoded.samples[10] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = decode_to_mono(Path::new("/nonexistent/file.wav")).unwrap_err();
        assert!(matches!(err, ClassifyError::Io(_)));
    }

    #[test]
    fn wrong_extension_rejected_before_open() {
        let err = decode_to_mono(Path::new("/nonexistent/file.flac")).unwrap_err();
        assert!(matches!(err, ClassifyError::UnsupportedExtension { .. }));
    }

    #[test]
    fn garbage_wav_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"not a wav file at all").unwrap();
        assert!(decode_to_mono(&path).is_err());
    }
}
