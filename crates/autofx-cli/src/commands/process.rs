//! Offline chain processing: run a WAV through effects block by block.

use std::path::PathBuf;

use anyhow::Context;
use autofx_catalog::EffectKind;
use autofx_classify::{Classifier, SpectralClassifier, decode_to_mono, prepare_model_input};
use autofx_engine::{EngineShared, GraphScheduler, MAX_CHANNELS, MAX_SLOTS};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use super::common::{read_wav, write_wav};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Effect chain as comma-separated ids (e.g. "feedback-delay,chorus")
    #[arg(short, long, value_delimiter = ',')]
    chain: Vec<String>,

    /// Reference files to classify; each match appends its effect
    #[arg(long, value_name = "REF")]
    classify: Vec<PathBuf>,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16 or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let kinds = resolve_chain(&args)?;
    anyhow::ensure!(!kinds.is_empty(), "no effects specified; use --chain or --classify");
    anyhow::ensure!(kinds.len() <= MAX_SLOTS, "chain too long (max {MAX_SLOTS} effects)");
    anyhow::ensure!(args.block_size > 0, "block size must be nonzero");

    println!("Reading {}...", args.input.display());
    let mut data = read_wav(&args.input)?;
    anyhow::ensure!(
        !data.channels.is_empty() && data.channels.len() <= MAX_CHANNELS,
        "expected mono or stereo input, got {} channels",
        data.channels.len()
    );
    anyhow::ensure!(
        data.sample_rate > 0,
        "input declares an invalid sample rate of 0 Hz"
    );
    println!(
        "  {} frames, {} channel(s), {} Hz",
        data.frames(),
        data.channels.len(),
        data.sample_rate
    );

    let shared = EngineShared::new();
    for &kind in &kinds {
        shared.append_kind(kind);
    }
    let mut scheduler = GraphScheduler::new(shared);
    scheduler.prepare(data.sample_rate as f32, data.channels.len());

    let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
    println!("Processing through: {}", names.join(" -> "));

    let frames = data.frames();
    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut start = 0;
    while start < frames {
        let end = (start + args.block_size).min(frames);
        let mut buffers: Vec<&mut [f32]> = data
            .channels
            .iter_mut()
            .map(|ch| &mut ch[start..end])
            .collect();
        scheduler.process_block(&mut buffers);
        pb.set_position(end as u64);
        start = end;
    }
    pb.finish_and_clear();
    tracing::debug!(frames, effects = kinds.len(), "offline processing done");

    write_wav(&args.output, &data, args.bit_depth)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

/// Collect the chain from explicit ids and classified reference files.
fn resolve_chain(args: &ProcessArgs) -> anyhow::Result<Vec<EffectKind>> {
    let mut kinds = Vec::new();
    for id in &args.chain {
        let kind = EffectKind::from_id(id)
            .with_context(|| format!("unknown effect '{id}' (see `autofx effects`)"))?;
        kinds.push(kind);
    }

    if !args.classify.is_empty() {
        let classifier = SpectralClassifier::new();
        for path in &args.classify {
            let decoded = decode_to_mono(path)?;
            let input = prepare_model_input(&decoded.samples, decoded.sample_rate)?;
            let kind = classifier.classify(&input)?;
            println!("{} -> {}", path.display(), kind.name());
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sample_rate_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("zero.wav");
        let output = dir.path().join("out.wav");

        // hound panics when asked to write a zero rate, so write a valid
        // file and zero out nSamplesPerSec (bytes 24..28) after. Its reader
        // checks nAvgBytesPerSec == block_align * rate, so zero that too.
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&input, spec).unwrap();
        writer.write_sample(0_i16).unwrap();
        writer.finalize().unwrap();
        let mut bytes = std::fs::read(&input).unwrap();
        bytes[24..32].fill(0);
        std::fs::write(&input, bytes).unwrap();

        let args = ProcessArgs {
            input,
            output,
            chain: vec!["chorus".into()],
            classify: Vec::new(),
            block_size: 64,
            bit_depth: 32,
        };
        let err = run(args).unwrap_err();
        assert!(err.to_string().contains("sample rate"), "{err}");
    }
}
