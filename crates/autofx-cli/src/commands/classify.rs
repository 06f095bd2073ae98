//! Classification command: file in, effect kind out.

use std::path::PathBuf;

use autofx_classify::{Classifier, SpectralClassifier, decode_to_mono, prepare_model_input};
use clap::Args;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Audio files to classify (.wav or .mp3)
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,
}

pub fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    let classifier = SpectralClassifier::new();

    for path in &args.inputs {
        let decoded = decode_to_mono(path)?;
        let input = prepare_model_input(&decoded.samples, decoded.sample_rate)?;
        let kind = classifier.classify(&input)?;
        println!(
            "{}: {} ({}, id {})",
            path.display(),
            kind.name(),
            kind.category().name(),
            kind.id()
        );
    }
    Ok(())
}
