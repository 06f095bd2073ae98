//! Catalog listing command.

use autofx_catalog::{ALL_KINDS, EffectCatalog, EffectKind};
use autofx_core::{ParamDescriptor, ParamUnit};
use clap::Args;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for a specific effect id
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,
}

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    if let Some(id) = &args.effect {
        let kind = EffectKind::from_id(id)
            .ok_or_else(|| anyhow::anyhow!("unknown effect '{id}'"))?;
        print_detail(kind);
    } else {
        println!("{:16} {:14} {:10} {}", "Id", "Name", "Category", "Params");
        for kind in ALL_KINDS {
            println!(
                "{:16} {:14} {:10} {}",
                kind.id(),
                kind.name(),
                kind.category().name(),
                EffectCatalog::param_count(kind)
            );
        }
        println!();
        println!("  autofx effects <id> for parameter details");
    }
    Ok(())
}

fn print_detail(kind: EffectKind) {
    println!("{} ({})", kind.name(), kind.category().name());
    println!();

    let fx = EffectCatalog::create(kind, 48_000.0);
    if fx.effect_param_count() == 0 {
        println!("No parameters.");
        return;
    }

    println!("{:14} {:>10} {:>20}", "Parameter", "Default", "Range");
    for i in 0..fx.effect_param_count() {
        if let Some(desc) = fx.effect_param_info(i) {
            println!(
                "{:14} {:>10} {:>20}",
                desc.name,
                format_value(&desc, desc.default),
                format!(
                    "{} .. {}",
                    format_value(&desc, desc.min),
                    format_value(&desc, desc.max)
                ),
            );
        }
    }
    println!();
    println!(
        "  autofx process input.wav output.wav --chain {}",
        kind.id()
    );
}

fn format_value(desc: &ParamDescriptor, value: f32) -> String {
    let suffix = match desc.unit {
        ParamUnit::None => "",
        ParamUnit::Percent => " %",
        ParamUnit::Hertz => " Hz",
        ParamUnit::Milliseconds => " ms",
        ParamUnit::Decibels => " dB",
    };
    format!("{value}{suffix}")
}
