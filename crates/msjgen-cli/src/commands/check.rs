use crate::cli::CheckArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::apply_set_values;
use crate::utils::progress::CliProgressHandler;
use msjgen::core::models::protocol::ProtocolConfiguration;
use msjgen::core::models::system::SystemBuilderConfig;
use msjgen::engine::progress::ProgressReporter;
use msjgen::workflows::prepare::{self, ResolvedInput};
use serde::Serialize;
use std::fmt::Write;
use tracing::info;

#[derive(Serialize)]
struct ResolvedDump<'a> {
    build_geometry: &'a SystemBuilderConfig,
    protocol: &'a ProtocolConfiguration,
}

pub async fn run(args: CheckArgs) -> Result<()> {
    info!("Reading input file {:?}", &args.input);
    let mut options = prepare::load_options(&args.input)?;
    apply_set_values(&mut options, &args.set_values)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let input = tokio::task::block_in_place(|| prepare::resolve_input(&options, &reporter))?;

    print!("{}", summarize(&input.protocol));

    if args.dump {
        println!();
        println!("{}", dump(&input)?);
    }
    Ok(())
}

fn dump(input: &ResolvedInput) -> Result<String> {
    let resolved = ResolvedDump {
        build_geometry: &input.system,
        protocol: &input.protocol,
    };
    toml::to_string_pretty(&resolved).map_err(|e| CliError::Other(e.into()))
}

/// One line per stage, in execution order.
pub fn summarize(protocol: &ProtocolConfiguration) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "{:<12} {:>8} {:>10} {:>8} {:<10} {:>10}",
        "Stage", "Enabled", "Time (ps)", "T (K)", "Ensemble", "Restraints"
    );
    for stage in protocol.equilibration_stages() {
        let _ = writeln!(
            text,
            "{:<12} {:>8} {:>10} {:>8} {:<10} {:>10}",
            stage.stage().to_string(),
            if stage.is_enabled() { "yes" } else { "no" },
            stage.time(),
            stage.temperature(),
            format!("{} {}", stage.ensemble(), stage.method()),
            stage.restraints().total()
        );
    }
    for stage in protocol.additional_stages() {
        let _ = writeln!(
            text,
            "{:<12} {:>8} {:>10} {:>8} {:<10} {:>10}",
            format!("extra{}", stage.index()),
            "yes",
            stage.time(),
            stage.temperature(),
            format!("{} {}", stage.ensemble(), stage.method()),
            stage.restraints().total()
        );
    }
    let production = protocol.production_stage();
    let _ = writeln!(
        text,
        "{:<12} {:>8} {:>10} {:>8} {:<10} {:>10}",
        "production",
        if production.is_enabled() { "yes" } else { "no" },
        production.time(),
        production.temperature(),
        format!("{} {}", production.ensemble(), production.method()),
        production.restraints().total()
    );
    let _ = writeln!(text, "Velocity seed: {}", protocol.velocity_seed());
    text
}
