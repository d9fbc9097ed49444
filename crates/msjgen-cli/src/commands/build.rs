use crate::cli::BuildArgs;
use crate::error::Result;
use crate::utils::parser::apply_set_values;
use crate::utils::progress::CliProgressHandler;
use crate::utils::schrodinger::SuiteRunner;
use msjgen::engine::config::{RunSettings, RunSettingsBuilder};
use msjgen::engine::options::InputOptions;
use msjgen::engine::progress::ProgressReporter;
use msjgen::workflows::prepare::{self, StructureFacts};
use tracing::info;

/// Run settings from `[settings]`, with command-line paths taking precedence.
pub fn run_settings(options: &InputOptions, args: &BuildArgs) -> Result<RunSettings> {
    let mut builder = RunSettingsBuilder::from_options(&options.settings);
    if let Some(workdir) = &args.workdir {
        builder = builder.workdir(workdir.clone());
    }
    if let Some(structure) = &args.structure {
        builder = builder.structure_file(structure.clone());
    }
    Ok(builder.build()?)
}

pub async fn run(args: BuildArgs) -> Result<()> {
    info!("Reading input file {:?}", &args.input);
    let mut options = prepare::load_options(&args.input)?;
    apply_set_values(&mut options, &args.set_values)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let input = tokio::task::block_in_place(|| prepare::resolve_input(&options, &reporter))?;
    let run = run_settings(&options, &args)?;
    info!(
        structure = %run.structure_file.display(),
        workdir = %run.workdir.display(),
        "Run settings resolved."
    );

    let workdir = tokio::task::block_in_place(|| prepare::create_workdir(&run, &reporter))?;
    let runner = SuiteRunner::new(&run, workdir.path());
    let structure = run.structure_file_name();

    let charge = match args.charge {
        Some(charge) => {
            info!(charge, "Using the charge given on the command line.");
            charge
        }
        None => {
            println!("Querying the total charge of {structure}...");
            runner.total_charge(&structure).await?
        }
    };
    let ion_awayfrom_atoms = if input.system.ions_away {
        println!(
            "Querying atoms matching '{}'...",
            input.system.ion_awayfrom
        );
        Some(
            runner
                .atom_indices(&structure, &input.system.ion_awayfrom)
                .await?,
        )
    } else {
        None
    };
    let facts = StructureFacts {
        charge,
        ion_awayfrom_atoms,
    };

    let written = tokio::task::block_in_place(|| {
        prepare::write_job_files(&workdir, &run, &input, &facts, &reporter)
    })?;
    println!(
        "Wrote {} job files to {}",
        written.len(),
        workdir.path().display()
    );

    let names = run.names();
    if args.run || input.protocol.run_preparation() {
        println!("Running {}...", names.preparation_sh());
        runner.run_script(&names.preparation_sh()).await?;
    }
    if args.run || input.protocol.run_protocols() {
        println!("Running {}...", names.md_sh());
        runner.run_script(&names.md_sh()).await?;
    }
    Ok(())
}
