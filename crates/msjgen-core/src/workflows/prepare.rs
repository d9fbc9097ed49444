use crate::core::io::cfg::CfgFile;
use crate::core::io::ini::{ConfigFileError, IniFile};
use crate::core::io::msj::{MdMsjFile, PreparationMsjFile};
use crate::core::io::shell::{MultisimJob, MultisimScript, QUERY_SCRIPT_NAME, StructureQueryScript};
use crate::core::io::traits::{ConfigFile, EmitError, JobFile};
use crate::core::models::protocol::ProtocolConfiguration;
use crate::core::models::system::SystemBuilderConfig;
use crate::engine::config::{ConfigError, RunSettings, build_system_config};
use crate::engine::error::{ProtocolError, ValidationErrors};
use crate::engine::options::{InputOptions, Section};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::validator::ProtocolOptionsValidator;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

const JOB_FILE_COUNT: u64 = 5;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Invalid run settings: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read input file '{path}': {source}", path = path.display())]
    File {
        path: PathBuf,
        #[source]
        source: ConfigFileError,
    },

    #[error("Failed to write '{path}': {source}", path = path.display())]
    Emit {
        path: PathBuf,
        #[source]
        source: EmitError,
    },

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Structure file '{}' does not exist", .0.display())]
    MissingStructureFile(PathBuf),

    #[error("Working directory '{}' already exists. Remove it or choose another one", .0.display())]
    WorkdirExists(PathBuf),

    #[error("'ions_away' is on but the indices of the atoms matching '{asl}' are unknown")]
    MissingAtomIndices { asl: String },
}

/// The validated contents of an input file, minus the run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInput {
    pub system: SystemBuilderConfig,
    pub protocol: ProtocolConfiguration,
}

/// Facts about the input structure that only the Schrödinger suite can compute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureFacts {
    /// Total formal charge of the structure.
    pub charge: i64,
    /// Indices of the atoms matching `ion_awayfrom`; needed when `ions_away` is on.
    pub ion_awayfrom_atoms: Option<Vec<usize>>,
}

/// A freshly created working directory holding a copy of the input structure and the
/// structure query script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workdir {
    path: PathBuf,
}

impl Workdir {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    pub fn query_script(&self) -> PathBuf {
        self.join(QUERY_SCRIPT_NAME)
    }
}

/// Reads an input file into its three sections.
///
/// # Errors
///
/// Fails when the file cannot be read, is malformed, or has no `[protocol]` section.
/// Sections with other names are ignored with a warning.
pub fn load_options(path: &Path) -> Result<InputOptions, WorkflowError> {
    let file_error = |source| WorkflowError::File {
        path: path.to_path_buf(),
        source,
    };
    let document = IniFile::read_from_path(path).map_err(file_error)?;
    let protocol = Section::Protocol.name();
    if !document.has_section(protocol) {
        return Err(file_error(ConfigFileError::MissingSection(protocol.to_string())));
    }
    for name in InputOptions::foreign_sections(&document) {
        warn!(section = name, "Ignoring unrecognized section.");
    }
    let options = InputOptions::from_document(&document);
    debug!(
        settings = options.settings.len(),
        build_geometry = options.build_geometry.len(),
        protocol = options.protocol.len(),
        "Input file read."
    );
    Ok(options)
}

/// Validates the `[build_geometry]` and `[protocol]` sections and checks every section for
/// unknown keys.
///
/// # Errors
///
/// Returns every problem found in any section.
#[instrument(skip_all, name = "validate_input")]
pub fn resolve_input(
    options: &InputOptions,
    reporter: &ProgressReporter,
) -> Result<ResolvedInput, WorkflowError> {
    reporter.report(Progress::PhaseStart { name: "Validation" });

    // Unknown [protocol] keys are reported by the validator itself.
    let unknown: Vec<ProtocolError> = [&options.settings, &options.build_geometry]
        .into_iter()
        .flat_map(|section| section.unknown_keys())
        .map(ProtocolError::from)
        .collect();
    let system = build_system_config(&options.build_geometry);
    let protocol = ProtocolOptionsValidator::new(&options.protocol).into_result();

    let outcome = match (system, protocol) {
        (Ok(system), Ok(protocol)) => match ValidationErrors::from_errors(unknown) {
            None => Ok(ResolvedInput { system, protocol }),
            Some(errors) => Err(errors),
        },
        (Err(errors), Ok(_)) | (Ok(_), Err(errors)) => Err(errors.prefixed(unknown)),
        (Err(first), Err(second)) => {
            let mut errors = first.prefixed(unknown);
            errors.extend(second.into_inner());
            Err(errors)
        }
    };
    reporter.report(Progress::PhaseFinish);

    match outcome {
        Ok(input) => {
            info!(
                stages = input.protocol.stages().len(),
                additional_stages = input.protocol.additional_stages().len(),
                "Input validated."
            );
            Ok(input)
        }
        Err(errors) => {
            warn!(errors = errors.len(), "Input rejected.");
            Err(errors.into())
        }
    }
}

/// Creates the working directory, copies the structure into it and writes the structure
/// query script.
///
/// # Errors
///
/// Fails when the structure file is missing or the working directory already exists; a
/// previous run is never overwritten.
#[instrument(skip_all, name = "create_workdir")]
pub fn create_workdir(
    run: &RunSettings,
    reporter: &ProgressReporter,
) -> Result<Workdir, WorkflowError> {
    if !run.structure_file.is_file() {
        return Err(WorkflowError::MissingStructureFile(run.structure_file.clone()));
    }
    if run.workdir.exists() {
        return Err(WorkflowError::WorkdirExists(run.workdir.clone()));
    }

    reporter.report(Progress::PhaseStart {
        name: "Creating working directory",
    });
    fs::create_dir_all(&run.workdir).map_err(|source| WorkflowError::Io {
        path: run.workdir.clone(),
        source,
    })?;
    let workdir = Workdir {
        path: run.workdir.clone(),
    };

    let structure_name = run.structure_file_name();
    let copy = workdir.join(&structure_name);
    fs::copy(&run.structure_file, &copy).map_err(|source| WorkflowError::Io {
        path: copy.clone(),
        source,
    })?;
    reporter.report(Progress::FileWritten {
        name: structure_name,
    });

    emit(&workdir, QUERY_SCRIPT_NAME, &StructureQueryScript, reporter)?;
    reporter.report(Progress::PhaseFinish);

    info!(workdir = %workdir.path().display(), "Working directory created.");
    Ok(workdir)
}

/// Writes the preparation and production job files into `workdir`.
///
/// Returns the paths of the written files in the order they were written.
///
/// # Errors
///
/// Fails when `ions_away` is on but `facts` carries no atom indices, or when a file cannot
/// be written.
#[instrument(skip_all, name = "prepare_workflow")]
pub fn write_job_files(
    workdir: &Workdir,
    run: &RunSettings,
    input: &ResolvedInput,
    facts: &StructureFacts,
    reporter: &ProgressReporter,
) -> Result<Vec<PathBuf>, WorkflowError> {
    let system = &input.system;
    if system.ions_away && facts.ion_awayfrom_atoms.is_none() {
        return Err(WorkflowError::MissingAtomIndices {
            asl: system.ion_awayfrom.clone(),
        });
    }

    reporter.report(Progress::PhaseStart {
        name: "Writing job files",
    });
    reporter.report(Progress::JobFiles {
        total: JOB_FILE_COUNT,
    });

    let names = run.names();
    let structure_name = run.structure_file_name();
    let preparation_script = MultisimScript::new(
        MultisimJob::Preparation {
            structure_file: &structure_name,
        },
        &run.desmond_path,
        run.windows,
        names,
    );
    let md_script = MultisimScript::new(
        MultisimJob::Production,
        &run.desmond_path,
        run.windows,
        names,
    );

    let mut written = Vec::with_capacity(JOB_FILE_COUNT as usize);
    written.push(emit(
        workdir,
        &names.preparation_msj(),
        &PreparationMsjFile::new(system, facts.charge, facts.ion_awayfrom_atoms.as_deref()),
        reporter,
    )?);
    written.push(emit(
        workdir,
        &preparation_script.file_name(),
        &preparation_script,
        reporter,
    )?);
    written.push(emit(
        workdir,
        &names.md_msj(),
        &MdMsjFile::new(&input.protocol, names),
        reporter,
    )?);
    written.push(emit(
        workdir,
        &names.md_cfg(),
        &CfgFile::new(&input.protocol),
        reporter,
    )?);
    written.push(emit(workdir, &md_script.file_name(), &md_script, reporter)?);

    reporter.report(Progress::PhaseFinish);
    info!(
        files = written.len(),
        velocity_seed = input.protocol.velocity_seed(),
        "Job files written."
    );
    Ok(written)
}

/// Creates the working directory and writes every job file, for callers that know the
/// structure facts up front.
///
/// # Errors
///
/// See [`create_workdir`] and [`write_job_files`].
pub fn run(
    run: &RunSettings,
    input: &ResolvedInput,
    facts: &StructureFacts,
    reporter: &ProgressReporter,
) -> Result<Vec<PathBuf>, WorkflowError> {
    let workdir = create_workdir(run, reporter)?;
    write_job_files(&workdir, run, input, facts, reporter)
}

fn emit<F>(
    workdir: &Workdir,
    name: &str,
    file: &F,
    reporter: &ProgressReporter,
) -> Result<PathBuf, WorkflowError>
where
    F: JobFile<Error = EmitError>,
{
    let path = workdir.join(name);
    file.write_to_path(&path)
        .map_err(|source| WorkflowError::Emit {
            path: path.clone(),
            source,
        })?;
    debug!(file = name, "Job file written.");
    reporter.report(Progress::FileWritten {
        name: name.to_string(),
    });
    Ok(path)
}
