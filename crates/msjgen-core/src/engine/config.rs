use crate::core::io::names::JobNames;
use crate::core::list::{TokenParseError, parse_number};
use crate::core::models::system::{SystemBuilderConfig, SystemBuilderConfigBuilder};
use crate::engine::error::{ProtocolError, ValidationErrors};
use crate::engine::fields::FieldReader;
use crate::engine::options::SectionOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Environment variable '{name}' used in '{parameter}' is not set")]
    UnsetEnvironmentVariable {
        parameter: &'static str,
        name: String,
    },
    #[error("Cannot derive job names from structure file '{}'", .0.display())]
    InvalidStructureFile(PathBuf),
}

/// Where the run reads its structure and Schrödinger installation from, and where it
/// writes its job files.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub structure_file: PathBuf,
    pub desmond_path: PathBuf,
    pub windows: bool,
    pub workdir: PathBuf,
    names: JobNames,
}

impl RunSettings {
    pub fn names(&self) -> &JobNames {
        &self.names
    }

    pub fn basename(&self) -> &str {
        self.names.basename()
    }

    /// Name of the structure file once copied into the working directory.
    pub fn structure_file_name(&self) -> String {
        self.structure_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.mae", self.basename()))
    }
}

#[derive(Default)]
pub struct RunSettingsBuilder {
    structure_file: Option<PathBuf>,
    desmond_path: Option<String>,
    windows: Option<bool>,
    workdir: Option<PathBuf>,
}

impl RunSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the `[settings]` section; builder calls made afterwards take precedence.
    pub fn from_options(options: &SectionOptions) -> Self {
        let reader = FieldReader::new(options);
        let mut builder = Self::new()
            .windows(reader.flag("windows"))
            .desmond_path(&reader.text("desmond_path"))
            .workdir(PathBuf::from(reader.text("workdir")));
        if let Some(file) = reader.raw("file").filter(|file| !file.is_empty()) {
            builder = builder.structure_file(PathBuf::from(file));
        }
        builder
    }

    pub fn structure_file(mut self, path: PathBuf) -> Self {
        self.structure_file = Some(path);
        self
    }
    /// Accepts a literal path or a `$VARIABLE` reference expanded at build time.
    pub fn desmond_path(mut self, path: &str) -> Self {
        self.desmond_path = Some(path.to_string());
        self
    }
    pub fn windows(mut self, windows: bool) -> Self {
        self.windows = Some(windows);
        self
    }
    pub fn workdir(mut self, path: PathBuf) -> Self {
        self.workdir = Some(path);
        self
    }

    pub fn build(self) -> Result<RunSettings, ConfigError> {
        self.build_with_env(|name| std::env::var(name).ok())
    }

    /// Like [`RunSettingsBuilder::build`], resolving `$VARIABLE` references through `lookup`.
    pub fn build_with_env(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<RunSettings, ConfigError> {
        let structure_file = self
            .structure_file
            .ok_or(ConfigError::MissingParameter("file"))?;
        let names = JobNames::from_structure_file(&structure_file)
            .ok_or_else(|| ConfigError::InvalidStructureFile(structure_file.clone()))?;
        let desmond_path = self
            .desmond_path
            .ok_or(ConfigError::MissingParameter("desmond_path"))?;
        let desmond_path = match desmond_path.strip_prefix('$') {
            Some(name) => lookup(name)
                .map(PathBuf::from)
                .ok_or_else(|| ConfigError::UnsetEnvironmentVariable {
                    parameter: "desmond_path",
                    name: name.to_string(),
                })?,
            None => PathBuf::from(desmond_path),
        };
        Ok(RunSettings {
            structure_file,
            desmond_path,
            windows: self.windows.unwrap_or(false),
            workdir: self
                .workdir
                .ok_or(ConfigError::MissingParameter("workdir"))?,
            names,
        })
    }
}

impl RunSettings {
    /// Path of `name` inside the working directory.
    pub fn in_workdir(&self, name: impl AsRef<Path>) -> PathBuf {
        self.workdir.join(name)
    }
}

fn parse_box_size(raw: &str) -> Result<Vec<f64>, TokenParseError> {
    let expected = "box size of 1 or 3 numbers";
    let values = raw
        .split_whitespace()
        .map(parse_number)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| TokenParseError::new(raw, expected))?;
    match values.len() {
        1 | 3 => Ok(values),
        _ => Err(TokenParseError::new(raw, expected)),
    }
}

/// Builds the system-builder settings from the `[build_geometry]` section.
///
/// Only keys present in the section override the defaults of [`SystemBuilderConfig`].
///
/// # Errors
///
/// Returns every value that fails to parse.
pub fn build_system_config(
    options: &SectionOptions,
) -> Result<SystemBuilderConfig, ValidationErrors> {
    let mut reader = FieldReader::new(options);
    let defaults = SystemBuilderConfig::default();
    let text = |key: &str, default: &str| {
        options
            .explicit(key)
            .map_or_else(|| default.to_string(), str::to_string)
    };
    let flag = |key: &str, default: bool| {
        options
            .explicit(key)
            .map_or(default, crate::core::list::parse_flag)
    };

    let mut builder = SystemBuilderConfigBuilder::new()
        .counterions(flag("counterions", defaults.counterions))
        .counterion_species(
            &text("counterions_positive_ion", &defaults.counterions_positive_ion),
            &text("counterions_negative_ion", &defaults.counterions_negative_ion),
        )
        .number(&text("number", &defaults.number))
        .shape(&text("shape", &defaults.shape))
        .size_type(&text("size_type", &defaults.size_type))
        .ions_away(flag("ions_away", defaults.ions_away))
        .ion_awayfrom(&text("ion_awayfrom", &defaults.ion_awayfrom))
        .override_forcefield(&text("override_forcefield", &defaults.override_forcefield))
        .rezero_system(flag("rezero_system", defaults.rezero_system))
        .forcefield(&text("forcefield", &defaults.forcefield))
        .salt(flag("salt", defaults.salt))
        .salt_species(
            &text("positive_ion", &defaults.positive_ion),
            &text("negative_ion", &defaults.negative_ion),
        )
        .solvent(&text("solvent", &defaults.solvent));

    if options.is_set("ion_awaydistance") {
        builder = builder.ion_awaydistance(reader.number("ion_awaydistance"));
    }
    if options.is_set("concentration") {
        builder = builder.concentration(reader.number("concentration"));
    }
    if let Some(raw) = options.explicit("size") {
        match parse_box_size(raw) {
            Ok(size) => builder = builder.size(size),
            Err(source) => reader.push(ProtocolError::invalid_value("size", source)),
        }
    }

    match ValidationErrors::from_errors(reader.into_errors()) {
        Some(errors) => Err(errors),
        None => Ok(builder.build()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::options::Section;

    fn settings(pairs: &[(&str, &str)]) -> SectionOptions {
        SectionOptions::from_pairs(Section::Settings, pairs.iter().copied())
    }

    fn geometry(pairs: &[(&str, &str)]) -> SectionOptions {
        SectionOptions::from_pairs(Section::BuildGeometry, pairs.iter().copied())
    }

    #[test]
    fn run_settings_expand_the_desmond_path_variable() {
        let options = settings(&[("file", "inputs/complex.mae")]);
        let run = RunSettingsBuilder::from_options(&options)
            .build_with_env(|name| (name == "SCHRODINGER").then(|| "/opt/schrodinger".into()))
            .unwrap();
        assert_eq!(run.desmond_path, PathBuf::from("/opt/schrodinger"));
        assert_eq!(run.workdir, PathBuf::from("md_run"));
        assert_eq!(run.basename(), "complex");
        assert_eq!(run.structure_file_name(), "complex.mae");
        assert!(!run.windows);
    }

    #[test]
    fn unset_variable_is_reported_by_name() {
        let options = settings(&[("file", "complex.mae")]);
        let err = RunSettingsBuilder::from_options(&options)
            .build_with_env(|_| None)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsetEnvironmentVariable {
                parameter: "desmond_path",
                name: "SCHRODINGER".into()
            }
        );
    }

    #[test]
    fn builder_calls_override_the_settings_section() {
        let options = settings(&[("file", "a.mae"), ("desmond_path", "/x"), ("windows", "yes")]);
        let run = RunSettingsBuilder::from_options(&options)
            .workdir(PathBuf::from("run2"))
            .structure_file(PathBuf::from("b.mae"))
            .build_with_env(|_| None)
            .unwrap();
        assert_eq!(run.workdir, PathBuf::from("run2"));
        assert_eq!(run.basename(), "b");
        assert!(run.windows);
        assert_eq!(run.in_workdir("b_md.msj"), PathBuf::from("run2/b_md.msj"));
    }

    #[test]
    fn structure_file_is_required() {
        let err = RunSettingsBuilder::from_options(&settings(&[]))
            .build_with_env(|_| None)
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("file"));
    }

    #[test]
    fn system_config_applies_only_explicit_keys() {
        let config = build_system_config(&geometry(&[
            ("solvent", "TIP4P"),
            ("size", "12.5"),
            ("salt", "on"),
            ("concentration", "0.2"),
        ]))
        .unwrap();
        assert_eq!(config.solvent, "TIP4P");
        assert_eq!(config.size, vec![12.5]);
        assert!(config.salt);
        assert_eq!(config.concentration, 0.2);
        assert_eq!(config.shape, "orthorhombic");
        assert!(config.rezero_system);
    }

    #[test]
    fn system_config_reports_malformed_numbers() {
        let errors = build_system_config(&geometry(&[
            ("size", "10 10"),
            ("ion_awaydistance", "far"),
        ]))
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
