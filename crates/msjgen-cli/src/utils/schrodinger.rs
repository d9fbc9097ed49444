use crate::error::{CliError, Result};
use msjgen::core::io::shell::{QUERY_SCRIPT_NAME, suite_executable};
use msjgen::engine::config::RunSettings;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Runs Schrödinger suite programs and generated scripts inside the working directory.
pub struct SuiteRunner<'a> {
    desmond_path: &'a Path,
    windows: bool,
    workdir: &'a Path,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(run: &'a RunSettings, workdir: &'a Path) -> Self {
        Self {
            desmond_path: &run.desmond_path,
            windows: run.windows,
            workdir,
        }
    }

    /// Total charge of `structure`, a file inside the working directory.
    pub async fn total_charge(&self, structure: &str) -> Result<i64> {
        let query = format!("charge of {structure}");
        let output = self.query(&query, &["-i", structure, "-get", "charge"]).await?;
        parse_charge(&output).ok_or_else(|| CliError::Query {
            query,
            message: format!("expected an integer, got '{}'", output.trim()),
        })
    }

    /// Indices of the atoms of `structure` matching the ASL expression `asl`.
    pub async fn atom_indices(&self, structure: &str, asl: &str) -> Result<Vec<usize>> {
        let query = format!("atoms of {structure} matching '{asl}'");
        let output = self
            .query(&query, &["-i", structure, "-get", "atoms_number", "-asl", asl])
            .await?;
        parse_atom_indices(&output).ok_or_else(|| CliError::Query {
            query,
            message: format!("expected a list of atom indices, got '{}'", output.trim()),
        })
    }

    async fn query(&self, query: &str, args: &[&str]) -> Result<String> {
        let program = suite_executable(self.desmond_path, "run", self.windows);
        debug!(program = %program.display(), ?args, "Running structure query.");
        let output = Command::new(&program)
            .arg(QUERY_SCRIPT_NAME)
            .args(args)
            .current_dir(self.workdir)
            .output()
            .await
            .map_err(|e| CliError::Query {
                query: query.to_string(),
                message: format!("cannot start '{}': {e}", program.display()),
            })?;
        if !output.status.success() {
            return Err(CliError::Query {
                query: query.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs a generated shell script with `bash` and waits for it.
    pub async fn run_script(&self, name: &str) -> Result<()> {
        let path: PathBuf = self.workdir.join(name);
        info!(script = %path.display(), "Running script.");
        let status = Command::new("bash")
            .arg(name)
            .current_dir(self.workdir)
            .status()
            .await?;
        if status.success() {
            Ok(())
        } else {
            Err(CliError::Script {
                path,
                status: status.to_string(),
            })
        }
    }
}

/// The last non-empty line of the query output, as an integer.
pub fn parse_charge(output: &str) -> Option<i64> {
    let line = output.lines().rev().find(|line| !line.trim().is_empty())?;
    let value = line.trim();
    value.parse::<i64>().ok().or_else(|| {
        // Some suite versions print the charge as a float.
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i64)
    })
}

/// Parses a printed list such as `[1, 2, 3]`.
pub fn parse_atom_indices(output: &str) -> Option<Vec<usize>> {
    let line = output.lines().rev().find(|line| !line.trim().is_empty())?;
    line.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .replace(',', " ")
        .split_whitespace()
        .map(|token| token.parse::<usize>().ok())
        .collect()
}
