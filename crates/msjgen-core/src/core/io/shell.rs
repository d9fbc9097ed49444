use super::names::JobNames;
use super::traits::{EmitError, JobFile};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the helper script run through the Schrödinger Python interpreter.
pub const QUERY_SCRIPT_NAME: &str = "schrod_script.py";

const GPU_LAUNCH_OPTION: &str = r#"stage[1].set_family.md.jlaunch_opt=["-gpu"]"#;

const QUERY_SCRIPT: &str = r#"import argparse
import sys

from schrodinger.structure import StructureReader
from schrodinger.application.jaguar.utils import get_total_charge
from schrodinger.structutils.analyze import evaluate_asl


def parse_args(argv):
    parser = argparse.ArgumentParser(description=__doc__)
    parser.add_argument("-i", "--input", help="Input file.")
    parser.add_argument("-get", help="Option.")
    parser.add_argument("-asl", help="ASL.")
    return vars(parser.parse_args(argv))


def main(argv):
    opts = parse_args(argv)
    for st in StructureReader(opts["input"]):
        if opts["get"] == "charge":
            print(get_total_charge(st))
        elif opts["get"] == "atoms_number":
            print(evaluate_asl(st, opts["asl"]))
        break


if __name__ == "__main__":
    main(sys.argv[1:])
"#;

/// Path of a program shipped with the Schrödinger suite, e.g. `utilities/multisim`.
///
/// Windows installations carry an `.exe` suffix.
pub fn suite_executable(desmond_path: &Path, relative: &str, windows: bool) -> PathBuf {
    let path = desmond_path.join(relative);
    if windows {
        path.with_extension("exe")
    } else {
        path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultisimJob<'a> {
    /// System building from the copied structure file.
    Preparation { structure_file: &'a str },
    /// The multi-stage protocol run on the prepared system.
    Production,
}

/// A one-line shell script launching `multisim`.
pub struct MultisimScript<'a> {
    job: MultisimJob<'a>,
    desmond_path: &'a Path,
    windows: bool,
    names: &'a JobNames,
}

impl<'a> MultisimScript<'a> {
    pub fn new(
        job: MultisimJob<'a>,
        desmond_path: &'a Path,
        windows: bool,
        names: &'a JobNames,
    ) -> Self {
        Self {
            job,
            desmond_path,
            windows,
            names,
        }
    }

    /// Name of the script inside the working directory.
    pub fn file_name(&self) -> String {
        match self.job {
            MultisimJob::Preparation { .. } => self.names.preparation_sh(),
            MultisimJob::Production => self.names.md_sh(),
        }
    }

    fn arguments(&self) -> String {
        let names = self.names;
        match self.job {
            MultisimJob::Preparation { structure_file } => format!(
                "-HOST \"localhost\" -maxjob 1 -JOBNAME preparation -m {} {} -o {} -WAIT",
                names.preparation_msj(),
                structure_file,
                names.preparation_output()
            ),
            MultisimJob::Production => format!(
                "-HOST localhost -JOBNAME {} -maxjob 1 -cpu 1 -m {} -c {} {} -mode umbrella -set '{}' -o {} -LOCAL",
                names.md_jobname(),
                names.md_msj(),
                names.md_cfg(),
                names.preparation_output(),
                GPU_LAUNCH_OPTION,
                names.md_output()
            ),
        }
    }
}

impl JobFile for MultisimScript<'_> {
    type Error = EmitError;

    fn write_to(&self, writer: &mut impl Write) -> Result<(), Self::Error> {
        let executable = suite_executable(self.desmond_path, "utilities/multisim", self.windows);
        writeln!(writer, "{} {}", executable.display(), self.arguments())?;
        Ok(())
    }
}

/// The Python helper that reports the total charge of a structure or the indices of the
/// atoms matching an ASL expression.
pub struct StructureQueryScript;

impl JobFile for StructureQueryScript {
    type Error = EmitError;

    fn write_to(&self, writer: &mut impl Write) -> Result<(), Self::Error> {
        writer.write_all(QUERY_SCRIPT.as_bytes())?;
        Ok(())
    }
}
