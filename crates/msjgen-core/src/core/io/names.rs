use std::path::Path;

/// File names of one run, all derived from the structure file's base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobNames {
    basename: String,
}

impl JobNames {
    pub fn new(basename: impl Into<String>) -> Self {
        Self {
            basename: basename.into(),
        }
    }

    /// Takes the file name up to its first `.`, so `complex.min.mae` yields `complex`.
    ///
    /// Returns `None` for paths without a usable file name.
    pub fn from_structure_file(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let basename = file_name.split('.').next()?;
        (!basename.is_empty()).then(|| Self::new(basename))
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn md_msj(&self) -> String {
        format!("{}_md.msj", self.basename)
    }

    pub fn md_cfg(&self) -> String {
        format!("{}_md.cfg", self.basename)
    }

    pub fn md_sh(&self) -> String {
        format!("{}_md.sh", self.basename)
    }

    pub fn md_output(&self) -> String {
        format!("{}_md-out.cms", self.basename)
    }

    pub fn md_jobname(&self) -> String {
        format!("{}_md", self.basename)
    }

    pub fn preparation_msj(&self) -> String {
        format!("{}_preparation.msj", self.basename)
    }

    pub fn preparation_sh(&self) -> String {
        format!("{}_preparation.sh", self.basename)
    }

    pub fn preparation_output(&self) -> String {
        format!("{}_preparation-out.cms", self.basename)
    }
}
