use crate::core::io::traits::ConfigFile;
use std::collections::BTreeMap;
use std::io::{self, BufRead};
use thiserror::Error;

/// Sections of an INI file, each a map from lower-cased key to trimmed value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }
}

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: IniParseErrorKind },
    #[error("Missing required section [{0}]")]
    MissingSection(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IniParseErrorKind {
    #[error("Section header is not closed with ']'")]
    UnterminatedSectionHeader,
    #[error("Section header has no name")]
    EmptySectionName,
    #[error("Expected 'key = value' or 'key: value'")]
    MissingSeparator,
    #[error("Option has no name")]
    EmptyKey,
    #[error("Option '{key}' appears before any section header")]
    KeyOutsideSection { key: String },
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#') || trimmed.starts_with(';')
}

/// The `[section]` / `key = value` format of the protocol input files.
///
/// Keys are case-insensitive and stored lower-cased; both `=` and `:` separate a key from its
/// value. Lines starting with `#` or `;` are comments. An indented line continues the value
/// of the previous key, so long comma-separated lists may span several lines. A repeated key
/// overrides the earlier one and a repeated section header reopens the section.
pub struct IniFile;

impl ConfigFile for IniFile {
    type Document = IniDocument;
    type Error = ConfigFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Document, Self::Error> {
        let mut document = IniDocument::default();
        let mut current_section: Option<String> = None;
        let mut last_key: Option<String> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                last_key = None;
                continue;
            }
            if is_comment(trimmed) {
                continue;
            }

            let indented = line.starts_with(char::is_whitespace);
            if indented {
                if let (Some(section), Some(key)) = (&current_section, &last_key) {
                    if let Some(value) = document
                        .sections
                        .get_mut(section)
                        .and_then(|s| s.get_mut(key))
                    {
                        if !value.is_empty() {
                            value.push('\n');
                        }
                        value.push_str(trimmed);
                        continue;
                    }
                }
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let name = header.strip_suffix(']').ok_or(ConfigFileError::Parse {
                    line: line_num,
                    kind: IniParseErrorKind::UnterminatedSectionHeader,
                })?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(ConfigFileError::Parse {
                        line: line_num,
                        kind: IniParseErrorKind::EmptySectionName,
                    });
                }
                document.sections.entry(name.to_string()).or_default();
                current_section = Some(name.to_string());
                last_key = None;
                continue;
            }

            let separator = trimmed
                .find(['=', ':'])
                .ok_or(ConfigFileError::Parse {
                    line: line_num,
                    kind: IniParseErrorKind::MissingSeparator,
                })?;
            let key = trimmed[..separator].trim().to_ascii_lowercase();
            let value = trimmed[separator + 1..].trim().to_string();
            if key.is_empty() {
                return Err(ConfigFileError::Parse {
                    line: line_num,
                    kind: IniParseErrorKind::EmptyKey,
                });
            }
            let Some(section) = &current_section else {
                return Err(ConfigFileError::Parse {
                    line: line_num,
                    kind: IniParseErrorKind::KeyOutsideSection { key },
                });
            };
            document
                .sections
                .entry(section.clone())
                .or_default()
                .insert(key.clone(), value);
            last_key = Some(key);
        }

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn parse(text: &str) -> Result<IniDocument, ConfigFileError> {
        IniFile::read_from(&mut Cursor::new(text))
    }

    fn parse_error_kind(text: &str) -> (usize, IniParseErrorKind) {
        match parse(text) {
            Err(ConfigFileError::Parse { line, kind }) => (line, kind),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn reads_sections_keys_and_values() {
        let doc = parse(
            "[settings]\nfile = protein.mae\n\n[protocol]\nStage1_Time: 50\n# comment\n; other\n",
        )
        .unwrap();
        assert_eq!(doc.get("settings", "file"), Some("protein.mae"));
        assert_eq!(doc.get("protocol", "stage1_time"), Some("50"));
        assert!(doc.has_section("protocol"));
        assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["protocol", "settings"]);
    }

    #[test]
    fn splits_on_the_first_separator_only() {
        let doc = parse("[protocol]\nstage1_restraints_atoms_pos = res.num 1:10\n").unwrap();
        assert_eq!(
            doc.get("protocol", "stage1_restraints_atoms_pos"),
            Some("res.num 1:10")
        );
    }

    #[test]
    fn indented_lines_continue_the_previous_value() {
        let doc = parse("[protocol]\nstage1_restraints_atoms_dist = a1,a2,\n    a3,a4\n").unwrap();
        assert_eq!(
            doc.get("protocol", "stage1_restraints_atoms_dist"),
            Some("a1,a2,\na3,a4")
        );
    }

    #[test]
    fn later_keys_override_earlier_ones() {
        let doc = parse("[protocol]\nstage1_time = 1\n[protocol]\nstage1_time = 2\n").unwrap();
        assert_eq!(doc.get("protocol", "stage1_time"), Some("2"));
    }

    #[test]
    fn empty_values_are_kept() {
        let doc = parse("[protocol]\nproduction_traj_center =\n").unwrap();
        assert_eq!(doc.get("protocol", "production_traj_center"), Some(""));
    }

    #[test]
    fn rejects_keys_before_any_section() {
        assert_eq!(
            parse_error_kind("stage1_time = 1\n"),
            (
                1,
                IniParseErrorKind::KeyOutsideSection {
                    key: "stage1_time".into()
                }
            )
        );
    }

    #[test]
    fn rejects_malformed_lines_with_their_line_number() {
        assert_eq!(
            parse_error_kind("[protocol\n"),
            (1, IniParseErrorKind::UnterminatedSectionHeader)
        );
        assert_eq!(
            parse_error_kind("[protocol]\n\nnot an option\n"),
            (3, IniParseErrorKind::MissingSeparator)
        );
        assert_eq!(
            parse_error_kind("[protocol]\n = 3\n"),
            (2, IniParseErrorKind::EmptyKey)
        );
        assert_eq!(parse_error_kind("[ ]\n"), (1, IniParseErrorKind::EmptySectionName));
    }

    #[test]
    fn reads_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[build_geometry]\nsolvent = TIP3P").unwrap();
        let doc = IniFile::read_from_path(file.path()).unwrap();
        assert_eq!(doc.get("build_geometry", "solvent"), Some("TIP3P"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = IniFile::read_from_path(dir.path().join("absent.ini"));
        assert!(matches!(result, Err(ConfigFileError::Io(_))));
    }
}
