use crate::core::list::TokenParseError;
use std::fmt;
use thiserror::Error;

fn broadcast_hint(allowed: &bool) -> &'static str {
    if *allowed { " (or a single value)" } else { "" }
}

/// A declared restraint count disagrees with the length of an associated list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "Wrong length of values. '{field}' should have {expected} values to match '{count_field}' = {count}{}, but it has {actual} values: '[{raw}]'",
    broadcast_hint(.broadcast_allowed)
)]
pub struct RestraintArityError {
    pub count_field: String,
    pub count: usize,
    pub field: String,
    pub expected: usize,
    pub actual: usize,
    pub raw: String,
    pub broadcast_allowed: bool,
}

/// A per-stage scalar list that is neither a single value nor one value per stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "Wrong length of values. '{field}' should have 1 value or {stage_count} values as 'additional_stages', but it has {actual} values: '[{raw}]'"
)]
pub struct BroadcastLengthError {
    pub field: String,
    pub stage_count: usize,
    pub actual: usize,
    pub raw: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown option '{key}' in section [{section}]")]
pub struct UnknownOptionError {
    pub section: String,
    pub key: String,
}

/// A distance, angle or improper restraint is declared without its geometric constant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Missing option '{field}', required because '{count_field}' = {count}")]
pub struct MissingConstantError {
    pub field: String,
    pub count_field: String,
    pub count: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error(transparent)]
    RestraintArity(#[from] RestraintArityError),

    #[error(transparent)]
    BroadcastLength(#[from] BroadcastLengthError),

    #[error(transparent)]
    UnknownOption(#[from] UnknownOptionError),

    #[error(transparent)]
    MissingConstant(#[from] MissingConstantError),

    #[error("Invalid value for option '{key}': {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: TokenParseError,
    },

    #[error(
        "Wrong length of values. '{field}' should have {expected} values as 'additional_stages', but it has {actual} values: '[{raw}]'"
    )]
    StageCountMismatch {
        field: String,
        expected: usize,
        actual: usize,
        raw: String,
    },
}

impl ProtocolError {
    pub fn invalid_value(key: impl Into<String>, source: TokenParseError) -> Self {
        ProtocolError::InvalidValue {
            key: key.into(),
            source,
        }
    }
}

/// Every error found while validating a configuration. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ProtocolError>,
}

impl ValidationErrors {
    /// Returns `None` when there is nothing to report.
    pub fn from_errors(errors: Vec<ProtocolError>) -> Option<Self> {
        (!errors.is_empty()).then_some(Self { errors })
    }

    pub fn errors(&self) -> &[ProtocolError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_inner(self) -> Vec<ProtocolError> {
        self.errors
    }

    /// Puts `leading` in front of the errors already collected.
    pub(crate) fn prefixed(mut self, mut leading: Vec<ProtocolError>) -> Self {
        leading.append(&mut self.errors);
        self.errors = leading;
        self
    }
}

impl Extend<ProtocolError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = ProtocolError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} configuration error(s) found. Please check the input file.",
            self.errors.len()
        )?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
