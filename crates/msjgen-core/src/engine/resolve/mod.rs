//! Resolution of flat, comma-separated option values into per-stage structures.
//!
//! - [`single`] expands the restraints of one fixed stage and one kind, with broadcast.
//! - [`multi`] expands the restraints of all additional stages at once, consuming shared
//!   flat lists stage by stage.
//! - [`broadcast`] picks the value of a per-stage scalar for one additional stage.

pub mod broadcast;
pub mod multi;
pub mod single;

use crate::core::list::TokenParseError;
use crate::core::models::restraint::{RestraintKeys, RestraintKind};
use crate::engine::error::{ProtocolError, RestraintArityError};

/// Largest number of restraints of one kind a single declaration may expand to.
pub const MAX_RESTRAINT_COUNT: usize = 100_000;
const RESTRAINT_COUNT_EXPECTATION: &str = "restraint count (at most 100000 per kind)";

/// The raw, unresolved option values describing one restraint kind of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestraintSpec<'a> {
    pub kind: RestraintKind,
    /// Option prefix of the stage (`stage1`, `production`, `additional_stage`).
    pub stage: &'a str,
    pub atoms: Option<&'a str>,
    pub forces: Option<&'a str>,
    pub constants: Option<&'a str>,
}

impl<'a> RestraintSpec<'a> {
    pub fn keys(&self) -> RestraintKeys {
        self.kind.keys(self.stage)
    }
}

/// Sums the declared counts of one kind, rejecting totals above [`MAX_RESTRAINT_COUNT`].
///
/// The bound keeps every derived length (`total * arity`) well inside `usize`.
pub(crate) fn bounded_total(count_field: &str, counts: &[usize]) -> Result<usize, ProtocolError> {
    counts
        .iter()
        .try_fold(0usize, |total, &count| total.checked_add(count))
        .filter(|&total| total <= MAX_RESTRAINT_COUNT)
        .ok_or_else(|| {
            let raw = counts
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            ProtocolError::invalid_value(
                count_field,
                TokenParseError::new(&raw, RESTRAINT_COUNT_EXPECTATION),
            )
        })
}

/// Compares a list length against the length required by a declared count.
///
/// With `broadcast_allowed`, a single value is accepted in place of `expected` values.
pub(crate) fn check_length(
    count_field: &str,
    count: usize,
    field: &str,
    raw: Option<&str>,
    actual: usize,
    expected: usize,
    broadcast_allowed: bool,
) -> Option<RestraintArityError> {
    if actual == expected || (broadcast_allowed && actual == 1) {
        return None;
    }
    Some(RestraintArityError {
        count_field: count_field.to_string(),
        count,
        field: field.to_string(),
        expected,
        actual,
        raw: raw.unwrap_or_default().to_string(),
        broadcast_allowed,
    })
}
