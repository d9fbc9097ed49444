use super::{RestraintSpec, bounded_total, check_length};
use crate::core::list::{parse_numbers, split_list};
use crate::core::models::restraint::{RestraintRecord, StageRestraintSet};
use crate::engine::error::{MissingConstantError, ProtocolError};
use tracing::trace;

/// Expands one restraint kind across every additional stage.
///
/// `counts[i]` is the number of restraints declared for additional stage `i + 1`. The atom,
/// force and constant lists are shared by all stages: each stage consumes its slice in
/// order, starting where the previous stage stopped. Unlike the fixed-stage resolver, no
/// value is broadcast, so every list must match the summed count exactly.
///
/// # Errors
///
/// Returns every length, missing-constant and number-format violation. When the summed
/// count is zero the other fields are ignored and one empty set per stage is returned.
/// A summed count above [`super::MAX_RESTRAINT_COUNT`] is rejected up front.
pub fn resolve_all(
    spec: &RestraintSpec<'_>,
    counts: &[usize],
) -> Result<Vec<StageRestraintSet>, Vec<ProtocolError>> {
    let kind = spec.kind;
    let keys = spec.keys();
    let total = bounded_total(&keys.number, counts).map_err(|e| vec![e])?;
    if total == 0 {
        return Ok(counts.iter().map(|_| StageRestraintSet::empty(kind)).collect());
    }

    let arity = kind.arity();
    let atoms = split_list(spec.atoms);
    let forces = split_list(spec.forces);
    let constants = split_list(spec.constants);

    let mut errors: Vec<ProtocolError> = Vec::new();
    let check = |errors: &mut Vec<ProtocolError>,
                 field: &str,
                 raw: Option<&str>,
                 actual: usize,
                 expected: usize| {
        let error = check_length(&keys.number, total, field, raw, actual, expected, false);
        let ok = error.is_none();
        errors.extend(error.map(ProtocolError::from));
        ok
    };

    let atoms_ok = check(&mut errors, &keys.atoms, spec.atoms, atoms.len(), total * arity);
    let forces_ok = check(&mut errors, &keys.forces, spec.forces, forces.len(), total);
    let constants_ok = match &keys.constant {
        None => true,
        Some(constant_key) if constants.is_empty() => {
            errors.push(
                MissingConstantError {
                    field: constant_key.clone(),
                    count_field: keys.number.clone(),
                    count: total,
                }
                .into(),
            );
            false
        }
        Some(constant_key) => check(&mut errors, constant_key, spec.constants, constants.len(), total),
    };

    let force_values = if forces_ok {
        parse_numbers(&forces)
            .map_err(|e| errors.push(ProtocolError::invalid_value(&keys.forces, e)))
            .ok()
    } else {
        None
    };
    let constant_values = match &keys.constant {
        Some(constant_key) if constants_ok => parse_numbers(&constants)
            .map_err(|e| errors.push(ProtocolError::invalid_value(constant_key, e)))
            .ok()
            .map(Some),
        Some(_) => None,
        None => Some(None),
    };

    if !errors.is_empty() || !atoms_ok {
        return Err(errors);
    }
    let (Some(force_values), Some(constant_values)) = (force_values, constant_values) else {
        return Err(errors);
    };

    let mut records = atoms
        .chunks_exact(arity)
        .zip(force_values)
        .enumerate()
        .map(|(i, (group, force))| {
            let constant = constant_values.as_ref().map(|values| values[i]);
            RestraintRecord::new(
                kind,
                group.iter().map(|a| a.to_string()).collect(),
                force,
                constant,
            )
            .with_tokens(forces[i], constants.get(i).copied())
        });

    let sets = counts
        .iter()
        .map(|&count| {
            StageRestraintSet::from_records(kind, records.by_ref().take(count).collect())
        })
        .collect();
    trace!(%kind, total, stages = counts.len(), "Resolved additional-stage restraints.");
    Ok(sets)
}
