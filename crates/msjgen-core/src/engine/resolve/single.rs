use super::{RestraintSpec, bounded_total, check_length};
use crate::core::list::{parse_numbers, split_list};
use crate::core::models::restraint::{RestraintKind, RestraintRecord, StageRestraintSet};
use crate::engine::error::{MissingConstantError, ProtocolError};
use tracing::trace;

/// Expands the restraints of one kind declared for one fixed stage.
///
/// A zero `count` yields an empty set without looking at the other fields. Otherwise the
/// force list and the constant list must hold either one value, broadcast to every
/// restraint, or exactly `count` values. The atom list must hold `count * arity`
/// selections or a single selection broadcast to every slot.
///
/// # Errors
///
/// Returns every arity, missing-constant and number-format violation found. Nothing
/// is truncated or padded. A count above [`super::MAX_RESTRAINT_COUNT`] is rejected
/// before any list is examined.
pub fn resolve(
    spec: &RestraintSpec<'_>,
    count: usize,
) -> Result<StageRestraintSet, Vec<ProtocolError>> {
    let kind = spec.kind;
    if count == 0 {
        return Ok(StageRestraintSet::empty(kind));
    }

    let keys = spec.keys();
    let count = bounded_total(&keys.number, &[count]).map_err(|e| vec![e])?;
    let arity = kind.arity();
    let atoms = split_list(spec.atoms);
    let forces = split_list(spec.forces);
    let constants = split_list(spec.constants);

    let mut errors: Vec<ProtocolError> = Vec::new();
    let mut constants_ok = kind.constant().is_some();

    let check_atoms = |errors: &mut Vec<ProtocolError>| {
        let error = check_length(
            &keys.number,
            count,
            &keys.atoms,
            spec.atoms,
            atoms.len(),
            count * arity,
            true,
        );
        let ok = error.is_none();
        errors.extend(error.map(ProtocolError::from));
        ok
    };
    let check_forces = |errors: &mut Vec<ProtocolError>| {
        let error = check_length(
            &keys.number,
            count,
            &keys.forces,
            spec.forces,
            forces.len(),
            count,
            true,
        );
        let ok = error.is_none();
        errors.extend(error.map(ProtocolError::from));
        ok
    };

    // Positional restraints report the force list first.
    let forces_ok = if kind == RestraintKind::Positional {
        let forces_ok = check_forces(&mut errors);
        check_atoms(&mut errors);
        forces_ok
    } else {
        check_atoms(&mut errors);
        check_forces(&mut errors)
    };

    if let Some(constant_key) = &keys.constant {
        if constants.is_empty() {
            constants_ok = false;
            errors.push(
                MissingConstantError {
                    field: constant_key.clone(),
                    count_field: keys.number.clone(),
                    count,
                }
                .into(),
            );
        } else if let Some(error) = check_length(
            &keys.number,
            count,
            constant_key,
            spec.constants,
            constants.len(),
            count,
            true,
        ) {
            constants_ok = false;
            errors.push(error.into());
        }
    }

    let force_values = if forces_ok {
        parse_numbers(&forces)
            .map_err(|e| errors.push(ProtocolError::invalid_value(&keys.forces, e)))
            .ok()
    } else {
        None
    };
    let constant_values = match (&keys.constant, constants_ok) {
        (Some(constant_key), true) => parse_numbers(&constants)
            .map_err(|e| errors.push(ProtocolError::invalid_value(constant_key, e)))
            .ok(),
        _ => None,
    };

    if !errors.is_empty() {
        return Err(errors);
    }
    let Some(force_values) = force_values else {
        return Err(errors);
    };

    let records = (0..count)
        .map(|i| {
            let atom_group = if atoms.len() == 1 {
                vec![atoms[0].to_string(); arity]
            } else {
                atoms[i * arity..(i + 1) * arity]
                    .iter()
                    .map(|a| a.to_string())
                    .collect()
            };
            let force = pick(&force_values, i);
            let constant = constant_values.as_deref().map(|values| pick(values, i));
            RestraintRecord::new(kind, atom_group, force, constant)
                .with_tokens(pick(&forces, i), (!constants.is_empty()).then(|| pick(&constants, i)))
        })
        .collect();

    trace!(stage = spec.stage, %kind, count, "Resolved restraint set.");
    Ok(StageRestraintSet::from_records(kind, records))
}

/// The `i`-th value, or the sole value when it is broadcast.
fn pick<T: Copy>(values: &[T], i: usize) -> T {
    if values.len() == 1 { values[0] } else { values[i] }
}
