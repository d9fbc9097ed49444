use crate::core::list::{parse_counts, split_list};
use crate::core::models::protocol::{
    AdditionalStageConfig, FixedStageConfig, ProductionSettings, ProtocolConfiguration,
    RestraintNames,
};
use crate::core::models::restraint::{RestraintKind, StageRestraints};
use crate::core::models::stage::{ADDITIONAL_STAGE_PREFIX, FixedStage};
use crate::engine::error::{ProtocolError, ValidationErrors};
use crate::engine::fields::FieldReader;
use crate::engine::options::SectionOptions;
use crate::engine::resolve::broadcast::ScalarBroadcastValue;
use crate::engine::resolve::{RestraintSpec, multi, single};
use rand::{Rng, thread_rng};
use rayon::prelude::*;
use std::fmt::Display;
use tracing::{debug, info, warn};

const SEED_KEY: &str = "production_randomize_vel_seed";
const MAX_GENERATED_SEED: u32 = 9999;

/// Lifecycle of a [`ProtocolOptionsValidator`].
///
/// `Ready` and `Rejected` are terminal: once reached, validating again returns the same
/// outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationState {
    Unvalidated,
    Validating,
    Ready(Box<ProtocolConfiguration>),
    Rejected(ValidationErrors),
}

impl ValidationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ValidationState::Ready(_) | ValidationState::Rejected(_))
    }
}

/// Turns the raw `[protocol]` section into a [`ProtocolConfiguration`].
///
/// Every fixed stage, every additional stage and the production settings are resolved in
/// one pass. Errors are collected rather than returned early, so a rejected section lists
/// every problem at once and no partially resolved configuration is ever exposed.
pub struct ProtocolOptionsValidator<'a> {
    options: &'a SectionOptions,
    state: ValidationState,
}

impl<'a> ProtocolOptionsValidator<'a> {
    pub fn new(options: &'a SectionOptions) -> Self {
        Self {
            options,
            state: ValidationState::Unvalidated,
        }
    }

    pub fn state(&self) -> &ValidationState {
        &self.state
    }

    pub fn config(&self) -> Option<&ProtocolConfiguration> {
        match &self.state {
            ValidationState::Ready(config) => Some(config.as_ref()),
            _ => None,
        }
    }

    /// Validates once, drawing the velocity seed from the thread RNG when the options do
    /// not set one.
    pub fn validate(&mut self) -> &ValidationState {
        self.validate_with_rng(&mut thread_rng())
    }

    pub fn validate_with_rng<R: Rng>(&mut self, rng: &mut R) -> &ValidationState {
        if !self.state.is_terminal() {
            self.state = ValidationState::Validating;
            debug!("Validating protocol options.");
            self.state = match resolve_protocol(self.options, rng) {
                Ok(config) => {
                    debug!("Protocol options accepted.");
                    ValidationState::Ready(Box::new(config))
                }
                Err(errors) => {
                    debug!(errors = errors.len(), "Protocol options rejected.");
                    ValidationState::Rejected(errors)
                }
            };
        }
        &self.state
    }

    /// Consumes the validator, validating first if needed.
    ///
    /// # Errors
    ///
    /// Returns every problem found in the options.
    pub fn into_result(self) -> Result<ProtocolConfiguration, ValidationErrors> {
        match self.state {
            ValidationState::Ready(config) => Ok(*config),
            ValidationState::Rejected(errors) => Err(errors),
            ValidationState::Unvalidated | ValidationState::Validating => {
                resolve_protocol(self.options, &mut thread_rng())
            }
        }
    }
}

fn resolve_protocol<R: Rng>(
    options: &SectionOptions,
    rng: &mut R,
) -> Result<ProtocolConfiguration, ValidationErrors> {
    let mut errors: Vec<ProtocolError> = options
        .unknown_keys()
        .into_iter()
        .map(ProtocolError::from)
        .collect();

    let resolved: Vec<_> = FixedStage::ALL
        .par_iter()
        .map(|&stage| resolve_fixed_stage(options, stage))
        .collect();
    let mut stages = Vec::with_capacity(FixedStage::ALL.len());
    for result in resolved {
        match result {
            Ok(stage) => stages.push(stage),
            Err(stage_errors) => errors.extend(stage_errors),
        }
    }

    let additional_stages = match resolve_additional_stages(options) {
        Ok(additional) => additional,
        Err(additional_errors) => {
            errors.extend(additional_errors);
            Vec::new()
        }
    };

    let mut reader = FieldReader::new(options);
    let production = read_production_settings(&mut reader);
    let restraint_names = RestraintNames {
        positional: reader.text("name_pos"),
        distance: reader.text("name_dist"),
        angle: reader.text("name_ang"),
        improper: reader.text("name_imp"),
    };
    let seed = reader.seed(SEED_KEY);
    let run_preparation = reader.flag("run_preparation");
    let run_protocols = reader.flag("run_protocols");
    let additional_traj_center = reader.text("additional_stage_traj_center");
    errors.extend(reader.into_errors());

    if let Some(errors) = ValidationErrors::from_errors(errors) {
        return Err(errors);
    }

    let velocity_seed = seed.unwrap_or_else(|| rng.gen_range(0..=MAX_GENERATED_SEED));
    let config = ProtocolConfiguration {
        velocity_seed,
        run_preparation,
        run_protocols,
        additional_traj_center,
        restraint_names,
        production,
        stages,
        additional_stages,
    };
    info!(
        enabled_stages = config.stages().iter().filter(|s| s.is_enabled()).count(),
        additional_stages = config.additional_stages().len(),
        restraints = config.total_restraints(),
        velocity_seed,
        "Protocol resolved."
    );
    Ok(config)
}

fn resolve_fixed_stage(
    options: &SectionOptions,
    stage: FixedStage,
) -> Result<FixedStageConfig, Vec<ProtocolError>> {
    let mut reader = FieldReader::new(options);
    let enabled = reader.flag(stage.prefix());
    let time = reader.number(&stage.key("time"));
    let timestep = reader.optional_triple(&stage.key("timestep"));
    let temperature = reader.number(&stage.key("temp"));
    let ensemble = reader.text(&stage.key("ensemble"));
    let method = reader.text(&stage.key("method"));
    let thermostat_tau = reader.optional_number(&stage.key("thermostat_tau"));
    let barostat_tau = reader.optional_number(&stage.key("barostat_tau"));
    let traj_center = reader.text(&stage.key("traj_center"));

    let mut restraints = StageRestraints::default();
    for kind in RestraintKind::ALL {
        let keys = kind.keys(stage.prefix());
        let count = match reader.raw(&keys.number) {
            Some(_) => reader.count(&keys.number),
            None => 0,
        };
        let spec = RestraintSpec {
            kind,
            stage: stage.prefix(),
            atoms: reader.raw(&keys.atoms),
            forces: reader.raw(&keys.forces),
            constants: keys.constant.as_deref().and_then(|key| reader.raw(key)),
        };
        match single::resolve(&spec, count) {
            Ok(set) => restraints.insert(set),
            Err(errors) => reader.extend(errors),
        }
    }

    if !enabled && !restraints.is_empty() {
        warn!(
            stage = %stage,
            restraints = restraints.total(),
            "Stage is disabled but declares restraints; they will not be written."
        );
    }

    let errors = reader.into_errors();
    if !errors.is_empty() {
        debug!(stage = %stage, errors = errors.len(), "Fixed stage rejected.");
        return Err(errors);
    }
    debug!(
        stage = %stage,
        enabled,
        restraints = restraints.total(),
        "Fixed stage resolved."
    );
    Ok(FixedStageConfig {
        stage,
        enabled,
        time,
        timestep,
        temperature,
        ensemble,
        method,
        thermostat_tau,
        barostat_tau,
        traj_center,
        restraints,
    })
}

fn broadcast<T: Display>(
    reader: &mut FieldReader<'_>,
    field: &str,
    values: Vec<T>,
    stage_count: usize,
) -> Option<ScalarBroadcastValue<T>> {
    match ScalarBroadcastValue::new(field, values, stage_count) {
        Ok(value) => Some(value),
        Err(error) => {
            reader.push(error.into());
            None
        }
    }
}

/// Per-stage restraint counts of one kind. Absent or `0` means no restraints anywhere;
/// otherwise one integer per additional stage is required.
fn stage_counts(reader: &mut FieldReader<'_>, key: &str, stage_count: usize) -> Option<Vec<usize>> {
    let raw = reader.raw(key).map(str::trim).unwrap_or("0");
    if raw.is_empty() || raw == "0" {
        return Some(vec![0; stage_count]);
    }
    let tokens = split_list(Some(raw));
    if tokens.len() != stage_count {
        reader.push(ProtocolError::StageCountMismatch {
            field: key.to_string(),
            expected: stage_count,
            actual: tokens.len(),
            raw: raw.to_string(),
        });
        return None;
    }
    match parse_counts(&tokens) {
        Ok(counts) => Some(counts),
        Err(source) => {
            reader.push(ProtocolError::invalid_value(key, source));
            None
        }
    }
}

fn resolve_additional_stages(
    options: &SectionOptions,
) -> Result<Vec<AdditionalStageConfig>, Vec<ProtocolError>> {
    let mut reader = FieldReader::new(options);
    let stage_count = reader.count("additional_stages");
    if stage_count == 0 {
        // Scalar lists are unused without stages, but declared restraints must not vanish.
        for kind in RestraintKind::ALL {
            stage_counts(&mut reader, &kind.keys(ADDITIONAL_STAGE_PREFIX).number, 0);
        }
        let errors = reader.into_errors();
        return if errors.is_empty() { Ok(Vec::new()) } else { Err(errors) };
    }

    let times = reader
        .numbers("additional_stage_times")
        .and_then(|v| broadcast(&mut reader, "additional_stage_times", v, stage_count));
    let temps = reader
        .numbers("additional_stage_temps")
        .and_then(|v| broadcast(&mut reader, "additional_stage_temps", v, stage_count));
    let ensembles = reader.words("additional_stage_ensembles");
    let ensembles = broadcast(&mut reader, "additional_stage_ensembles", ensembles, stage_count);
    let methods = reader.words("additional_stage_methods");
    let methods = broadcast(&mut reader, "additional_stage_methods", methods, stage_count);
    let thermostat_taus = reader.numbers("additional_stage_thermostat_tau").and_then(|v| {
        broadcast(&mut reader, "additional_stage_thermostat_tau", v, stage_count)
    });
    let barostat_taus = reader.numbers("additional_stage_barostat_tau").and_then(|v| {
        broadcast(&mut reader, "additional_stage_barostat_tau", v, stage_count)
    });

    let mut per_stage = vec![StageRestraints::default(); stage_count];
    for kind in RestraintKind::ALL {
        let keys = kind.keys(ADDITIONAL_STAGE_PREFIX);
        let Some(counts) = stage_counts(&mut reader, &keys.number, stage_count) else {
            continue;
        };
        let spec = RestraintSpec {
            kind,
            stage: ADDITIONAL_STAGE_PREFIX,
            atoms: reader.raw(&keys.atoms),
            forces: reader.raw(&keys.forces),
            constants: keys.constant.as_deref().and_then(|key| reader.raw(key)),
        };
        match multi::resolve_all(&spec, &counts) {
            Ok(sets) => {
                for (restraints, set) in per_stage.iter_mut().zip(sets) {
                    restraints.insert(set);
                }
            }
            Err(errors) => reader.extend(errors),
        }
    }

    let errors = reader.into_errors();
    let (
        Some(times),
        Some(temps),
        Some(ensembles),
        Some(methods),
        Some(thermostat_taus),
        Some(barostat_taus),
    ) = (times, temps, ensembles, methods, thermostat_taus, barostat_taus)
    else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let stages: Vec<AdditionalStageConfig> = (1..=stage_count)
        .zip(per_stage)
        .filter_map(|(index, restraints)| {
            Some(AdditionalStageConfig {
                index,
                time: *times.get(index)?,
                temperature: *temps.get(index)?,
                ensemble: ensembles.get(index)?.clone(),
                method: methods.get(index)?.clone(),
                thermostat_tau: *thermostat_taus.get(index)?,
                barostat_tau: *barostat_taus.get(index)?,
                restraints,
            })
        })
        .collect();
    for stage in &stages {
        debug!(
            stage = stage.index(),
            restraints = stage.restraints().total(),
            "Additional stage resolved."
        );
    }
    Ok(stages)
}

fn read_production_settings(reader: &mut FieldReader<'_>) -> ProductionSettings {
    ProductionSettings {
        bigger_rclone: reader.flag("production_bigger_rclone"),
        checkpt_first: reader.number("production_checkpt_first"),
        checkpt_interval: reader.number("production_checkpt_interval"),
        write_last_step: reader.flag("production_write_last_step"),
        cutoff: reader.number("production_cutoff"),
        elapsed_time: reader.number("production_elapsed_time"),
        energy_group: reader.flag("production_energy_group"),
        eneseq_first: reader.number("production_eneseq_first"),
        eneseq_interval: reader.number("production_eneseq_interval"),
        glue: reader.text("production_glue"),
        maeff_first: reader.number("production_maeff_first"),
        maeff_interval: reader.number("production_maeff_interval"),
        maeff_periodicfix: reader.flag("production_maeff_periodicfix"),
        meta: reader.flag("production_meta"),
        pressure: reader.number("production_pressure"),
        pressure_type: reader.text("production_pressure_type"),
        randomize_vel_first: reader.number("production_randomize_vel_first"),
        randomize_vel_interval: reader.number("production_randomize_vel_interval"),
        simbox_first: reader.number("production_simbox_first"),
        simbox_interval: reader.number("production_simbox_interval"),
        surface_tension: reader.number("production_surface_tension"),
        taper: reader.flag("production_taper"),
        temperature_group: reader.text("production_temp_group"),
        timestep: [
            reader.number("production_timestep_bonded"),
            reader.number("production_timestep_near"),
            reader.number("production_timestep_far"),
        ],
        traj_first: reader.number("production_traj_first"),
        traj_format: reader.text("production_traj_format"),
        traj_frames_per_file: reader.count("production_traj_frames_per_file"),
        traj_interval: reader.number("production_traj_interval"),
        traj_periodicfix: reader.flag("production_traj_periodicfix"),
        traj_write_velocity: reader.flag("production_traj_write_velocity"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::options::Section;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn options(pairs: &[(&str, &str)]) -> SectionOptions {
        SectionOptions::from_pairs(Section::Protocol, pairs.iter().copied())
    }

    fn validate(pairs: &[(&str, &str)]) -> Result<ProtocolConfiguration, ValidationErrors> {
        let options = options(pairs);
        ProtocolOptionsValidator::new(&options).into_result()
    }

    #[test]
    fn defaults_resolve_to_six_enabled_stages() {
        let config = validate(&[]).unwrap();
        assert_eq!(config.stages().len(), 6);
        assert!(config.stages().iter().all(FixedStageConfig::is_enabled));
        assert!(config.additional_stages().is_empty());
        assert_eq!(config.stage(FixedStage::Stage1).method(), "Brownie");
        assert_eq!(config.stage(FixedStage::Stage1).timestep(), Some([0.001, 0.001, 0.003]));
        assert_eq!(config.stage(FixedStage::Stage3).timestep(), None);
        assert_eq!(config.stage(FixedStage::Stage1).thermostat_tau(), None);
        assert_eq!(config.production().timestep, [0.002, 0.002, 0.006]);
        assert!(config.production().randomize_vel_interval.is_infinite());
        assert!(config.velocity_seed() <= MAX_GENERATED_SEED);
    }

    #[test]
    fn default_positional_restraints_cover_the_first_four_stages() {
        let config = validate(&[]).unwrap();
        for stage in [FixedStage::Stage1, FixedStage::Stage4] {
            let set = config.stage(stage).restraints().get(RestraintKind::Positional);
            assert_eq!(set.len(), 1);
            assert_eq!(set.records()[0].atom_group(), ["solute_heavy_atom"]);
            assert_eq!(set.records()[0].force_constant(), 50.0);
        }
        assert!(config.stage(FixedStage::Stage5).restraints().is_empty());
        assert_eq!(config.total_restraints(), 4);
    }

    #[test]
    fn distance_restraints_pair_atoms_with_their_own_constants() {
        let config = validate(&[
            ("stage1_restraints_number_dist", "2"),
            ("stage1_restraints_atoms_dist", "a1,a2,a3,a4"),
            ("stage1_restraints_forces_dist", "5"),
            ("stage1_restraints_r0_dist", "1.0,2.0"),
        ])
        .unwrap();
        let set = config
            .stage(FixedStage::Stage1)
            .restraints()
            .get(RestraintKind::Distance);
        let records = set.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].atom_group(), ["a1", "a2"]);
        assert_eq!(records[0].force_constant(), 5.0);
        assert_eq!(records[0].geometric_constant(), Some(1.0));
        assert_eq!(records[1].atom_group(), ["a3", "a4"]);
        assert_eq!(records[1].geometric_constant(), Some(2.0));
    }

    #[test]
    fn errors_from_every_stage_are_reported_together() {
        let errors = validate(&[
            ("stage1_restraints_number_dist", "2"),
            ("stage1_restraints_atoms_dist", "A,B,C"),
            ("stage1_restraints_forces_dist", "5"),
            ("stage1_restraints_r0_dist", "1.0"),
            ("stage4_restraints_number_ang", "1"),
            ("stage4_restraints_atoms_ang", "a,b,c"),
            ("stage4_restraints_forces_ang", "5"),
            ("stage9_time", "1"),
            ("production_time", "long"),
        ])
        .unwrap_err();
        let messages: Vec<String> = errors.errors().iter().map(ToString::to_string).collect();
        assert_eq!(messages.len(), 4, "{messages:#?}");
        assert!(messages.iter().any(|m| m.contains("stage9_time")));
        assert!(messages.iter().any(|m| m.contains("should have 4 values") && m.contains("it has 3")));
        assert!(messages.iter().any(|m| m.contains("stage4_restraints_theta0_ang")));
        assert!(messages.iter().any(|m| m.contains("production_time")));
    }

    #[test]
    fn restraint_counts_must_be_integers() {
        let errors = validate(&[("stage2_restraints_number_pos", "two")]).unwrap_err();
        assert!(matches!(
            errors.errors()[0],
            ProtocolError::InvalidValue { ref key, .. } if key == "stage2_restraints_number_pos"
        ));
    }

    #[test]
    fn additional_stage_scalars_are_broadcast_or_indexed() {
        let config = validate(&[
            ("additional_stages", "3"),
            ("additional_stage_times", "100"),
            ("additional_stage_temps", "300,310,320"),
            ("additional_stage_ensembles", "NPT"),
            ("additional_stage_methods", "MTK,Langevin,MTK"),
        ])
        .unwrap();
        let stages = config.additional_stages();
        assert_eq!(stages.len(), 3);
        assert!(stages.iter().all(|s| s.time() == 100.0));
        assert_eq!(stages[1].temperature(), 310.0);
        assert_eq!(stages[1].method(), "Langevin");
        assert_eq!(stages[2].ensemble(), "NPT");
        assert_eq!(stages[2].thermostat_tau(), 0.1);
        assert_eq!(stages[2].title(), "Additional stage = 3");
    }

    #[test]
    fn additional_stage_scalar_of_wrong_length_is_rejected() {
        let errors = validate(&[
            ("additional_stages", "5"),
            ("additional_stage_temps", "1,2,3"),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors.errors()[0], ProtocolError::BroadcastLength(_)));
    }

    #[test]
    fn additional_stage_restraints_are_consumed_stage_by_stage() {
        let config = validate(&[
            ("additional_stages", "2"),
            ("additional_stage_restraints_number_pos", "1,2"),
            ("additional_stage_restraints_atoms_pos", "sel1,sel2,sel3"),
            ("additional_stage_restraints_forces_pos", "10,20,30"),
        ])
        .unwrap();
        let first = config.additional_stages()[0]
            .restraints()
            .get(RestraintKind::Positional);
        let second = config.additional_stages()[1]
            .restraints()
            .get(RestraintKind::Positional);
        assert_eq!(first.flatten_atom_groups(), ["sel1"]);
        assert_eq!(second.flatten_atom_groups(), ["sel2", "sel3"]);
        assert_eq!(second.records()[1].force_constant(), 30.0);
    }

    #[test]
    fn additional_stage_counts_must_match_the_stage_count() {
        let errors = validate(&[
            ("additional_stages", "3"),
            ("additional_stage_restraints_number_dist", "1,1"),
        ])
        .unwrap_err();
        assert!(matches!(
            errors.errors()[0],
            ProtocolError::StageCountMismatch { expected: 3, actual: 2, .. }
        ));
    }

    #[test]
    fn additional_stage_scalars_are_ignored_without_additional_stages() {
        let config = validate(&[
            ("additional_stage_temps", "1,2,3"),
            ("additional_stage_restraints_number_pos", "0"),
        ])
        .unwrap();
        assert!(config.additional_stages().is_empty());
    }

    #[test]
    fn additional_stage_restraints_without_additional_stages_are_rejected() {
        let errors = validate(&[
            ("additional_stage_restraints_number_pos", "1,2"),
            ("additional_stage_restraints_atoms_pos", "a,b,c"),
            ("additional_stage_restraints_forces_pos", "1,2,3"),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors.errors()[0],
            ProtocolError::StageCountMismatch { field, expected: 0, actual: 2, .. }
                if field == "additional_stage_restraints_number_pos"
        ));
    }

    #[test]
    fn oversized_fixed_stage_count_is_rejected_without_panicking() {
        let errors = validate(&[
            ("stage5_restraints_number_imp", "18446744073709551615"),
            ("stage5_restraints_atoms_imp", "a,b,c,d"),
            ("stage5_restraints_forces_imp", "1"),
            ("stage5_restraints_phi0_imp", "1"),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors.errors()[0],
            ProtocolError::InvalidValue { key, .. } if key == "stage5_restraints_number_imp"
        ));
    }

    #[test]
    fn oversized_additional_stage_counts_are_rejected_without_panicking() {
        let errors = validate(&[
            ("additional_stages", "2"),
            ("additional_stage_restraints_number_pos", "18446744073709551615,1"),
            ("additional_stage_restraints_atoms_pos", "a,b"),
            ("additional_stage_restraints_forces_pos", "1,2"),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors.errors()[0],
            ProtocolError::InvalidValue { key, .. }
                if key == "additional_stage_restraints_number_pos"
        ));
    }

    #[test]
    fn seed_from_options_is_kept() {
        let config = validate(&[(SEED_KEY, "2007")]).unwrap();
        assert_eq!(config.velocity_seed(), 2007);
    }

    #[test]
    fn generated_seed_is_drawn_once_from_the_given_rng() {
        let options = options(&[]);
        let mut first = ProtocolOptionsValidator::new(&options);
        let mut second = ProtocolOptionsValidator::new(&options);
        first.validate_with_rng(&mut StdRng::seed_from_u64(7));
        second.validate_with_rng(&mut StdRng::seed_from_u64(7));
        let seed = first.config().unwrap().velocity_seed();
        assert_eq!(seed, second.config().unwrap().velocity_seed());

        first.validate_with_rng(&mut StdRng::seed_from_u64(99));
        assert_eq!(first.config().unwrap().velocity_seed(), seed);
    }

    #[test]
    fn state_moves_from_unvalidated_to_a_terminal_state() {
        let options = options(&[("stage1_time", "x")]);
        let mut validator = ProtocolOptionsValidator::new(&options);
        assert_eq!(validator.state(), &ValidationState::Unvalidated);
        assert!(matches!(validator.validate(), ValidationState::Rejected(_)));
        assert!(validator.config().is_none());
        assert!(validator.state().is_terminal());
        assert!(validator.into_result().is_err());
    }

    #[test]
    fn identical_inputs_resolve_to_equal_configurations() {
        let pairs = [
            (SEED_KEY, "1"),
            ("stage3_restraints_number_imp", "1"),
            ("stage3_restraints_atoms_imp", "a,b,c,d"),
            ("stage3_restraints_forces_imp", "3"),
            ("stage3_restraints_phi0_imp", "180"),
        ];
        assert_eq!(validate(&pairs).unwrap(), validate(&pairs).unwrap());
    }
}
