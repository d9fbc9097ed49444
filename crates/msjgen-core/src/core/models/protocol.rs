use super::restraint::{RestraintKind, StageRestraints};
use super::stage::FixedStage;
use serde::Serialize;

/// Potential names written into every `restraints.new` entry, one per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestraintNames {
    pub(crate) positional: String,
    pub(crate) distance: String,
    pub(crate) angle: String,
    pub(crate) improper: String,
}

impl RestraintNames {
    pub fn get(&self, kind: RestraintKind) -> &str {
        match kind {
            RestraintKind::Positional => &self.positional,
            RestraintKind::Distance => &self.distance,
            RestraintKind::Angle => &self.angle,
            RestraintKind::Improper => &self.improper,
        }
    }
}

impl Default for RestraintNames {
    fn default() -> Self {
        let name = |kind: RestraintKind| kind.entry().default_potential.to_string();
        Self {
            positional: name(RestraintKind::Positional),
            distance: name(RestraintKind::Distance),
            angle: name(RestraintKind::Angle),
            improper: name(RestraintKind::Improper),
        }
    }
}

/// Resolved settings of one of the six fixed stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixedStageConfig {
    pub(crate) stage: FixedStage,
    pub(crate) enabled: bool,
    pub(crate) time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) timestep: Option<[f64; 3]>,
    pub(crate) temperature: f64,
    pub(crate) ensemble: String,
    pub(crate) method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) thermostat_tau: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) barostat_tau: Option<f64>,
    pub(crate) traj_center: String,
    pub(crate) restraints: StageRestraints,
}

impl FixedStageConfig {
    pub fn stage(&self) -> FixedStage {
        self.stage
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// The `[bonded near far]` timestep, when the stage sets one explicitly.
    pub fn timestep(&self) -> Option<[f64; 3]> {
        self.timestep
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn ensemble(&self) -> &str {
        &self.ensemble
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn thermostat_tau(&self) -> Option<f64> {
        self.thermostat_tau
    }

    pub fn barostat_tau(&self) -> Option<f64> {
        self.barostat_tau
    }

    pub fn traj_center(&self) -> &str {
        &self.traj_center
    }

    pub fn restraints(&self) -> &StageRestraints {
        &self.restraints
    }

    pub fn is_nvt(&self) -> bool {
        self.ensemble.eq_ignore_ascii_case("NVT")
    }

    /// Block title, e.g. `Berendsen NVT, T = 10 K, 12ps`.
    pub fn title(&self) -> String {
        format!(
            "{} {}, T = {} K, {}ps",
            self.method, self.ensemble, self.temperature, self.time
        )
    }
}

/// Resolved settings of one user-declared additional stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdditionalStageConfig {
    pub(crate) index: usize,
    pub(crate) time: f64,
    pub(crate) temperature: f64,
    pub(crate) ensemble: String,
    pub(crate) method: String,
    pub(crate) thermostat_tau: f64,
    pub(crate) barostat_tau: f64,
    pub(crate) restraints: StageRestraints,
}

impl AdditionalStageConfig {
    /// 1-based position among the additional stages.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn ensemble(&self) -> &str {
        &self.ensemble
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn thermostat_tau(&self) -> f64 {
        self.thermostat_tau
    }

    pub fn barostat_tau(&self) -> f64 {
        self.barostat_tau
    }

    pub fn restraints(&self) -> &StageRestraints {
        &self.restraints
    }

    pub fn title(&self) -> String {
        format!("Additional stage = {}", self.index)
    }
}

/// Output and integrator settings of the production run, written to the `.cfg` file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionSettings {
    pub bigger_rclone: bool,
    pub checkpt_first: f64,
    pub checkpt_interval: f64,
    pub write_last_step: bool,
    pub cutoff: f64,
    pub elapsed_time: f64,
    pub energy_group: bool,
    pub eneseq_first: f64,
    pub eneseq_interval: f64,
    pub glue: String,
    pub maeff_first: f64,
    pub maeff_interval: f64,
    pub maeff_periodicfix: bool,
    pub meta: bool,
    pub pressure: f64,
    pub pressure_type: String,
    pub randomize_vel_first: f64,
    pub randomize_vel_interval: f64,
    pub simbox_first: f64,
    pub simbox_interval: f64,
    pub surface_tension: f64,
    pub taper: bool,
    pub temperature_group: String,
    pub timestep: [f64; 3],
    pub traj_first: f64,
    pub traj_format: String,
    pub traj_frames_per_file: usize,
    pub traj_interval: f64,
    pub traj_periodicfix: bool,
    pub traj_write_velocity: bool,
}

/// The fully resolved protocol.
///
/// Built once by [`crate::engine::validator::ProtocolOptionsValidator`] and never mutated
/// afterwards. Holding one means every stage, restraint and scalar passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolConfiguration {
    pub(crate) velocity_seed: u32,
    pub(crate) run_preparation: bool,
    pub(crate) run_protocols: bool,
    pub(crate) additional_traj_center: String,
    pub(crate) restraint_names: RestraintNames,
    pub(crate) production: ProductionSettings,
    pub(crate) stages: Vec<FixedStageConfig>,
    pub(crate) additional_stages: Vec<AdditionalStageConfig>,
}

impl ProtocolConfiguration {
    /// Seed of the production velocity randomization, taken from the options or drawn once
    /// when the configuration was built.
    pub fn velocity_seed(&self) -> u32 {
        self.velocity_seed
    }

    pub fn run_preparation(&self) -> bool {
        self.run_preparation
    }

    pub fn run_protocols(&self) -> bool {
        self.run_protocols
    }

    pub fn additional_traj_center(&self) -> &str {
        &self.additional_traj_center
    }

    pub fn restraint_names(&self) -> &RestraintNames {
        &self.restraint_names
    }

    pub fn production(&self) -> &ProductionSettings {
        &self.production
    }

    pub fn stage(&self, stage: FixedStage) -> &FixedStageConfig {
        &self.stages[stage as usize]
    }

    /// The six fixed stages in execution order.
    pub fn stages(&self) -> &[FixedStageConfig] {
        &self.stages
    }

    pub fn equilibration_stages(&self) -> impl Iterator<Item = &FixedStageConfig> {
        FixedStage::EQUILIBRATION
            .into_iter()
            .map(|stage| self.stage(stage))
    }

    pub fn production_stage(&self) -> &FixedStageConfig {
        self.stage(FixedStage::Production)
    }

    pub fn additional_stages(&self) -> &[AdditionalStageConfig] {
        &self.additional_stages
    }

    /// Number of restraints across every stage, disabled ones included.
    pub fn total_restraints(&self) -> usize {
        self.stages
            .iter()
            .map(|s| s.restraints.total())
            .chain(self.additional_stages.iter().map(|s| s.restraints.total()))
            .sum()
    }
}
