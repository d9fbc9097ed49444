use super::block::{BlockWriter, number_list, write_restraints};
use super::names::JobNames;
use super::traits::{EmitError, JobFile};
use crate::core::models::protocol::{
    AdditionalStageConfig, FixedStageConfig, ProtocolConfiguration,
};
use crate::core::models::stage::FixedStage;
use crate::core::models::system::SystemBuilderConfig;
use std::io::Write;

const GPU_LANGEVIN: &str = r#"[["==" "-gpu" "@*.*.jlaunch_opt[-1]"] 'ensemble.method = Langevin']"#;
const ANNEALING_OFF: &str =
    r#"[["@*.*.annealing"] 'annealing = off temperature = "@*.*.temperature[0][0]"'"#;
const GPU_LANGEVIN_TAIL: &str = r#"["==" "-gpu" "@*.*.jlaunch_opt[-1]"] 'ensemble.method = Langevin']"#;

const RANDOMIZE_VELOCITY_INTERVAL: f64 = 1.0;
const ENESEQ_INTERVAL: f64 = 0.3;
const BROWNIE_DELTA_MAX: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EffectIf {
    /// Switch to Langevin dynamics on GPU hosts.
    Langevin,
    /// Turn annealing off, then switch to Langevin on GPU hosts.
    AnnealingThenLangevin,
}

/// Which optional lines an equilibration stage block carries.
#[derive(Debug, Clone, Copy)]
struct StageLayout {
    effect_if: Option<EffectIf>,
    annealing_off: bool,
    temperature: bool,
    short_title: bool,
    randomize_velocity: bool,
    trailer: bool,
}

impl StageLayout {
    fn of(config: &FixedStageConfig) -> Option<Self> {
        let layout = match config.stage() {
            FixedStage::Stage1 => Self {
                effect_if: None,
                annealing_off: true,
                temperature: true,
                short_title: false,
                randomize_velocity: false,
                trailer: false,
            },
            FixedStage::Stage2 => Self {
                effect_if: Some(EffectIf::Langevin),
                annealing_off: true,
                temperature: true,
                short_title: false,
                randomize_velocity: true,
                trailer: true,
            },
            FixedStage::Stage3 if config.is_nvt() => Self {
                effect_if: Some(EffectIf::AnnealingThenLangevin),
                annealing_off: false,
                temperature: false,
                short_title: true,
                randomize_velocity: false,
                trailer: true,
            },
            FixedStage::Stage3 => Self {
                effect_if: Some(EffectIf::Langevin),
                annealing_off: true,
                temperature: true,
                short_title: false,
                randomize_velocity: true,
                trailer: true,
            },
            FixedStage::Stage4 => Self {
                effect_if: Some(EffectIf::AnnealingThenLangevin),
                annealing_off: false,
                temperature: true,
                short_title: false,
                randomize_velocity: true,
                trailer: true,
            },
            FixedStage::Stage5 => Self {
                effect_if: Some(EffectIf::AnnealingThenLangevin),
                annealing_off: false,
                temperature: true,
                short_title: false,
                randomize_velocity: false,
                trailer: true,
            },
            FixedStage::Production => return None,
        };
        Some(layout)
    }
}

fn write_effect_if<W: Write>(
    out: &mut BlockWriter<'_, W>,
    effect_if: EffectIf,
) -> Result<(), EmitError> {
    match effect_if {
        EffectIf::Langevin => out.field("effect_if", GPU_LANGEVIN)?,
        EffectIf::AnnealingThenLangevin => {
            out.field("effect_if", ANNEALING_OFF)?;
            out.continuation(GPU_LANGEVIN_TAIL)?;
        }
    }
    Ok(())
}

fn is_brownian(method: &str) -> bool {
    method.eq_ignore_ascii_case("brownie")
}

/// The multi-stage `{basename}_md.msj` file: the enabled equilibration stages, the
/// additional stages and a production stage that delegates to the `.cfg` file.
pub struct MdMsjFile<'a> {
    protocol: &'a ProtocolConfiguration,
    names: &'a JobNames,
}

impl<'a> MdMsjFile<'a> {
    pub fn new(protocol: &'a ProtocolConfiguration, names: &'a JobNames) -> Self {
        Self { protocol, names }
    }

    fn write_fixed_stage<W: Write>(
        &self,
        out: &mut BlockWriter<'_, W>,
        config: &FixedStageConfig,
        layout: StageLayout,
    ) -> Result<(), EmitError> {
        out.open_stage("simulate")?;
        if layout.short_title {
            out.quoted(
                "title",
                format_args!("{} {}, {}ps", config.method(), config.ensemble(), config.time()),
            )?;
        } else {
            out.quoted("title", config.title())?;
        }
        if let Some(effect_if) = layout.effect_if {
            write_effect_if(out, effect_if)?;
        }
        if layout.annealing_off {
            out.field("annealing", "off")?;
        }
        out.field("time", config.time())?;
        if let Some(timestep) = config.timestep() {
            out.field("timestep", number_list(&timestep))?;
        }
        if layout.temperature {
            out.field("temperature", config.temperature())?;
        }

        out.open("ensemble")?;
        out.field("class", config.ensemble())?;
        out.field("method", config.method())?;
        if is_brownian(config.method()) {
            out.open("brownie")?;
            out.field("delta_max", BROWNIE_DELTA_MAX)?;
            out.close()?;
        }
        if let Some(tau) = config.thermostat_tau() {
            out.field("thermostat.tau", tau)?;
        }
        if let Some(tau) = config.barostat_tau().filter(|_| !config.is_nvt()) {
            out.field("barostat.tau", tau)?;
        }
        out.close()?;

        write_restraints(out, config.restraints(), self.protocol.restraint_names())?;

        if layout.randomize_velocity {
            out.field("randomize_velocity.interval", RANDOMIZE_VELOCITY_INTERVAL)?;
        }
        if layout.trailer {
            out.field("eneseq.interval", ENESEQ_INTERVAL)?;
            out.field("trajectory.center", config.traj_center())?;
        }
        out.close()?;
        out.blank()?;
        Ok(())
    }

    fn write_additional_stage<W: Write>(
        &self,
        out: &mut BlockWriter<'_, W>,
        config: &AdditionalStageConfig,
    ) -> Result<(), EmitError> {
        out.open_stage("simulate")?;
        out.quoted("title", config.title())?;
        write_effect_if(out, EffectIf::AnnealingThenLangevin)?;
        out.field("time", config.time())?;
        out.field("temperature", config.temperature())?;
        out.open("ensemble")?;
        out.field("class", config.ensemble())?;
        out.field("method", config.method())?;
        out.field("thermostat.tau", config.thermostat_tau())?;
        out.field("barostat.tau", config.barostat_tau())?;
        out.close()?;
        write_restraints(out, config.restraints(), self.protocol.restraint_names())?;
        out.field("eneseq.interval", ENESEQ_INTERVAL)?;
        out.field("trajectory.center", self.protocol.additional_traj_center())?;
        out.close()?;
        out.blank()?;
        Ok(())
    }

    fn write_production<W: Write>(&self, out: &mut BlockWriter<'_, W>) -> Result<(), EmitError> {
        out.open_stage("simulate")?;
        out.quoted("cfg_file", self.names.md_cfg())?;
        out.quoted("jobname", "$MASTERJOBNAME")?;
        out.quoted("dir", ".")?;
        out.quoted("compress", "")?;
        out.close()?;
        out.blank()?;
        Ok(())
    }
}

impl JobFile for MdMsjFile<'_> {
    type Error = EmitError;

    fn write_to(&self, writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut out = BlockWriter::new(writer);
        out.raw("# Desmond protocol")?;
        out.raw("# Time units are in ps")?;
        out.raw("# Energy units are in kcal/mol")?;
        out.blank()?;

        out.open_stage("task")?;
        out.quoted("task", "desmond:auto")?;
        out.open("set_family")?;
        out.open("desmond")?;
        out.field("checkpt.write_last_step", "no")?;
        out.close()?;
        out.close()?;
        out.close()?;
        out.blank()?;

        for config in self.protocol.equilibration_stages() {
            if !config.is_enabled() {
                continue;
            }
            if let Some(layout) = StageLayout::of(config) {
                self.write_fixed_stage(&mut out, config, layout)?;
            }
        }
        for config in self.protocol.additional_stages() {
            self.write_additional_stage(&mut out, config)?;
        }
        if self.protocol.production_stage().is_enabled() {
            self.write_production(&mut out)?;
        }
        Ok(())
    }
}

/// The `{basename}_preparation.msj` file that solvates, neutralizes and parameterizes the
/// input structure.
pub struct PreparationMsjFile<'a> {
    system: &'a SystemBuilderConfig,
    /// Total charge of the input structure.
    charge: i64,
    /// Atom indices matching `ion_awayfrom`, required when `ions_away` is on.
    ion_awayfrom_atoms: Option<&'a [usize]>,
}

impl<'a> PreparationMsjFile<'a> {
    pub fn new(
        system: &'a SystemBuilderConfig,
        charge: i64,
        ion_awayfrom_atoms: Option<&'a [usize]>,
    ) -> Self {
        Self {
            system,
            charge,
            ion_awayfrom_atoms,
        }
    }
}

impl JobFile for PreparationMsjFile<'_> {
    type Error = EmitError;

    fn write_to(&self, writer: &mut impl Write) -> Result<(), Self::Error> {
        let system = self.system;
        let mut out = BlockWriter::new(writer);

        out.open_stage("task")?;
        out.quoted("task", "desmond:auto")?;
        out.close()?;
        out.blank()?;

        out.open_stage("build_geometry")?;
        if let Some(ion) = system.counterion_for(self.charge) {
            out.open("add_counterion")?;
            out.field("ion", ion)?;
            out.field("number", &system.number)?;
            out.close()?;
        }
        out.open("box")?;
        out.field("shape", &system.shape)?;
        out.field("size", number_list(&system.size))?;
        out.field("size_type", &system.size_type)?;
        out.close()?;
        if system.ions_away {
            if let Some(atoms) = self.ion_awayfrom_atoms {
                let indices: Vec<String> = atoms.iter().map(ToString::to_string).collect();
                out.field("ion_awaydistance", system.ion_awaydistance)?;
                out.field("ion_awayfrom", format_args!("[{}]", indices.join(" ")))?;
            }
        }
        out.field("override_forcefield", &system.override_forcefield)?;
        out.field("rezero_system", system.rezero_system)?;
        if system.salt {
            out.open("salt")?;
            out.field("concentration", system.concentration)?;
            out.field("negative_ion", &system.negative_ion)?;
            out.field("positive_ion", &system.positive_ion)?;
            out.close()?;
        }
        out.field("solvent", &system.solvent)?;
        out.close()?;
        out.blank()?;

        out.open_stage("assign_forcefield")?;
        out.field("forcefield", &system.forcefield)?;
        out.close()?;
        Ok(())
    }
}
