use super::block::{BlockWriter, number_list, write_restraints};
use super::traits::{EmitError, JobFile};
use crate::core::models::protocol::ProtocolConfiguration;
use std::io::Write;

const REPLICA_PREFIX: &str = "$JOBNAME$[_replica$REPLICA$]";

/// The `{basename}_md.cfg` file holding the production integrator and output settings.
///
/// Keys are written in alphabetical order, the order `multisim` itself uses when it dumps a
/// configuration.
pub struct CfgFile<'a> {
    protocol: &'a ProtocolConfiguration,
}

impl<'a> CfgFile<'a> {
    pub fn new(protocol: &'a ProtocolConfiguration) -> Self {
        Self { protocol }
    }
}

impl JobFile for CfgFile<'_> {
    type Error = EmitError;

    fn write_to(&self, writer: &mut impl Write) -> Result<(), Self::Error> {
        let stage = self.protocol.production_stage();
        let settings = self.protocol.production();
        let mut out = BlockWriter::new(writer);

        out.field("annealing", false)?;
        out.open("backend")?;
        out.close()?;
        out.field("bigger_rclone", settings.bigger_rclone)?;
        out.open("checkpt")?;
        out.field("first", settings.checkpt_first)?;
        out.field("interval", settings.checkpt_interval)?;
        out.quoted("name", "$JOBNAME.cpt")?;
        out.field("write_last_step", settings.write_last_step)?;
        out.close()?;
        out.field("cpu", 1)?;
        out.field("cutoff_radius", settings.cutoff)?;
        out.field("elapsed_time", settings.elapsed_time)?;
        out.field("energy_group", settings.energy_group)?;
        out.open("eneseq")?;
        out.field("first", settings.eneseq_first)?;
        out.field("interval", settings.eneseq_interval)?;
        out.close()?;

        out.open("ensemble")?;
        out.field("class", stage.ensemble())?;
        out.field("method", stage.method())?;
        if let Some(tau) = stage.barostat_tau() {
            out.open("barostat")?;
            out.field("tau", tau)?;
            out.close()?;
        }
        if let Some(tau) = stage.thermostat_tau() {
            out.open("thermostat")?;
            out.field("tau", tau)?;
            out.close()?;
        }
        out.close()?;

        out.field("glue", &settings.glue)?;
        out.open("maeff_output")?;
        out.field("first", settings.maeff_first)?;
        out.field("interval", settings.maeff_interval)?;
        out.quoted("name", format_args!("{REPLICA_PREFIX}-out.cms"))?;
        out.field("periodicfix", settings.maeff_periodicfix)?;
        out.quoted("trjdir", format_args!("{REPLICA_PREFIX}_trj"))?;
        out.close()?;
        out.field("meta", settings.meta)?;
        out.field("meta_file", "?")?;
        out.field(
            "pressure",
            format_args!("[{} {}]", settings.pressure, settings.pressure_type),
        )?;

        out.open("randomize_velocity")?;
        out.field("first", settings.randomize_vel_first)?;
        out.field("interval", settings.randomize_vel_interval)?;
        out.field("seed", self.protocol.velocity_seed())?;
        out.quoted("temperature", "@*.temperature")?;
        out.close()?;

        write_restraints(&mut out, stage.restraints(), self.protocol.restraint_names())?;

        out.open("simbox")?;
        out.field("first", settings.simbox_first)?;
        out.field("interval", settings.simbox_interval)?;
        out.quoted("name", format_args!("{REPLICA_PREFIX}_simbox.dat"))?;
        out.close()?;
        out.field("surface_tension", settings.surface_tension)?;
        out.field("taper", settings.taper)?;
        out.field(
            "temperature",
            format_args!("[ [{} {}] ]", stage.temperature(), settings.temperature_group),
        )?;
        out.field("time", stage.time())?;
        out.field("timestep", number_list(&settings.timestep))?;

        out.open("trajectory")?;
        out.field("center", format_args!("[{}]", stage.traj_center()))?;
        out.field("first", settings.traj_first)?;
        out.field("format", &settings.traj_format)?;
        out.field("frames_per_file", settings.traj_frames_per_file)?;
        out.field("interval", settings.traj_interval)?;
        out.quoted("name", format_args!("{REPLICA_PREFIX}_trj"))?;
        out.field("periodicfix", settings.traj_periodicfix)?;
        out.field("write_velocity", settings.traj_write_velocity)?;
        out.close()?;
        Ok(())
    }
}
