use crate::core::io::ini::IniDocument;
use crate::core::models::restraint::RestraintKind;
use crate::core::models::stage::{ADDITIONAL_STAGE_PREFIX, FixedStage};
use crate::engine::error::UnknownOptionError;
use phf::{Map, Set, phf_map, phf_set};
use std::collections::BTreeMap;
use std::fmt;

/// Values used for `[protocol]` keys the input leaves out.
static PROTOCOL_DEFAULTS: Map<&'static str, &'static str> = phf_map! {
    "stage1" => "true",
    "stage2" => "true",
    "stage3" => "true",
    "stage4" => "true",
    "stage5" => "true",
    "production" => "true",

    "stage1_time" => "100",
    "stage2_time" => "12",
    "stage3_time" => "12",
    "stage4_time" => "12",
    "stage5_time" => "24",
    "production_time" => "100000",

    "stage1_timestep" => "0.001 0.001 0.003",
    "stage2_timestep" => "0.001 0.001 0.003",
    "production_timestep_bonded" => "0.002",
    "production_timestep_near" => "0.002",
    "production_timestep_far" => "0.006",

    "stage1_temp" => "10.0",
    "stage2_temp" => "10.0",
    "stage3_temp" => "10.0",
    "stage4_temp" => "300.0",
    "stage5_temp" => "300.0",
    "production_temp" => "300.0",
    "production_temp_group" => "0",

    "stage1_ensemble" => "NVT",
    "stage2_ensemble" => "NVT",
    "stage3_ensemble" => "NPT",
    "stage4_ensemble" => "NPT",
    "stage5_ensemble" => "NPT",
    "production_ensemble" => "NPT",

    "stage1_method" => "Brownie",
    "stage2_method" => "Berendsen",
    "stage3_method" => "Berendsen",
    "stage4_method" => "Berendsen",
    "stage5_method" => "Berendsen",
    "production_method" => "MTK",

    "stage2_thermostat_tau" => "0.1",
    "stage3_thermostat_tau" => "0.1",
    "stage4_thermostat_tau" => "0.1",
    "stage5_thermostat_tau" => "0.1",
    "production_thermostat_tau" => "1.0",

    "stage3_barostat_tau" => "50.0",
    "stage4_barostat_tau" => "50.0",
    "stage5_barostat_tau" => "2.0",
    "production_barostat_tau" => "2.0",

    "stage1_traj_center" => "[]",
    "stage2_traj_center" => "[]",
    "stage3_traj_center" => "[]",
    "stage4_traj_center" => "[]",
    "stage5_traj_center" => "solute",
    "production_traj_center" => "",

    "stage1_restraints_number_pos" => "1",
    "stage1_restraints_atoms_pos" => "solute_heavy_atom",
    "stage1_restraints_forces_pos" => "50.0",
    "stage2_restraints_number_pos" => "1",
    "stage2_restraints_atoms_pos" => "solute_heavy_atom",
    "stage2_restraints_forces_pos" => "50.0",
    "stage3_restraints_number_pos" => "1",
    "stage3_restraints_atoms_pos" => "solute_heavy_atom",
    "stage3_restraints_forces_pos" => "50.0",
    "stage4_restraints_number_pos" => "1",
    "stage4_restraints_atoms_pos" => "solute_heavy_atom",
    "stage4_restraints_forces_pos" => "50.0",
    "stage5_restraints_atoms_pos" => "solute_heavy_atom",

    "production_bigger_rclone" => "false",
    "production_checkpt_first" => "0.0",
    "production_checkpt_interval" => "240.06",
    "production_write_last_step" => "true",
    "production_cutoff" => "9.0",
    "production_elapsed_time" => "0.0",
    "production_energy_group" => "false",
    "production_eneseq_first" => "0.0",
    "production_eneseq_interval" => "1.2",
    "production_glue" => "solute",
    "production_maeff_first" => "0.0",
    "production_maeff_interval" => "120.0",
    "production_maeff_periodicfix" => "true",
    "production_meta" => "false",
    "production_pressure" => "1.01325",
    "production_pressure_type" => "isotropic",
    "production_randomize_vel_first" => "0.0",
    "production_randomize_vel_interval" => "inf",
    "production_simbox_first" => "0.0",
    "production_simbox_interval" => "1.2",
    "production_surface_tension" => "0.0",
    "production_taper" => "false",
    "production_traj_first" => "0.0",
    "production_traj_format" => "dtr",
    "production_traj_frames_per_file" => "250",
    "production_traj_interval" => "50.0",
    "production_traj_periodicfix" => "true",
    "production_traj_write_velocity" => "false",

    "name_pos" => "posre_harm",
    "name_dist" => "stretch_harm",
    "name_ang" => "angle_harm",
    "name_imp" => "improper_harm",

    "additional_stages" => "0",
    "additional_stage_times" => "0",
    "additional_stage_temps" => "0",
    "additional_stage_ensembles" => "0",
    "additional_stage_methods" => "0",
    "additional_stage_thermostat_tau" => "0.1",
    "additional_stage_barostat_tau" => "2.0",
    "additional_stage_traj_center" => "solute",

    "run_preparation" => "false",
    "run_protocols" => "false",
};

/// `[protocol]` keys that are recognized but have no default value.
static PROTOCOL_OPTIONAL_KEYS: Set<&'static str> = phf_set! {
    "stage1_thermostat_tau",
    "stage1_barostat_tau",
    "stage2_barostat_tau",
    "production_randomize_vel_seed",
};

static BUILD_GEOMETRY_KEYS: Set<&'static str> = phf_set! {
    "counterions",
    "counterions_positive_ion",
    "counterions_negative_ion",
    "number",
    "shape",
    "size",
    "size_type",
    "ions_away",
    "ion_awaydistance",
    "ion_awayfrom",
    "override_forcefield",
    "rezero_system",
    "forcefield",
    "salt",
    "concentration",
    "positive_ion",
    "negative_ion",
    "solvent",
};

static SETTINGS_DEFAULTS: Map<&'static str, &'static str> = phf_map! {
    "desmond_path" => "$SCHRODINGER",
    "windows" => "false",
    "workdir" => "md_run",
};

static SETTINGS_OPTIONAL_KEYS: Set<&'static str> = phf_set! {
    "file",
};

/// A section of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Settings,
    BuildGeometry,
    Protocol,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Settings, Section::BuildGeometry, Section::Protocol];

    pub const fn name(self) -> &'static str {
        match self {
            Section::Settings => "settings",
            Section::BuildGeometry => "build_geometry",
            Section::Protocol => "protocol",
        }
    }

    pub fn default_value(self, key: &str) -> Option<&'static str> {
        match self {
            Section::Settings => SETTINGS_DEFAULTS.get(key).copied(),
            Section::BuildGeometry => None,
            Section::Protocol => PROTOCOL_DEFAULTS.get(key).copied(),
        }
    }

    pub fn is_known(self, key: &str) -> bool {
        match self {
            Section::Settings => {
                SETTINGS_DEFAULTS.contains_key(key) || SETTINGS_OPTIONAL_KEYS.contains(key)
            }
            Section::BuildGeometry => BUILD_GEOMETRY_KEYS.contains(key),
            Section::Protocol => {
                PROTOCOL_DEFAULTS.contains_key(key)
                    || PROTOCOL_OPTIONAL_KEYS.contains(key)
                    || RestraintKey::parse(key).is_some()
            }
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which list of a restraint declaration a key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestraintField {
    Number,
    Atoms,
    Forces,
    Constant,
}

/// A parsed `{stage}_restraints_{field}_{kind}` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestraintKey<'a> {
    pub stage: &'a str,
    pub field: RestraintField,
    pub kind: RestraintKind,
}

impl<'a> RestraintKey<'a> {
    pub fn parse(key: &'a str) -> Option<Self> {
        let (stage, rest) = key.split_once("_restraints_")?;
        let known_stage = stage == ADDITIONAL_STAGE_PREFIX
            || FixedStage::ALL.iter().any(|s| s.prefix() == stage);
        if !known_stage {
            return None;
        }
        let (field, suffix) = rest.rsplit_once('_')?;
        let kind = RestraintKind::from_option_suffix(suffix)?;
        let field = match field {
            "number" => RestraintField::Number,
            "atoms" => RestraintField::Atoms,
            "forces" => RestraintField::Forces,
            other if kind.constant().is_some_and(|c| c.name() == other) => {
                RestraintField::Constant
            }
            _ => return None,
        };
        Some(Self { stage, field, kind })
    }
}

/// The raw key/value pairs of one input section.
///
/// Keys are lower-cased and values trimmed on insertion. Lookups fall back to the section's
/// static defaults, so callers never distinguish between "left out" and "set to the default".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOptions {
    section: Section,
    values: BTreeMap<String, String>,
}

impl SectionOptions {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            values: BTreeMap::new(),
        }
    }

    pub fn from_pairs<K, V>(section: Section, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::new(section);
        for (key, value) in pairs {
            options.set(key.as_ref(), value.as_ref());
        }
        options
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Inserts or replaces a value; the last assignment of a key wins.
    pub fn set(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    /// The value given in the input, ignoring defaults.
    pub fn explicit(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The value given in the input, or the section default.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.explicit(key)
            .or_else(|| self.section.default_value(key))
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// One error per key that is not part of this section's namespace, in key order.
    pub fn unknown_keys(&self) -> Vec<UnknownOptionError> {
        self.values
            .keys()
            .filter(|key| !self.section.is_known(key))
            .map(|key| UnknownOptionError {
                section: self.section.name().to_string(),
                key: key.clone(),
            })
            .collect()
    }
}

/// The three sections of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputOptions {
    pub settings: SectionOptions,
    pub build_geometry: SectionOptions,
    pub protocol: SectionOptions,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            settings: SectionOptions::new(Section::Settings),
            build_geometry: SectionOptions::new(Section::BuildGeometry),
            protocol: SectionOptions::new(Section::Protocol),
        }
    }
}

impl InputOptions {
    /// Splits a parsed INI document into its sections. Missing sections are empty; sections
    /// with other names are ignored by the caller after [`InputOptions::foreign_sections`].
    pub fn from_document(document: &IniDocument) -> Self {
        let section = |section: Section| {
            document
                .section(section.name())
                .map(|pairs| SectionOptions::from_pairs(section, pairs))
                .unwrap_or_else(|| SectionOptions::new(section))
        };
        Self {
            settings: section(Section::Settings),
            build_geometry: section(Section::BuildGeometry),
            protocol: section(Section::Protocol),
        }
    }

    /// Names of the document sections this tool does not read.
    pub fn foreign_sections(document: &IniDocument) -> Vec<&str> {
        document
            .section_names()
            .filter(|name| Section::ALL.iter().all(|s| s.name() != *name))
            .collect()
    }

    pub fn get_mut(&mut self, section: Section) -> &mut SectionOptions {
        match section {
            Section::Settings => &mut self.settings,
            Section::BuildGeometry => &mut self.build_geometry,
            Section::Protocol => &mut self.protocol,
        }
    }

    /// Unknown keys across all three sections.
    pub fn unknown_keys(&self) -> Vec<UnknownOptionError> {
        [&self.settings, &self.build_geometry, &self.protocol]
            .into_iter()
            .flat_map(SectionOptions::unknown_keys)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restraint_keys_are_recognized_by_pattern() {
        let key = RestraintKey::parse("stage3_restraints_theta0_ang").unwrap();
        assert_eq!(key.stage, "stage3");
        assert_eq!(key.field, RestraintField::Constant);
        assert_eq!(key.kind, RestraintKind::Angle);

        let key = RestraintKey::parse("additional_stage_restraints_number_imp").unwrap();
        assert_eq!(key.stage, "additional_stage");
        assert_eq!(key.field, RestraintField::Number);
    }

    #[test]
    fn restraint_keys_with_mismatched_constant_or_stage_are_rejected() {
        assert!(RestraintKey::parse("stage1_restraints_r0_ang").is_none());
        assert!(RestraintKey::parse("stage1_restraints_r0_pos").is_none());
        assert!(RestraintKey::parse("stage6_restraints_number_pos").is_none());
        assert!(RestraintKey::parse("stage1_restraints_number_torsion").is_none());
    }

    #[test]
    fn get_falls_back_to_protocol_defaults() {
        let mut options = SectionOptions::new(Section::Protocol);
        options.set("Stage1_Time", " 50 ");
        assert_eq!(options.get("stage1_time"), Some("50"));
        assert_eq!(options.get("stage2_time"), Some("12"));
        assert_eq!(options.get("stage1_thermostat_tau"), None);
        assert_eq!(options.explicit("stage2_time"), None);
    }

    #[test]
    fn unknown_keys_are_reported_per_section() {
        let options = SectionOptions::from_pairs(
            Section::Protocol,
            [
                ("stage1_time", "10"),
                ("stage9_time", "10"),
                ("stage1_restraints_number_dist", "0"),
                ("stage1_restraint_number_pos", "1"),
            ],
        );
        let unknown: Vec<_> = options.unknown_keys().into_iter().map(|e| e.key).collect();
        assert_eq!(unknown, vec!["stage1_restraint_number_pos", "stage9_time"]);
    }

    #[test]
    fn build_geometry_and_settings_have_their_own_namespaces() {
        assert!(Section::BuildGeometry.is_known("solvent"));
        assert!(!Section::BuildGeometry.is_known("stage1_time"));
        assert!(Section::Settings.is_known("file"));
        assert_eq!(Section::Settings.default_value("workdir"), Some("md_run"));
    }
}
