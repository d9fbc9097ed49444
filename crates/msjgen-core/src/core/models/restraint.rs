use serde::Serialize;
use std::fmt;

/// The geometric target value a restraint kind is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometricConstant {
    R0,
    Theta0,
    Phi0,
}

impl GeometricConstant {
    /// Name of the constant in option keys and in the emitted job files.
    pub const fn name(self) -> &'static str {
        match self {
            GeometricConstant::R0 => "r0",
            GeometricConstant::Theta0 => "theta0",
            GeometricConstant::Phi0 => "phi0",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestraintKind {
    Positional,
    Distance,
    Angle,
    Improper,
}

/// One row of the [`ARITY_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityEntry {
    pub kind: RestraintKind,
    /// Number of consecutive atom selections consumed by one restraint.
    pub atoms_per_restraint: usize,
    pub constant: Option<GeometricConstant>,
    /// Suffix used in option keys (`stage1_restraints_number_{suffix}`).
    pub option_suffix: &'static str,
    /// Potential name written when the configuration does not override it.
    pub default_potential: &'static str,
}

/// Fixed per-kind arity and constant requirements, in emission order.
pub static ARITY_TABLE: [ArityEntry; 4] = [
    ArityEntry {
        kind: RestraintKind::Positional,
        atoms_per_restraint: 1,
        constant: None,
        option_suffix: "pos",
        default_potential: "posre_harm",
    },
    ArityEntry {
        kind: RestraintKind::Distance,
        atoms_per_restraint: 2,
        constant: Some(GeometricConstant::R0),
        option_suffix: "dist",
        default_potential: "stretch_harm",
    },
    ArityEntry {
        kind: RestraintKind::Angle,
        atoms_per_restraint: 3,
        constant: Some(GeometricConstant::Theta0),
        option_suffix: "ang",
        default_potential: "angle_harm",
    },
    ArityEntry {
        kind: RestraintKind::Improper,
        atoms_per_restraint: 4,
        constant: Some(GeometricConstant::Phi0),
        option_suffix: "imp",
        default_potential: "improper_harm",
    },
];

/// Option keys describing one restraint kind of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestraintKeys {
    pub number: String,
    pub atoms: String,
    pub forces: String,
    pub constant: Option<String>,
}

impl RestraintKind {
    pub const ALL: [RestraintKind; 4] = [
        RestraintKind::Positional,
        RestraintKind::Distance,
        RestraintKind::Angle,
        RestraintKind::Improper,
    ];

    pub fn entry(self) -> &'static ArityEntry {
        &ARITY_TABLE[self as usize]
    }

    pub fn arity(self) -> usize {
        self.entry().atoms_per_restraint
    }

    pub fn constant(self) -> Option<GeometricConstant> {
        self.entry().constant
    }

    pub fn option_suffix(self) -> &'static str {
        self.entry().option_suffix
    }

    pub fn from_option_suffix(suffix: &str) -> Option<Self> {
        ARITY_TABLE
            .iter()
            .find(|entry| entry.option_suffix == suffix)
            .map(|entry| entry.kind)
    }

    /// Builds the option keys of this kind for the stage whose key prefix is `stage`.
    pub fn keys(self, stage: &str) -> RestraintKeys {
        let suffix = self.option_suffix();
        RestraintKeys {
            number: format!("{stage}_restraints_number_{suffix}"),
            atoms: format!("{stage}_restraints_atoms_{suffix}"),
            forces: format!("{stage}_restraints_forces_{suffix}"),
            constant: self
                .constant()
                .map(|c| format!("{stage}_restraints_{}_{suffix}", c.name())),
        }
    }
}

impl fmt::Display for RestraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RestraintKind::Positional => "positional",
            RestraintKind::Distance => "distance",
            RestraintKind::Angle => "angle",
            RestraintKind::Improper => "improper",
        };
        f.write_str(name)
    }
}

/// A single resolved restraint instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestraintRecord {
    kind: RestraintKind,
    atom_group: Vec<String>,
    force_constant: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    geometric_constant: Option<f64>,
    #[serde(skip)]
    force_text: String,
    #[serde(skip)]
    constant_text: Option<String>,
}

impl RestraintRecord {
    pub(crate) fn new(
        kind: RestraintKind,
        atom_group: Vec<String>,
        force_constant: f64,
        geometric_constant: Option<f64>,
    ) -> Self {
        debug_assert_eq!(atom_group.len(), kind.arity());
        debug_assert_eq!(geometric_constant.is_some(), kind.constant().is_some());
        Self {
            kind,
            atom_group,
            force_constant,
            geometric_constant,
            force_text: force_constant.to_string(),
            constant_text: geometric_constant.map(|c| c.to_string()),
        }
    }

    /// Records the force and constant tokens exactly as they appeared in the input, so the
    /// job files echo `50.0` rather than a reformatted `50`.
    pub(crate) fn with_tokens(mut self, force: &str, constant: Option<&str>) -> Self {
        self.force_text = force.to_string();
        if self.geometric_constant.is_some() {
            self.constant_text = constant.map(str::to_string);
        }
        self
    }

    pub fn kind(&self) -> RestraintKind {
        self.kind
    }

    pub fn atom_group(&self) -> &[String] {
        &self.atom_group
    }

    pub fn force_constant(&self) -> f64 {
        self.force_constant
    }

    pub fn geometric_constant(&self) -> Option<f64> {
        self.geometric_constant
    }

    /// The force constant as written in the input.
    pub fn force_text(&self) -> &str {
        &self.force_text
    }

    /// The geometric constant as written in the input.
    pub fn constant_text(&self) -> Option<&str> {
        self.constant_text.as_deref()
    }
}

/// The restraints of one kind declared for one stage, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRestraintSet {
    kind: RestraintKind,
    records: Vec<RestraintRecord>,
}

impl StageRestraintSet {
    pub fn empty(kind: RestraintKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    pub(crate) fn from_records(kind: RestraintKind, records: Vec<RestraintRecord>) -> Self {
        Self { kind, records }
    }

    pub fn kind(&self) -> RestraintKind {
        self.kind
    }

    pub fn records(&self) -> &[RestraintRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestraintRecord> {
        self.records.iter()
    }

    /// Concatenates the atom groups back into the flat list they were resolved from.
    pub fn flatten_atom_groups(&self) -> Vec<&str> {
        self.records
            .iter()
            .flat_map(|r| r.atom_group.iter().map(String::as_str))
            .collect()
    }
}

/// All restraint sets of one stage, one per kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRestraints {
    positional: StageRestraintSet,
    distance: StageRestraintSet,
    angle: StageRestraintSet,
    improper: StageRestraintSet,
}

impl Default for StageRestraints {
    fn default() -> Self {
        Self {
            positional: StageRestraintSet::empty(RestraintKind::Positional),
            distance: StageRestraintSet::empty(RestraintKind::Distance),
            angle: StageRestraintSet::empty(RestraintKind::Angle),
            improper: StageRestraintSet::empty(RestraintKind::Improper),
        }
    }
}

impl StageRestraints {
    pub fn get(&self, kind: RestraintKind) -> &StageRestraintSet {
        match kind {
            RestraintKind::Positional => &self.positional,
            RestraintKind::Distance => &self.distance,
            RestraintKind::Angle => &self.angle,
            RestraintKind::Improper => &self.improper,
        }
    }

    pub(crate) fn insert(&mut self, set: StageRestraintSet) {
        let slot = match set.kind {
            RestraintKind::Positional => &mut self.positional,
            RestraintKind::Distance => &mut self.distance,
            RestraintKind::Angle => &mut self.angle,
            RestraintKind::Improper => &mut self.improper,
        };
        *slot = set;
    }

    /// Sets in emission order: positional, distance, angle, improper.
    pub fn iter(&self) -> impl Iterator<Item = &StageRestraintSet> {
        RestraintKind::ALL.into_iter().map(|kind| self.get(kind))
    }

    pub fn total(&self) -> usize {
        self.iter().map(StageRestraintSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_table_matches_geometric_arity_of_each_kind() {
        assert_eq!(RestraintKind::Positional.arity(), 1);
        assert_eq!(RestraintKind::Distance.arity(), 2);
        assert_eq!(RestraintKind::Angle.arity(), 3);
        assert_eq!(RestraintKind::Improper.arity(), 4);
    }

    #[test]
    fn arity_table_rows_are_indexed_by_kind() {
        for kind in RestraintKind::ALL {
            assert_eq!(kind.entry().kind, kind);
        }
    }

    #[test]
    fn only_positional_restraints_have_no_constant() {
        assert_eq!(RestraintKind::Positional.constant(), None);
        assert_eq!(
            RestraintKind::Distance.constant(),
            Some(GeometricConstant::R0)
        );
        assert_eq!(
            RestraintKind::Angle.constant(),
            Some(GeometricConstant::Theta0)
        );
        assert_eq!(
            RestraintKind::Improper.constant(),
            Some(GeometricConstant::Phi0)
        );
    }

    #[test]
    fn keys_follow_the_option_naming_scheme() {
        let keys = RestraintKind::Angle.keys("stage3");
        assert_eq!(keys.number, "stage3_restraints_number_ang");
        assert_eq!(keys.atoms, "stage3_restraints_atoms_ang");
        assert_eq!(keys.forces, "stage3_restraints_forces_ang");
        assert_eq!(keys.constant.as_deref(), Some("stage3_restraints_theta0_ang"));

        let keys = RestraintKind::Positional.keys("additional_stage");
        assert_eq!(keys.number, "additional_stage_restraints_number_pos");
        assert_eq!(keys.constant, None);
    }

    #[test]
    fn from_option_suffix_round_trips_every_kind() {
        for kind in RestraintKind::ALL {
            assert_eq!(RestraintKind::from_option_suffix(kind.option_suffix()), Some(kind));
        }
        assert_eq!(RestraintKind::from_option_suffix("torsion"), None);
    }

    #[test]
    fn stage_restraints_iterates_in_emission_order() {
        let restraints = StageRestraints::default();
        let kinds: Vec<_> = restraints.iter().map(StageRestraintSet::kind).collect();
        assert_eq!(kinds, RestraintKind::ALL.to_vec());
        assert!(restraints.is_empty());
    }

    #[test]
    fn stage_restraints_insert_replaces_the_matching_slot() {
        let mut restraints = StageRestraints::default();
        let record = RestraintRecord::new(
            RestraintKind::Distance,
            vec!["a1".into(), "a2".into()],
            5.0,
            Some(1.0),
        );
        restraints.insert(StageRestraintSet::from_records(
            RestraintKind::Distance,
            vec![record],
        ));
        assert_eq!(restraints.get(RestraintKind::Distance).len(), 1);
        assert_eq!(restraints.total(), 1);
        assert!(restraints.get(RestraintKind::Positional).is_empty());
    }
}
