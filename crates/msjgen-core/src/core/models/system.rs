use serde::Serialize;

/// Settings of the system-builder step that solvates and neutralizes the input structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemBuilderConfig {
    pub counterions: bool,
    pub counterions_positive_ion: String,
    pub counterions_negative_ion: String,
    /// Counterion count, or `neutralize_system`.
    pub number: String,
    pub shape: String,
    /// Box dimensions: one value for a cubic box, three otherwise.
    pub size: Vec<f64>,
    pub size_type: String,
    pub ions_away: bool,
    pub ion_awaydistance: f64,
    /// ASL expression of the atoms ions are kept away from.
    pub ion_awayfrom: String,
    pub override_forcefield: String,
    pub rezero_system: bool,
    pub forcefield: String,
    pub salt: bool,
    pub concentration: f64,
    pub positive_ion: String,
    pub negative_ion: String,
    pub solvent: String,
}

impl Default for SystemBuilderConfig {
    fn default() -> Self {
        Self {
            counterions: false,
            counterions_positive_ion: "Na".into(),
            counterions_negative_ion: "Cl".into(),
            number: "neutralize_system".into(),
            shape: "orthorhombic".into(),
            size: vec![10.0, 10.0, 10.0],
            size_type: "buffer".into(),
            ions_away: false,
            ion_awaydistance: 5.0,
            ion_awayfrom: "protein".into(),
            override_forcefield: "OPLS_2005".into(),
            rezero_system: true,
            forcefield: "OPLS_2005".into(),
            salt: false,
            concentration: 0.15,
            positive_ion: "Na".into(),
            negative_ion: "Cl".into(),
            solvent: "SPC".into(),
        }
    }
}

impl SystemBuilderConfig {
    /// The ion that neutralizes a structure of total `charge`, or `None` when counterions
    /// are off or the structure is already neutral.
    pub fn counterion_for(&self, charge: i64) -> Option<&str> {
        if !self.counterions {
            return None;
        }
        match charge.signum() {
            -1 => Some(&self.counterions_positive_ion),
            1 => Some(&self.counterions_negative_ion),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct SystemBuilderConfigBuilder {
    config: SystemBuilderConfig,
}

impl SystemBuilderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counterions(mut self, enabled: bool) -> Self {
        self.config.counterions = enabled;
        self
    }
    pub fn counterion_species(mut self, positive: &str, negative: &str) -> Self {
        self.config.counterions_positive_ion = positive.to_string();
        self.config.counterions_negative_ion = negative.to_string();
        self
    }
    pub fn number(mut self, number: &str) -> Self {
        self.config.number = number.to_string();
        self
    }
    pub fn shape(mut self, shape: &str) -> Self {
        self.config.shape = shape.to_string();
        self
    }
    pub fn size(mut self, size: Vec<f64>) -> Self {
        self.config.size = size;
        self
    }
    pub fn size_type(mut self, size_type: &str) -> Self {
        self.config.size_type = size_type.to_string();
        self
    }
    pub fn ions_away(mut self, enabled: bool) -> Self {
        self.config.ions_away = enabled;
        self
    }
    pub fn ion_awaydistance(mut self, distance: f64) -> Self {
        self.config.ion_awaydistance = distance;
        self
    }
    pub fn ion_awayfrom(mut self, asl: &str) -> Self {
        self.config.ion_awayfrom = asl.to_string();
        self
    }
    pub fn override_forcefield(mut self, forcefield: &str) -> Self {
        self.config.override_forcefield = forcefield.to_string();
        self
    }
    pub fn rezero_system(mut self, enabled: bool) -> Self {
        self.config.rezero_system = enabled;
        self
    }
    pub fn forcefield(mut self, forcefield: &str) -> Self {
        self.config.forcefield = forcefield.to_string();
        self
    }
    pub fn salt(mut self, enabled: bool) -> Self {
        self.config.salt = enabled;
        self
    }
    pub fn concentration(mut self, concentration: f64) -> Self {
        self.config.concentration = concentration;
        self
    }
    pub fn salt_species(mut self, positive: &str, negative: &str) -> Self {
        self.config.positive_ion = positive.to_string();
        self.config.negative_ion = negative.to_string();
        self
    }
    pub fn solvent(mut self, solvent: &str) -> Self {
        self.config.solvent = solvent.to_string();
        self
    }

    pub fn build(self) -> SystemBuilderConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterion_opposes_the_sign_of_the_charge() {
        let config = SystemBuilderConfigBuilder::new()
            .counterions(true)
            .counterion_species("K", "Cl")
            .build();
        assert_eq!(config.counterion_for(-2), Some("K"));
        assert_eq!(config.counterion_for(3), Some("Cl"));
        assert_eq!(config.counterion_for(0), None);
    }

    #[test]
    fn counterions_are_skipped_when_disabled() {
        let config = SystemBuilderConfig::default();
        assert!(!config.counterions);
        assert_eq!(config.counterion_for(-1), None);
    }

    #[test]
    fn builder_starts_from_the_documented_defaults() {
        let config = SystemBuilderConfigBuilder::new().solvent("TIP3P").build();
        assert_eq!(config.solvent, "TIP3P");
        assert_eq!(config.size, vec![10.0, 10.0, 10.0]);
        assert_eq!(config.forcefield, "OPLS_2005");
        assert!(config.rezero_system);
    }
}
