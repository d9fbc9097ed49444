use serde::Serialize;
use std::fmt;

/// Option prefix shared by every user-declared additional stage.
pub const ADDITIONAL_STAGE_PREFIX: &str = "additional_stage";

/// The six stages every protocol has, in execution order (additional stages run between
/// [`FixedStage::Stage5`] and [`FixedStage::Production`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedStage {
    Stage1,
    Stage2,
    Stage3,
    Stage4,
    Stage5,
    Production,
}

impl FixedStage {
    pub const ALL: [FixedStage; 6] = [
        FixedStage::Stage1,
        FixedStage::Stage2,
        FixedStage::Stage3,
        FixedStage::Stage4,
        FixedStage::Stage5,
        FixedStage::Production,
    ];

    pub const EQUILIBRATION: [FixedStage; 5] = [
        FixedStage::Stage1,
        FixedStage::Stage2,
        FixedStage::Stage3,
        FixedStage::Stage4,
        FixedStage::Stage5,
    ];

    /// Prefix of every option belonging to this stage, which is also the name of its
    /// enable flag (`stage3 = false`).
    pub const fn prefix(self) -> &'static str {
        match self {
            FixedStage::Stage1 => "stage1",
            FixedStage::Stage2 => "stage2",
            FixedStage::Stage3 => "stage3",
            FixedStage::Stage4 => "stage4",
            FixedStage::Stage5 => "stage5",
            FixedStage::Production => "production",
        }
    }

    pub fn key(self, field: &str) -> String {
        format!("{}_{}", self.prefix(), field)
    }

    pub fn is_production(self) -> bool {
        self == FixedStage::Production
    }
}

impl fmt::Display for FixedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joins_prefix_and_field() {
        assert_eq!(FixedStage::Stage2.key("temp"), "stage2_temp");
        assert_eq!(FixedStage::Production.key("time"), "production_time");
    }

    #[test]
    fn equilibration_stages_exclude_production() {
        assert!(FixedStage::EQUILIBRATION.iter().all(|s| !s.is_production()));
        assert_eq!(FixedStage::ALL.last(), Some(&FixedStage::Production));
    }
}
