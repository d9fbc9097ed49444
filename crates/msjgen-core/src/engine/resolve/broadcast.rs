use crate::engine::error::BroadcastLengthError;
use std::fmt::Display;

/// A per-stage scalar of the additional stages, checked once against the stage count.
///
/// The value list is either a single value shared by every stage or exactly one value per
/// stage; any other length is rejected by [`ScalarBroadcastValue::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarBroadcastValue<T> {
    values: Vec<T>,
    stage_count: usize,
}

impl<T: Display> ScalarBroadcastValue<T> {
    /// # Errors
    ///
    /// Returns [`BroadcastLengthError`] when `values` holds neither 1 nor `stage_count`
    /// entries.
    pub fn new(
        field: &str,
        values: Vec<T>,
        stage_count: usize,
    ) -> Result<Self, BroadcastLengthError> {
        if values.len() != 1 && values.len() != stage_count {
            return Err(BroadcastLengthError {
                field: field.to_string(),
                stage_count,
                actual: values.len(),
                raw: values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            });
        }
        Ok(Self {
            values,
            stage_count,
        })
    }
}

impl<T> ScalarBroadcastValue<T> {
    /// The value for 1-based `stage_index`, or `None` outside the declared stages.
    pub fn get(&self, stage_index: usize) -> Option<&T> {
        if !(1..=self.stage_count).contains(&stage_index) {
            return None;
        }
        if self.values.len() == 1 {
            self.values.first()
        } else {
            self.values.get(stage_index - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_applies_to_every_stage() {
        let times = ScalarBroadcastValue::new("additional_stage_times", vec![100], 5).unwrap();
        assert_eq!(times.get(3), Some(&100));
        assert_eq!(times.get(1), Some(&100));
        assert_eq!(times.get(5), Some(&100));
    }

    #[test]
    fn full_list_is_indexed_by_stage() {
        let times =
            ScalarBroadcastValue::new("additional_stage_times", vec![100, 200, 300, 400, 500], 5)
                .unwrap();
        assert_eq!(times.get(3), Some(&300));
        assert_eq!(times.get(1), Some(&100));
        assert_eq!(times.get(5), Some(&500));
    }

    #[test]
    fn partial_list_is_rejected() {
        let err = ScalarBroadcastValue::new("additional_stage_temps", vec![1, 2, 3], 5).unwrap_err();
        assert_eq!(
            err,
            BroadcastLengthError {
                field: "additional_stage_temps".into(),
                stage_count: 5,
                actual: 3,
                raw: "1,2,3".into(),
            }
        );
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = ScalarBroadcastValue::<f64>::new("additional_stage_times", vec![], 2).unwrap_err();
        assert_eq!(err.actual, 0);
    }

    #[test]
    fn string_values_broadcast_too() {
        let ensembles =
            ScalarBroadcastValue::new("additional_stage_ensembles", vec!["NPT".to_string()], 2)
                .unwrap();
        assert_eq!(ensembles.get(2).map(String::as_str), Some("NPT"));
    }

    #[test]
    fn indices_outside_the_declared_stages_have_no_value() {
        let taus =
            ScalarBroadcastValue::new("additional_stage_thermostat_tau", vec![0.1], 3).unwrap();
        assert_eq!(taus.get(0), None);
        assert_eq!(taus.get(4), None);
    }
}
