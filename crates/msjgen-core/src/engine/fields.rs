use crate::core::list::{
    TokenParseError, parse_count, parse_flag, parse_number, parse_numbers, parse_triple,
    split_list,
};
use crate::engine::error::ProtocolError;
use crate::engine::options::SectionOptions;

/// Typed access to the values of one section that keeps going after a bad value.
///
/// Each failed conversion records an [`ProtocolError::InvalidValue`] and yields a neutral
/// placeholder, so a whole section can be read in one pass and every problem reported at
/// once. Values read from a reader with errors must never be exposed.
pub(crate) struct FieldReader<'a> {
    options: &'a SectionOptions,
    errors: Vec<ProtocolError>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(options: &'a SectionOptions) -> Self {
        Self {
            options,
            errors: Vec::new(),
        }
    }

    pub(crate) fn raw(&self, key: &str) -> Option<&'a str> {
        self.options.get(key)
    }

    pub(crate) fn push(&mut self, error: ProtocolError) {
        self.errors.push(error);
    }

    pub(crate) fn extend(&mut self, errors: impl IntoIterator<Item = ProtocolError>) {
        self.errors.extend(errors);
    }

    fn convert<T>(
        &mut self,
        key: &str,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Result<T, TokenParseError>,
    ) -> Option<T> {
        let raw = self.raw(key).unwrap_or_default();
        match parse(raw) {
            Ok(value) => Some(value),
            Err(mut source) => {
                source.expected = expected;
                self.errors.push(ProtocolError::invalid_value(key, source));
                None
            }
        }
    }

    pub(crate) fn text(&self, key: &str) -> String {
        self.raw(key).unwrap_or_default().to_string()
    }

    pub(crate) fn flag(&self, key: &str) -> bool {
        self.raw(key).is_some_and(parse_flag)
    }

    pub(crate) fn number(&mut self, key: &str) -> f64 {
        self.convert(key, "number", parse_number).unwrap_or_default()
    }

    /// A number that may be left out, written as an empty value or as `none`.
    pub(crate) fn optional_number(&mut self, key: &str) -> Option<f64> {
        match self.raw(key).map(str::trim) {
            None | Some("") => None,
            Some(value) if value.eq_ignore_ascii_case("none") => None,
            Some(_) => self.convert(key, "number", parse_number),
        }
    }

    pub(crate) fn count(&mut self, key: &str) -> usize {
        self.convert(key, "non-negative integer", parse_count)
            .unwrap_or_default()
    }

    pub(crate) fn triple(&mut self, key: &str) -> [f64; 3] {
        self.convert(key, "triple of numbers", parse_triple)
            .unwrap_or_default()
    }

    pub(crate) fn optional_triple(&mut self, key: &str) -> Option<[f64; 3]> {
        match self.raw(key).map(str::trim) {
            None | Some("") => None,
            Some(_) => self.convert(key, "triple of numbers", parse_triple),
        }
    }

    pub(crate) fn seed(&mut self, key: &str) -> Option<u32> {
        match self.raw(key).map(str::trim) {
            None | Some("") => None,
            Some(_) => self.convert(key, "seed between 0 and 4294967295", |raw| {
                raw.trim()
                    .parse::<u32>()
                    .map_err(|_| TokenParseError::new(raw, "seed"))
            }),
        }
    }

    /// A comma-separated list of numbers, empty when the key is absent and `None` when a
    /// token fails to parse.
    pub(crate) fn numbers(&mut self, key: &str) -> Option<Vec<f64>> {
        match parse_numbers(&split_list(self.raw(key))) {
            Ok(values) => Some(values),
            Err(source) => {
                self.errors.push(ProtocolError::invalid_value(key, source));
                None
            }
        }
    }

    /// A comma-separated list of words, empty when the key is absent.
    pub(crate) fn words(&self, key: &str) -> Vec<String> {
        split_list(self.raw(key))
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn into_errors(self) -> Vec<ProtocolError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::options::Section;

    fn protocol(pairs: &[(&str, &str)]) -> SectionOptions {
        SectionOptions::from_pairs(Section::Protocol, pairs.iter().copied())
    }

    #[test]
    fn reads_defaults_when_keys_are_absent() {
        let options = protocol(&[]);
        let mut reader = FieldReader::new(&options);
        assert_eq!(reader.number("stage4_temp"), 300.0);
        assert_eq!(reader.triple("stage1_timestep"), [0.001, 0.001, 0.003]);
        assert!(reader.flag("stage1"));
        assert_eq!(reader.optional_number("stage1_thermostat_tau"), None);
        assert!(reader.into_errors().is_empty());
    }

    #[test]
    fn collects_every_bad_value() {
        let options = protocol(&[
            ("stage1_time", "ten"),
            ("stage2_timestep", "0.001 0.003"),
            ("production_randomize_vel_seed", "-4"),
        ]);
        let mut reader = FieldReader::new(&options);
        reader.number("stage1_time");
        reader.triple("stage2_timestep");
        reader.seed("production_randomize_vel_seed");
        let errors = reader.into_errors();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].to_string().contains("'stage1_time'"));
        assert!(errors[0].to_string().contains("'ten' is not a valid number"));
    }

    #[test]
    fn numbers_reject_the_whole_list_on_a_bad_token() {
        let options = protocol(&[("additional_stage_times", "10,x")]);
        let mut reader = FieldReader::new(&options);
        assert_eq!(reader.numbers("additional_stage_times"), None);
        assert_eq!(reader.into_errors().len(), 1);
    }

    #[test]
    fn none_disables_an_optional_number() {
        let options = protocol(&[("stage2_thermostat_tau", "None")]);
        let mut reader = FieldReader::new(&options);
        assert_eq!(reader.optional_number("stage2_thermostat_tau"), None);
        assert!(reader.into_errors().is_empty());
    }

    #[test]
    fn numbers_parse_comma_separated_lists() {
        let options = protocol(&[("additional_stage_temps", "300, 310,320")]);
        let mut reader = FieldReader::new(&options);
        assert_eq!(
            reader.numbers("additional_stage_temps"),
            Some(vec![300.0, 310.0, 320.0])
        );
        assert_eq!(reader.words("additional_stage_methods"), vec!["0"]);
    }
}
