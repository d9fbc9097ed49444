use msjgen::engine::options::{InputOptions, Section};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE (e.g., 'stage1_temp=15').")]
    InvalidSetFormat(String),

    #[error("Unknown section '{section}' in '{raw}'. Expected 'settings', 'build_geometry' or 'protocol'.")]
    UnknownSection { section: String, raw: String },

    #[error("Option name cannot be empty in '{0}'.")]
    EmptyKey(String),
}

/// One `--set` override, addressed to `[protocol]` unless the key names another section
/// (`build_geometry.salt=true`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetValue {
    pub section: Section,
    pub key: String,
    pub value: String,
}

pub fn parse_set_value(raw: &str) -> Result<SetValue, ParseError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidSetFormat(raw.to_string()))?;
    let key = key.trim();
    let (section, key) = match key.split_once('.') {
        Some((section_name, key)) => {
            let section = Section::ALL
                .into_iter()
                .find(|s| s.name().eq_ignore_ascii_case(section_name.trim()))
                .ok_or_else(|| ParseError::UnknownSection {
                    section: section_name.to_string(),
                    raw: raw.to_string(),
                })?;
            (section, key.trim())
        }
        None => (Section::Protocol, key),
    };
    if key.is_empty() {
        return Err(ParseError::EmptyKey(raw.to_string()));
    }
    Ok(SetValue {
        section,
        key: key.to_string(),
        value: value.trim().to_string(),
    })
}

/// Applies every override in order; a later override of the same key wins.
pub fn apply_set_values(options: &mut InputOptions, set_values: &[String]) -> Result<(), ParseError> {
    for raw in set_values {
        let set = parse_set_value(raw)?;
        debug!(section = %set.section, key = %set.key, value = %set.value, "Applying override.");
        options.get_mut(set.section).set(&set.key, &set.value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_keys_target_the_protocol_section() {
        let set = parse_set_value("stage1_temp = 15").unwrap();
        assert_eq!(set.section, Section::Protocol);
        assert_eq!(set.key, "stage1_temp");
        assert_eq!(set.value, "15");
    }

    #[test]
    fn prefixed_keys_target_their_section() {
        let set = parse_set_value("build_geometry.size=12 12 14").unwrap();
        assert_eq!(set.section, Section::BuildGeometry);
        assert_eq!(set.key, "size");
        assert_eq!(set.value, "12 12 14");
    }

    #[test]
    fn values_may_contain_equal_signs() {
        let set = parse_set_value("name_pos=a=b").unwrap();
        assert_eq!(set.value, "a=b");
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        assert_eq!(
            parse_set_value("stage1_temp"),
            Err(ParseError::InvalidSetFormat("stage1_temp".into()))
        );
        assert!(matches!(
            parse_set_value("geometry.size=1"),
            Err(ParseError::UnknownSection { .. })
        ));
        assert_eq!(
            parse_set_value("=1"),
            Err(ParseError::EmptyKey("=1".into()))
        );
    }

    #[test]
    fn later_overrides_win() {
        let mut options = InputOptions::default();
        apply_set_values(
            &mut options,
            &["stage2_time=20".into(), "STAGE2_TIME=30".into(), "settings.windows=yes".into()],
        )
        .unwrap();
        assert_eq!(options.protocol.explicit("stage2_time"), Some("30"));
        assert_eq!(options.settings.explicit("windows"), Some("yes"));
    }
}
