use thiserror::Error;

/// Separator between the values of a list-valued option.
pub const LIST_DELIMITER: char = ',';

const TRUE_FLAGS: [&str; 3] = ["yes", "on", "true"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{token}' is not a valid {expected}")]
pub struct TokenParseError {
    pub token: String,
    pub expected: &'static str,
}

impl TokenParseError {
    pub(crate) fn new(token: &str, expected: &'static str) -> Self {
        Self {
            token: token.to_string(),
            expected,
        }
    }
}

/// Splits a comma-separated option value into its trimmed tokens.
///
/// An absent or blank value is the empty list. Empty tokens between two delimiters are kept
/// so that a typo such as `"a,,b"` is visible to the arity checks instead of being dropped.
pub fn split_list(raw: Option<&str>) -> Vec<&str> {
    match raw {
        Some(value) if !value.trim().is_empty() => {
            value.split(LIST_DELIMITER).map(str::trim).collect()
        }
        _ => Vec::new(),
    }
}

pub fn parse_number(token: &str) -> Result<f64, TokenParseError> {
    token
        .trim()
        .parse::<f64>()
        .map_err(|_| TokenParseError::new(token, "number"))
}

pub fn parse_count(token: &str) -> Result<usize, TokenParseError> {
    token
        .trim()
        .parse::<usize>()
        .map_err(|_| TokenParseError::new(token, "non-negative integer"))
}

pub fn parse_numbers(tokens: &[&str]) -> Result<Vec<f64>, TokenParseError> {
    tokens.iter().map(|t| parse_number(t)).collect()
}

pub fn parse_counts(tokens: &[&str]) -> Result<Vec<usize>, TokenParseError> {
    tokens.iter().map(|t| parse_count(t)).collect()
}

/// Interprets the loose boolean spelling of the input files: `yes`, `on` and `true` (in any
/// case) are true, everything else is false.
pub fn parse_flag(raw: &str) -> bool {
    let value = raw.trim().to_ascii_lowercase();
    TRUE_FLAGS.contains(&value.as_str())
}

/// Parses a whitespace-separated triple such as the `bonded near far` timestep list.
pub fn parse_triple(raw: &str) -> Result<[f64; 3], TokenParseError> {
    let values = raw
        .split_whitespace()
        .map(parse_number)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| TokenParseError::new(raw, "triple of numbers"))?;
    <[f64; 3]>::try_from(values).map_err(|_| TokenParseError::new(raw, "triple of numbers"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_tokens_and_preserves_order() {
        assert_eq!(
            split_list(Some(" res.num 1 , res.num 2,res.num 3 ")),
            vec!["res.num 1", "res.num 2", "res.num 3"]
        );
    }

    #[test]
    fn split_list_treats_absent_and_blank_values_as_empty() {
        assert!(split_list(None).is_empty());
        assert!(split_list(Some("")).is_empty());
        assert!(split_list(Some("   ")).is_empty());
    }

    #[test]
    fn split_list_keeps_empty_tokens_between_delimiters() {
        assert_eq!(split_list(Some("a,,b")), vec!["a", "", "b"]);
    }

    #[test]
    fn split_list_returns_single_token_without_delimiter() {
        assert_eq!(split_list(Some("solute_heavy_atom")), vec!["solute_heavy_atom"]);
    }

    #[test]
    fn parse_count_rejects_negative_and_fractional_values() {
        assert_eq!(parse_count(" 3 "), Ok(3));
        assert!(parse_count("-1").is_err());
        assert!(parse_count("2.0").is_err());
    }

    #[test]
    fn parse_numbers_reports_the_offending_token() {
        let err = parse_numbers(&["1.0", "abc"]).unwrap_err();
        assert_eq!(err.token, "abc");
        assert_eq!(err.expected, "number");
    }

    #[test]
    fn parse_flag_accepts_only_truthy_spellings() {
        assert!(parse_flag("yes"));
        assert!(parse_flag("ON"));
        assert!(parse_flag(" True "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn parse_triple_requires_exactly_three_numbers() {
        assert_eq!(parse_triple("0.001 0.001 0.003"), Ok([0.001, 0.001, 0.003]));
        assert!(parse_triple("0.001 0.001").is_err());
        assert!(parse_triple("0.001 x 0.003").is_err());
    }
}
