//! Lenient parsing of form and JSON field values.
//!
//! Product writes arrive as JSON (typed booleans and numbers) or as form
//! fields (everything is a string). Both shapes deserialize into the types
//! here, and a single set of rules decides what they mean.
//!
//! # Accepted flag inputs
//!
//! | Input                                  | Meaning |
//! |----------------------------------------|---------|
//! | `true`, `"true"`, `"1"`, `"on"`, `1`   | `true`  |
//! | `false`, `"false"`, `"0"`, `"off"`, `0`| `false` |
//! | anything else                          | field default |
//!
//! String matching ignores ASCII case and surrounding whitespace.

use serde::Deserialize;

/// Parse a flag string using the accepted vocabulary.
///
/// Returns `None` for values outside the vocabulary.
#[must_use]
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Some(true),
        "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// A boolean-ish field value as submitted by a client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlagInput {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl FlagInput {
    /// Interpret the value, or `None` if it is outside the vocabulary.
    #[must_use]
    pub fn parse(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Number(1) => Some(true),
            Self::Number(0) => Some(false),
            Self::Number(_) => None,
            Self::Text(raw) => parse_flag(raw),
        }
    }

    /// Interpret the value, falling back to `default` when unrecognized.
    #[must_use]
    pub fn resolve(&self, default: bool) -> bool {
        self.parse().unwrap_or(default)
    }
}

/// Resolve an optional flag field against its default.
#[must_use]
pub fn resolve_flag(input: Option<&FlagInput>, default: bool) -> bool {
    input.map_or(default, |flag| flag.resolve(default))
}

/// A stock count as submitted by a client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StockInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl StockInput {
    /// Interpret the value as a whole stock count.
    ///
    /// Fractions are truncated toward zero. Blank strings, non-numeric
    /// strings and non-finite numbers yield `None`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Stock counts are small; saturation is fine
    pub fn parse(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) => value.is_finite().then(|| value.trunc() as i64),
            Self::Text(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return None;
                }
                raw.parse::<i64>().ok().or_else(|| {
                    raw.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(|v| v.trunc() as i64)
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_vocabulary() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("on"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("yes please"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_flag_from_json() {
        let flag: FlagInput = serde_json::from_str("true").unwrap();
        assert!(flag.resolve(false));

        let flag: FlagInput = serde_json::from_str("\"false\"").unwrap();
        assert!(!flag.resolve(true));

        let flag: FlagInput = serde_json::from_str("0").unwrap();
        assert!(!flag.resolve(true));
    }

    #[test]
    fn test_flag_falls_back_to_default() {
        let flag = FlagInput::Text("maybe".to_owned());
        assert!(flag.resolve(true));
        assert!(!flag.resolve(false));
        assert!(FlagInput::Number(7).resolve(true));
    }

    #[test]
    fn test_resolve_optional_flag() {
        assert!(resolve_flag(None, true));
        assert!(!resolve_flag(None, false));
        assert!(!resolve_flag(Some(&FlagInput::Bool(false)), true));
    }

    #[test]
    fn test_stock_parsing() {
        assert_eq!(StockInput::Integer(4).parse(), Some(4));
        assert_eq!(StockInput::Float(3.9).parse(), Some(3));
        assert_eq!(StockInput::Text(" 12 ".to_owned()).parse(), Some(12));
        assert_eq!(StockInput::Text("2.5".to_owned()).parse(), Some(2));
        assert_eq!(StockInput::Text(String::new()).parse(), None);
        assert_eq!(StockInput::Text("many".to_owned()).parse(), None);
        assert_eq!(StockInput::Float(f64::NAN).parse(), None);
    }

    #[test]
    fn test_stock_from_json() {
        let stock: StockInput = serde_json::from_str("5").unwrap();
        assert_eq!(stock.parse(), Some(5));

        let stock: StockInput = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(stock.parse(), Some(7));
    }
}
