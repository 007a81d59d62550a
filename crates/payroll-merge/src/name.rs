//! Employee identity keys shared by the accounting export and the provider workbook.
//!
//! Both systems write names as `Last, First [Middle]`, but middle names and
//! initials are not consistent between them, so the key keeps only the last
//! name and the first token of the given names.

use crate::error::PayrollError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: &str = ", ";

/// Canonical `LAST, FIRST` key, uppercased and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmployeeKey {
    canonical: String,
    // byte offset of the separator in `canonical`
    split: usize,
}

impl EmployeeKey {
    /// Normalize a raw `Last, First [Middle]` string.
    pub fn parse(raw: &str) -> Result<Self, PayrollError> {
        let (last, remainder) = raw
            .split_once(SEPARATOR)
            .ok_or_else(|| PayrollError::MalformedName(raw.to_owned()))?;
        Ok(Self::from_parts(last, remainder))
    }

    /// Build a key from separate name cells. Anything after the first token of
    /// `first` is treated as a middle name and dropped.
    pub fn from_parts(last: &str, first: &str) -> Self {
        let last = last.trim().to_uppercase();
        let first = first.split_whitespace().next().unwrap_or("").to_uppercase();

        let split = last.len();
        let mut canonical = last;
        canonical.push_str(SEPARATOR);
        canonical.push_str(&first);
        EmployeeKey { canonical, split }
    }

    pub fn last(&self) -> &str {
        &self.canonical[..self.split]
    }

    pub fn first(&self) -> &str {
        &self.canonical[self.split + SEPARATOR.len()..]
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for EmployeeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for EmployeeKey {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmployeeKey::parse(s)
    }
}

impl Serialize for EmployeeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

/// Whether a first-column value is an employee name rather than a header,
/// total or numeric row.
///
/// This matches the layout of the accounting export: employee rows are
/// `Last, First` and every other row either lacks the separator or carries a
/// digit (`0`-`9`; numerals like `Ⅲ` are part of a name). Other source
/// layouts may need a different rule.
pub fn looks_like_name(value: &str) -> bool {
    value.contains(SEPARATOR) && !value.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> String {
        EmployeeKey::parse(raw).unwrap().to_string()
    }

    #[test]
    fn middle_name_is_dropped() {
        assert_eq!(normalize("Smith, John Robert"), normalize("Smith, John"));
        assert_eq!(normalize("Smith, John R."), "SMITH, JOHN");
    }

    #[test]
    fn whitespace_and_case_are_ignored() {
        assert_eq!(normalize(" smith , john "), "SMITH, JOHN");
        assert_eq!(normalize("Smith,  John"), "SMITH, JOHN");
    }

    #[test]
    fn only_first_separator_splits() {
        let key = EmployeeKey::parse("Smith, Jr., John").unwrap();
        assert_eq!(key.last(), "SMITH");
        assert_eq!(key.first(), "JR.,");
    }

    #[test]
    fn multi_word_last_name_is_kept() {
        let key = EmployeeKey::parse("Van Dyke, Mary Ann").unwrap();
        assert_eq!(key.last(), "VAN DYKE");
        assert_eq!(key.first(), "MARY");
        assert_eq!(key.as_str(), "VAN DYKE, MARY");
    }

    #[test]
    fn missing_separator_is_malformed() {
        let err = EmployeeKey::parse("Smith John").unwrap_err();
        assert!(matches!(err, PayrollError::MalformedName(raw) if raw == "Smith John"));

        // a comma without the following space is not a separator
        assert!(EmployeeKey::parse("Smith,John").is_err());
    }

    #[test]
    fn from_parts_matches_parse() {
        assert_eq!(
            EmployeeKey::from_parts(" Doe ", "jane q"),
            EmployeeKey::parse("Doe, Jane Q").unwrap()
        );
        assert_eq!(EmployeeKey::from_parts("Doe", "").as_str(), "DOE, ");
    }

    #[test]
    fn name_discriminator() {
        assert!(looks_like_name("Doe, Jane"));
        assert!(looks_like_name("Total, Company"));
        assert!(!looks_like_name("Total, 400"));
        assert!(looks_like_name("Smith, John Ⅲ"));
        assert!(looks_like_name("Doe, Jane ½"));
        assert!(!looks_like_name("123-456"));
        assert!(!looks_like_name("Doe Jane"));
        assert!(!looks_like_name(""));
    }
}
