//! `params.txt` launcher parameter format
//!
//! The file is line oriented. Lines of the form `param=<id>=<value>` carry a
//! parameter; every other line (comments, timestamps, blank lines) is ignored.
//! The value is everything after the second `=` and may itself contain `=`.
//!
//! ```text
//! Created at 2024-06-01T12:00:00
//! Synthetic params.txt, not derived from launcher
//! param=25=220
//! ```

use std::collections::BTreeMap;
use std::num::ParseIntError;

use thiserror::Error;

const PARAM_PREFIX: &str = "param=";

/// Parameters with a known meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Client revision number
    Revision,
}

impl ParamType {
    /// Numeric id of this parameter in `params.txt`
    pub const fn id(self) -> u32 {
        match self {
            Self::Revision => 25,
        }
    }
}

/// Errors raised while parsing a params file
#[derive(Debug, Error)]
pub enum ParamsError {
    /// The id between `param=` and the next `=` is not a non-negative integer
    #[error("invalid param id '{id}' on line {line}: {source}")]
    InvalidId {
        /// 1-based line number
        line: usize,
        /// Offending id text
        id: String,
        /// Integer parse failure
        #[source]
        source: ParseIntError,
    },
}

/// Integer-keyed parameter table
///
/// Parsing always replaces the whole table; later lines overwrite earlier
/// lines with the same id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamsTable {
    values: BTreeMap<u32, String>,
}

impl ParamsTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a params document
    pub fn parse_str(content: &str) -> Result<Self, ParamsError> {
        let mut table = Self::new();
        table.replace_from_str(content)?;
        Ok(table)
    }

    /// Replace the table contents with the params in `content`
    ///
    /// On error the table is left empty.
    pub fn replace_from_str(&mut self, content: &str) -> Result<(), ParamsError> {
        self.values.clear();

        for (index, line) in content.lines().enumerate() {
            let Some((id, value)) = split_param_line(line) else {
                continue;
            };

            match id.parse::<u32>() {
                Ok(id) => {
                    self.values.insert(id, value.to_string());
                }
                Err(source) => {
                    self.values.clear();
                    return Err(ParamsError::InvalidId {
                        line: index + 1,
                        id: id.to_string(),
                        source,
                    });
                }
            }
        }

        Ok(())
    }

    /// Value of a well-known parameter
    pub fn get(&self, param: ParamType) -> Option<&str> {
        self.get_raw(param.id())
    }

    /// Value stored under a numeric id
    pub fn get_raw(&self, id: u32) -> Option<&str> {
        self.values.get(&id).map(String::as_str)
    }

    /// Revision number, 0 when unset or not numeric
    pub fn revision(&self) -> u32 {
        self.get(ParamType::Revision)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Set a parameter
    pub fn insert(&mut self, id: u32, value: impl Into<String>) {
        self.values.insert(id, value.into());
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(id, value)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.values.iter().map(|(id, value)| (*id, value.as_str()))
    }

    /// Render the parameters as `param=<id>=<value>` lines
    pub fn to_lines(&self) -> String {
        self.iter()
            .map(|(id, value)| format!("{PARAM_PREFIX}{id}={value}\n"))
            .collect()
    }
}

/// Split `...param=<id>=<value>` into id and value text
fn split_param_line(line: &str) -> Option<(&str, &str)> {
    if line.trim().is_empty() {
        return None;
    }
    let start = line.find(PARAM_PREFIX)?;
    line[start + PARAM_PREFIX.len()..].split_once('=')
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_last_value_wins() {
        let table = ParamsTable::parse_str("param=5=foo\nparam=5=bar").expect("parse");
        assert_eq!(table.get_raw(5), Some("bar"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let table = ParamsTable::parse_str("param=5=a=b\n").expect("parse");
        assert_eq!(table.get_raw(5), Some("a=b"));
    }

    #[test]
    fn test_non_matching_lines_ignored() {
        let content = "Created at 2024-06-01T12:00:00\n\
                       Synthetic params.txt, not derived from launcher\n\
                       \n\
                       param=25=220\n\
                       param=7\n";
        let table = ParamsTable::parse_str(content).expect("parse");

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(ParamType::Revision), Some("220"));
        assert_eq!(table.revision(), 220);
    }

    #[test]
    fn test_empty_value() {
        let table = ParamsTable::parse_str("param=3=").expect("parse");
        assert_eq!(table.get_raw(3), Some(""));
    }

    #[test]
    fn test_malformed_id_is_fatal() {
        let err = ParamsTable::parse_str("param=1=ok\nparam=abc=foo").unwrap_err();
        assert!(matches!(err, ParamsError::InvalidId { line: 2, .. }));

        let err = ParamsTable::parse_str("param=-1=foo").unwrap_err();
        assert!(matches!(err, ParamsError::InvalidId { line: 1, .. }));
    }

    #[test]
    fn test_reparse_replaces_contents() {
        let mut table = ParamsTable::parse_str("param=1=a\nparam=2=b").expect("parse");
        table.replace_from_str("param=2=c").expect("parse");

        assert_eq!(table.get_raw(1), None);
        assert_eq!(table.get_raw(2), Some("c"));
    }

    #[test]
    fn test_failed_reparse_leaves_table_empty() {
        let mut table = ParamsTable::parse_str("param=1=a").expect("parse");
        assert!(table.replace_from_str("param=x=y").is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_unset_revision_defaults_to_zero() {
        assert_eq!(ParamsTable::new().revision(), 0);
        assert_eq!(ParamsTable::new().get(ParamType::Revision), None);
    }

    #[test]
    fn test_to_lines() {
        let mut table = ParamsTable::new();
        table.insert(ParamType::Revision.id(), "221");
        table.insert(3, "x=y");
        let rendered = table.to_lines();

        assert_eq!(rendered, "param=3=x=y\nparam=25=221\n");
        assert_eq!(ParamsTable::parse_str(&rendered).expect("parse"), table);
    }
}
