//! Paragraph URIs.
use std::fmt;

use chrono::NaiveDate;

/// Key of a paragraph in the whole corpus: `{sitting date}/{paragraph id}`.
///
/// Not a network address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceUri(String);

impl SourceUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SourceUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How element identifiers are normalized into URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriPolicy {
    strip_prefixes: Vec<String>,
}

impl UriPolicy {
    pub fn new(strip_prefixes: Vec<String>) -> Self {
        Self { strip_prefixes }
    }

    /// Removes the first matching prefix from `eid`.
    pub fn normalize<'a>(&self, eid: &'a str) -> &'a str {
        self.strip_prefixes
            .iter()
            .find_map(|prefix| eid.strip_prefix(prefix.as_str()))
            .unwrap_or(eid)
    }

    pub fn uri(&self, date: &NaiveDate, eid: &str) -> SourceUri {
        SourceUri(format!("{}/{}", date.format("%Y-%m-%d"), self.normalize(eid)))
    }
}

impl Default for UriPolicy {
    fn default() -> Self {
        Self::new(vec!["para_".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_para_prefix() {
        let date = NaiveDate::from_ymd_opt(1923, 1, 1).unwrap();
        let policy = UriPolicy::default();

        assert_eq!(policy.uri(&date, "para_12").as_str(), "1923-01-01/12");
        assert_eq!(policy.uri(&date, "dbsect_1").as_str(), "1923-01-01/dbsect_1");
    }

    #[test]
    fn first_matching_prefix_only() {
        let policy = UriPolicy::new(vec!["para_".to_string(), "p".to_string()]);
        assert_eq!(policy.normalize("para_para_3"), "para_3");
        assert_eq!(policy.normalize("p4"), "4");
    }

    #[test]
    fn no_prefix() {
        let date = NaiveDate::from_ymd_opt(1924, 6, 10).unwrap();
        let policy = UriPolicy::new(vec![]);
        assert_eq!(policy.uri(&date, "para_1").to_string(), "1924-06-10/para_1");
    }
}
