use compact_str::CompactString;
use serde::Serialize;
use std::fmt;

// ============================================================================
// Qualified concept names
// ============================================================================

/// A concept name split into its namespace prefix and local part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: CompactString,
    pub local: CompactString,
}

impl QName {
    pub fn new(prefix: &str, local: &str) -> Self {
        Self {
            prefix: CompactString::from(prefix),
            local: CompactString::from(local),
        }
    }

    /// Splits `prefix:local` on the first colon. A bare name has an empty prefix.
    pub fn parse(value: &str) -> Self {
        match value.split_once(':') {
            Some((prefix, local)) => Self::new(prefix, local),
            None => Self::new("", value),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.local.is_empty()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            f.write_str(&self.local)
        } else {
            write!(f, "{}:{}", self.prefix, self.local)
        }
    }
}

// ============================================================================
// Worksheet rows
// ============================================================================

/// One row of the concepts worksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConceptRecord {
    pub prefix: CompactString,
    #[serde(rename = "periodType")]
    pub period_type: String,
    pub balance: String,
    #[serde(rename = "abstract")]
    pub is_abstract: String,
    pub name: CompactString,
    pub label: String,
    pub documentation: String,
}

impl ConceptRecord {
    pub const HEADER: [&'static str; 7] = [
        "prefix",
        "periodType",
        "balance",
        "abstract",
        "name",
        "label",
        "documentation",
    ];
}

/// One row of the presentation worksheet.
///
/// `parent` is already rendered as `prefix:name` (or a bare name) and is
/// empty for top-level rows under a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresentationRecord {
    pub prefix: CompactString,
    pub name: CompactString,
    pub depth: usize,
    pub order: u32,
    pub parent: String,
    pub role_name: String,
}

impl PresentationRecord {
    pub const HEADER: [&'static str; 6] = ["prefix", "name", "depth", "order", "parent", "role_name"];
}
