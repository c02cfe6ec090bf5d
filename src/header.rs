// Header resolution for raw taxonomy exports
use crate::{Error, Result};
use csv::StringRecord;

/// Lowercases a header and drops everything that is not an ASCII letter, so
/// `Period Type`, `period_type` and `periodType` all resolve to `periodtype`.
pub fn normalize_header(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConceptField {
    Namespace,
    Prefix,
    QName,
    Name,
    PeriodType,
    Balance,
    Abstract,
    Label,
    Documentation,
    LocalName,
}

impl ConceptField {
    pub const ALL: [ConceptField; 10] = [
        ConceptField::Namespace,
        ConceptField::Prefix,
        ConceptField::QName,
        ConceptField::Name,
        ConceptField::PeriodType,
        ConceptField::Balance,
        ConceptField::Abstract,
        ConceptField::Label,
        ConceptField::Documentation,
        ConceptField::LocalName,
    ];

    /// Normalized header that selects this field.
    pub fn key(self) -> &'static str {
        match self {
            ConceptField::Namespace => "namespace",
            ConceptField::Prefix => "prefix",
            ConceptField::QName => "qname",
            ConceptField::Name => "name",
            ConceptField::PeriodType => "periodtype",
            ConceptField::Balance => "balance",
            ConceptField::Abstract => "abstract",
            ConceptField::Label => "label",
            ConceptField::Documentation => "documentation",
            ConceptField::LocalName => "localname",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// Column index of every semantic concept field, resolved once per file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptColumns {
    index: [Option<usize>; 10],
}

impl ConceptColumns {
    /// Later headers win when two of them normalize to the same key.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut columns = Self::default();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(field) = ConceptField::from_key(&normalize_header(header)) {
                columns.index[field.slot()] = Some(idx);
            }
        }
        columns
    }

    #[inline]
    pub fn column(&self, field: ConceptField) -> Option<usize> {
        self.index[field.slot()]
    }

    /// Trimmed cell for `field`; empty when the column is unknown or the row is short.
    #[inline]
    pub fn get<'r>(&self, row: &'r StringRecord, field: ConceptField) -> &'r str {
        self.column(field)
            .and_then(|idx| row.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }

    pub fn resolved(&self) -> impl Iterator<Item = (ConceptField, usize)> + '_ {
        ConceptField::ALL
            .into_iter()
            .filter_map(|field| self.column(field).map(|idx| (field, idx)))
    }
}

pub const PREF_LABEL_COLUMN: &str = "Pref. Label";
pub const NAME_COLUMN: &str = "Name";

/// Fixed columns of a raw presentation export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationColumns {
    /// Every column before this one is an indentation column.
    pub pref_label: usize,
    pub name: usize,
}

impl PresentationColumns {
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |wanted: &str| headers.iter().position(|h| h == wanted);

        let pref_label = position(PREF_LABEL_COLUMN).ok_or_else(|| {
            Error::MissingColumn(format!("Missing '{}' column in raw CSV.", PREF_LABEL_COLUMN))
        })?;
        let name = position(NAME_COLUMN).ok_or_else(|| {
            Error::MissingColumn(format!(
                "Missing '{}' column (use --relationshipCols=Name,LocalName).",
                NAME_COLUMN
            ))
        })?;

        Ok(Self { pref_label, name })
    }
}
