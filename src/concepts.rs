//! Concept list converter.
//!
//! Reads a raw concept export whose column names vary between releases,
//! keeps the rows of one taxonomy prefix and writes them with a fixed schema.

use crate::header::{ConceptColumns, ConceptField};
use crate::model::ConceptRecord;
use crate::worksheet::{self, ConversionStats};
use crate::Result;
use compact_str::CompactString;
use csv::StringRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;

pub const US_GAAP_PREFIX: &str = "us-gaap";
const US_GAAP_NAMESPACE_MARKER: &str = "fasb.org/us-gaap";

#[derive(Debug, Clone)]
pub struct ConceptOptions {
    /// Only rows resolving to this prefix are written.
    pub target_prefix: CompactString,
}

impl Default for ConceptOptions {
    fn default() -> Self {
        Self {
            target_prefix: CompactString::new(US_GAAP_PREFIX),
        }
    }
}

pub struct ConceptConverter {
    options: ConceptOptions,
}

impl ConceptConverter {
    pub fn new() -> Self {
        Self::with_options(ConceptOptions::default())
    }

    pub fn with_options(options: ConceptOptions) -> Self {
        Self { options }
    }

    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        raw_path: P,
        out_path: Q,
    ) -> Result<ConversionStats> {
        let input = File::open(raw_path.as_ref())?;
        self.convert_with(input, || worksheet::create_output(out_path.as_ref()))
    }

    pub fn convert<R: Read, W: Write>(&self, input: R, output: W) -> Result<ConversionStats> {
        self.convert_with(input, move || Ok(output))
    }

    /// Converts in memory and returns the kept records.
    pub fn records<R: Read>(&self, input: R) -> Result<Vec<ConceptRecord>> {
        let mut reader = worksheet::csv_reader(input)?;
        let columns = ConceptColumns::from_headers(reader.headers()?);

        let mut records = Vec::new();
        for row in reader.records() {
            if let Some(record) = self.convert_row(&columns, &row?) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// The output is only opened once the header has been read.
    fn convert_with<R, W, F>(&self, input: R, open_output: F) -> Result<ConversionStats>
    where
        R: Read,
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        let start = Instant::now();
        let mut reader = worksheet::csv_reader(input)?;
        let columns = ConceptColumns::from_headers(reader.headers()?);
        for (field, idx) in columns.resolved() {
            log::debug!("concept column {} -> {}", field.key(), idx);
        }

        let mut writer = worksheet::csv_writer(open_output()?);
        writer.write_record(ConceptRecord::HEADER)?;

        let mut stats = ConversionStats::default();
        for row in reader.records() {
            let row = row?;
            stats.rows_read += 1;
            match self.convert_row(&columns, &row) {
                Some(record) => {
                    writer.serialize(&record)?;
                    stats.records_written += 1;
                }
                None => stats.rows_skipped += 1,
            }
        }
        writer.flush()?;

        stats.duration_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "concepts: kept {} of {} rows with prefix {}",
            stats.records_written,
            stats.rows_read,
            self.options.target_prefix
        );
        Ok(stats)
    }

    fn convert_row(&self, columns: &ConceptColumns, row: &StringRecord) -> Option<ConceptRecord> {
        let prefix = derive_prefix(columns, row);
        if self.options.target_prefix != prefix {
            return None;
        }

        Some(ConceptRecord {
            prefix: CompactString::from(prefix),
            period_type: columns.get(row, ConceptField::PeriodType).to_string(),
            balance: columns.get(row, ConceptField::Balance).to_string(),
            is_abstract: columns.get(row, ConceptField::Abstract).to_string(),
            name: CompactString::from(derive_local_name(columns, row)),
            label: columns.get(row, ConceptField::Label).to_string(),
            documentation: columns.get(row, ConceptField::Documentation).to_string(),
        })
    }
}

impl Default for ConceptConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// First match wins: FASB namespace, explicit prefix, then the prefix of a
/// qualified `qname` or `name`.
pub fn derive_prefix<'r>(columns: &ConceptColumns, row: &'r StringRecord) -> &'r str {
    if columns
        .get(row, ConceptField::Namespace)
        .contains(US_GAAP_NAMESPACE_MARKER)
    {
        return US_GAAP_PREFIX;
    }

    let prefix = columns.get(row, ConceptField::Prefix);
    if !prefix.is_empty() {
        return prefix;
    }

    [ConceptField::QName, ConceptField::Name]
        .into_iter()
        .find_map(|field| {
            columns
                .get(row, field)
                .split_once(':')
                .map(|(prefix, _)| prefix)
        })
        .unwrap_or("")
}

/// First match wins: `name` (unqualified), `localname`, then the local part of `qname`.
pub fn derive_local_name<'r>(columns: &ConceptColumns, row: &'r StringRecord) -> &'r str {
    let name = columns.get(row, ConceptField::Name);
    if !name.is_empty() {
        return name.split_once(':').map_or(name, |(_, local)| local);
    }

    let local_name = columns.get(row, ConceptField::LocalName);
    if !local_name.is_empty() {
        return local_name;
    }

    columns
        .get(row, ConceptField::QName)
        .split_once(':')
        .map_or("", |(_, local)| local)
}
