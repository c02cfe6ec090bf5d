//! Presentation hierarchy converter.
//!
//! Raw presentation exports encode nesting by indentation: a row's depth is
//! the index of its first non-blank cell among the columns before
//! `Pref. Label`. Depth 0 rows are role headers; deeper rows are concepts
//! whose qualified name sits in the `Name` column. The converter rebuilds an
//! explicit parent, sibling order and role for every concept row.

use crate::header::PresentationColumns;
use crate::model::{PresentationRecord, QName};
use crate::worksheet::{self, ConversionStats};
use crate::Result;
use ahash::AHashMap;
use csv::StringRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;

/// Why a row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Empty,
    NoDepth,
    NoName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Role(String),
    Record(PresentationRecord),
    Skipped(SkipReason),
}

/// Most recent concept seen at each depth, indexed by `depth - 1`.
#[derive(Debug, Clone, Default)]
pub struct ParentChain {
    entries: Vec<QName>,
}

impl ParentChain {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parent for a row at `depth`, or `None` at depth 1 or when a level
    /// above this row was never seen.
    pub fn parent_of(&self, depth: usize) -> Option<&QName> {
        if depth > 1 && self.entries.len() >= depth - 1 {
            self.entries.get(depth - 2)
        } else {
            None
        }
    }

    /// Records `name` at `depth` and drops entries deeper than it. Skipped
    /// levels in between are filled with empty names.
    pub fn set(&mut self, depth: usize, name: QName) {
        let slot = depth - 1;
        if slot < self.entries.len() {
            self.entries[slot] = name;
            self.entries.truncate(depth);
        } else {
            self.entries.resize(slot, QName::default());
            self.entries.push(name);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Hierarchy state carried from one row to the next.
pub struct HierarchyBuilder {
    columns: PresentationColumns,
    role_name: String,
    chain: ParentChain,
    /// Sibling counters keyed by `(depth, parent)`; no parent is the empty name.
    orders: AHashMap<(usize, QName), u32>,
}

impl HierarchyBuilder {
    pub fn new(columns: PresentationColumns) -> Self {
        Self {
            columns,
            role_name: String::new(),
            chain: ParentChain::default(),
            orders: AHashMap::new(),
        }
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    pub fn push_row(&mut self, row: &StringRecord) -> RowOutcome {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            return RowOutcome::Skipped(SkipReason::Empty);
        }

        // Cells past the end of a short row read as empty.
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let depth = match (0..self.columns.pref_label).find(|&i| !cell(i).trim().is_empty()) {
            Some(depth) => depth,
            None => return RowOutcome::Skipped(SkipReason::NoDepth),
        };

        if depth == 0 {
            self.role_name = cell(0).trim().to_string();
            self.chain.clear();
            self.orders.clear();
            return RowOutcome::Role(self.role_name.clone());
        }

        let name_value = cell(self.columns.name).trim();
        if name_value.is_empty() {
            return RowOutcome::Skipped(SkipReason::NoName);
        }
        let qname = QName::parse(name_value);

        let parent = self.chain.parent_of(depth).cloned().unwrap_or_default();
        let counter = self.orders.entry((depth, parent.clone())).or_insert(0);
        *counter += 1;

        let record = PresentationRecord {
            prefix: qname.prefix.clone(),
            name: qname.local.clone(),
            depth,
            order: *counter,
            parent: parent.to_string(),
            role_name: self.role_name.clone(),
        };

        self.chain.set(depth, qname);
        RowOutcome::Record(record)
    }
}

pub struct PresentationConverter;

impl PresentationConverter {
    pub fn new() -> Self {
        Self
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

    /// Rebuilds the hierarchy in memory and returns the records.
    pub fn records<R: Read>(&self, input: R) -> Result<Vec<PresentationRecord>> {
        let mut reader = worksheet::csv_reader(input)?;
        let mut builder = HierarchyBuilder::new(PresentationColumns::from_headers(reader.headers()?)?);

        let mut records = Vec::new();
        for row in reader.records() {
            if let RowOutcome::Record(record) = builder.push_row(&row?) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Header validation happens before the output is opened, so a missing
    /// column leaves no file behind.
    fn convert_with<R, W, F>(&self, input: R, open_output: F) -> Result<ConversionStats>
    where
        R: Read,
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        let start = Instant::now();
        let mut reader = worksheet::csv_reader(input)?;
        let columns = PresentationColumns::from_headers(reader.headers()?)?;
        log::debug!(
            "presentation columns: {} indentation, name at {}",
            columns.pref_label,
            columns.name
        );

        let mut writer = worksheet::csv_writer(open_output()?);
        writer.write_record(PresentationRecord::HEADER)?;

        let mut builder = HierarchyBuilder::new(columns);
        let mut stats = ConversionStats::default();
        for (line, row) in reader.records().enumerate() {
            let row = row?;
            stats.rows_read += 1;
            match builder.push_row(&row) {
                RowOutcome::Record(record) => {
                    writer.serialize(&record)?;
                    stats.records_written += 1;
                }
                RowOutcome::Role(role) => {
                    log::debug!("role: {}", role);
                    stats.roles += 1;
                }
                RowOutcome::Skipped(reason) => {
                    log::debug!("row {} skipped: {:?}", line + 2, reason);
                    stats.rows_skipped += 1;
                }
            }
        }
        writer.flush()?;

        stats.duration_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "presentation: {} records across {} roles",
            stats.records_written,
            stats.roles
        );
        Ok(stats)
    }
}

impl Default for PresentationConverter {
    fn default() -> Self {
        Self::new()
    }
}
