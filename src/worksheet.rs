// Worksheet files: naming, CSV reader/writer setup, run statistics
use crate::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorksheetKind {
    Concepts,
    Presentation,
}

impl WorksheetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WorksheetKind::Concepts => "concepts",
            WorksheetKind::Presentation => "presentation",
        }
    }

    /// e.g. `2024_GAAP_Taxonomy.worksheets.concepts.csv`
    pub fn file_name(self, year: i32) -> String {
        format!("{}_GAAP_Taxonomy.worksheets.{}.csv", year, self.as_str())
    }
}

pub fn worksheet_path<P: AsRef<Path>>(out_dir: P, kind: WorksheetKind, year: i32) -> PathBuf {
    out_dir.as_ref().join(kind.file_name(year))
}

/// Creates (or truncates) `path`, creating missing parent directories first.
pub fn create_output<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// Wraps `input` in a buffered reader positioned after any UTF-8 BOM.
pub(crate) fn skip_bom<R: Read>(input: R) -> Result<BufReader<R>> {
    let mut reader = BufReader::new(input);
    if reader.fill_buf()?.starts_with(UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
    }
    Ok(reader)
}

/// Raw exports are ragged: role header rows carry a single cell.
pub(crate) fn csv_reader<R: Read>(input: R) -> Result<csv::Reader<BufReader<R>>> {
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(skip_bom(input)?))
}

pub(crate) fn csv_writer<W: Write>(output: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(output)
}

/// Counters reported after a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub rows_read: usize,
    pub records_written: usize,
    pub rows_skipped: usize,
    /// Role header rows seen; always zero for concepts.
    pub roles: usize,
    pub duration_ms: u64,
}
