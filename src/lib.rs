//! taxsheets - Taxonomy export to worksheet CSV converters
//!
//! Licensed under AGPL-3.0

pub mod concepts;
pub mod header;
pub mod model;
pub mod presentation;
pub mod worksheet;

pub use concepts::{ConceptConverter, ConceptOptions};
pub use model::{ConceptRecord, PresentationRecord, QName};
pub use presentation::PresentationConverter;
pub use worksheet::{worksheet_path, ConversionStats, WorksheetKind};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    MissingColumn(String),
}
