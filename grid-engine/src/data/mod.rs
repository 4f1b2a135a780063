//! Data layer
//!
//! Raw cell values, the record access trait, value comparison and the
//! loaders that read records from disk.

pub mod cell_value;
pub mod loaders;
pub mod record;
pub mod type_inference;
pub mod value_compare;

pub use cell_value::CellValue;
pub use record::{GridRecord, KeyExtractor, RowKey};
