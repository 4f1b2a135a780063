//! Client-side tabular data engine
//!
//! Takes an in-memory record collection plus column definitions and
//! produces the rows to show: filtered by free text, sorted by one column,
//! sliced into pages, with key-based row selection and per-type cell
//! formatting. Rendering is left to the caller.

pub mod config;
pub mod data;
pub mod grid;
pub mod utils;

pub use data::{CellValue, GridRecord, RowKey};
pub use grid::{Column, DataGrid, GridCallbacks, GridOptions, SelectionMode, SemanticType};
