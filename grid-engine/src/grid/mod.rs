//! Grid engine
//!
//! Filtering, sorting, pagination, selection and cell formatting over a
//! caller-owned record collection, tied together by [`DataGrid`].

pub mod column;
pub mod data_grid;
pub mod filter;
pub mod formatter;
pub mod paginator;
pub mod selection;
pub mod sort;

pub use column::{CellRender, Column};
pub use data_grid::{DataGrid, GridCallbacks, GridOptions, VisibleRow};
pub use filter::TextFilter;
pub use formatter::{DisplayCell, FormatOptions, SemanticType, StatusTag, ValueFormatter};
pub use paginator::{paginate, Page, PageInfo};
pub use selection::{SelectionController, SelectionMode};
pub use sort::{RowSorter, SortDirection, SortState};
