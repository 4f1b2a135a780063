use std::fmt;
use std::sync::Arc;

use crate::data::cell_value::CellValue;
use crate::data::record::GridRecord;
use crate::grid::formatter::{DisplayCell, SemanticType, ValueFormatter};

/// Custom cell renderer: receives the raw value (None when the accessor
/// does not resolve) and the whole record
pub type CellRendererFn<R> = Arc<dyn Fn(Option<&CellValue>, &R) -> DisplayCell>;

/// How a column turns a raw value into a display cell
pub enum CellRender<R> {
    /// Use the value formatter with the column's semantic type
    Formatter,
    /// Use a caller-supplied function, bypassing the formatter
    Custom(CellRendererFn<R>),
}

impl<R> Clone for CellRender<R> {
    fn clone(&self) -> Self {
        match self {
            CellRender::Formatter => CellRender::Formatter,
            CellRender::Custom(f) => CellRender::Custom(Arc::clone(f)),
        }
    }
}

impl<R> fmt::Debug for CellRender<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellRender::Formatter => write!(f, "Formatter"),
            CellRender::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Column definition: a projection of every record plus its display rule
pub struct Column<R> {
    pub accessor: String,
    pub header: String,
    pub semantic_type: SemanticType,
    pub render: CellRender<R>,
    /// Whether free-text filtering looks at this column
    pub filterable: bool,
    /// Whether sort requests on this column are honoured
    pub sortable: bool,
}

impl<R> Column<R> {
    pub fn new(accessor: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            accessor: accessor.into(),
            header: header.into(),
            semantic_type: SemanticType::Text,
            render: CellRender::Formatter,
            filterable: true,
            sortable: true,
        }
    }

    pub fn with_type(mut self, semantic_type: SemanticType) -> Self {
        self.semantic_type = semantic_type;
        self
    }

    pub fn with_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(Option<&CellValue>, &R) -> DisplayCell + 'static,
    {
        self.render = CellRender::Custom(Arc::new(renderer));
        self
    }

    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }
}

impl<R: GridRecord> Column<R> {
    /// Raw value of this column for a record
    pub fn value_of(&self, record: &R) -> Option<CellValue> {
        record.field(&self.accessor)
    }

    /// Display cell for a record
    pub fn render_cell(&self, record: &R, formatter: &ValueFormatter) -> DisplayCell {
        let value = self.value_of(record);
        match &self.render {
            CellRender::Formatter => formatter.format(value.as_ref(), self.semantic_type),
            CellRender::Custom(renderer) => renderer(value.as_ref(), record),
        }
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            accessor: self.accessor.clone(),
            header: self.header.clone(),
            semantic_type: self.semantic_type,
            render: self.render.clone(),
            filterable: self.filterable,
            sortable: self.sortable,
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("accessor", &self.accessor)
            .field("header", &self.header)
            .field("semantic_type", &self.semantic_type)
            .field("render", &self.render)
            .field("filterable", &self.filterable)
            .field("sortable", &self.sortable)
            .finish()
    }
}
