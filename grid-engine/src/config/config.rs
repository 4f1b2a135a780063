use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::grid::column::Column;
use crate::grid::data_grid::{GridOptions, DEFAULT_PAGE_SIZE};
use crate::grid::formatter::{FormatOptions, SemanticType, MAX_CURRENCY_DECIMALS, NOT_AVAILABLE};
use crate::grid::selection::SelectionMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub format: FormatConfig,

    /// Column definitions; empty means "derive from the data"
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Rows per page; 0 disables pagination, negative values are treated as 0
    pub page_size: i64,

    /// "none", "single" or "multiple"
    pub selection_mode: String,

    pub show_pagination: bool,

    pub show_filter_bar: bool,

    pub row_clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Marker shown for missing or unformattable values
    pub not_available: String,

    pub currency_symbol: String,

    pub currency_decimals: usize,
}

/// One `[[columns]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub accessor: String,

    /// Defaults to the accessor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Semantic type name, e.g. "currency" or "status"
    #[serde(rename = "type", default = "default_column_type")]
    pub column_type: String,

    #[serde(default = "default_true")]
    pub filterable: bool,

    #[serde(default = "default_true")]
    pub sortable: bool,
}

fn default_column_type() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            format: FormatConfig::default(),
            columns: Vec::new(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE as i64,
            selection_mode: "none".to_string(),
            show_pagination: true,
            show_filter_bar: true,
            row_clickable: false,
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            not_available: NOT_AVAILABLE.to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

impl ColumnSpec {
    pub fn new(accessor: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            accessor: accessor.into(),
            header: None,
            column_type: column_type.into(),
            filterable: true,
            sortable: true,
        }
    }

    pub fn header(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.accessor)
    }

    pub fn semantic_type(&self) -> SemanticType {
        SemanticType::from(self.column_type.as_str())
    }

    pub fn to_column<R>(&self) -> Column<R> {
        Column::new(self.accessor.clone(), self.header())
            .with_type(self.semantic_type())
            .with_filterable(self.filterable)
            .with_sortable(self.sortable)
    }
}

impl GridConfig {
    /// Sanitised grid options
    pub fn to_options(&self) -> GridOptions {
        let page_size = if self.page_size < 0 {
            warn!(target: "config", "Negative page_size {} treated as 0 (no pagination)", self.page_size);
            0
        } else {
            usize::try_from(self.page_size).unwrap_or(usize::MAX)
        };

        GridOptions {
            page_size,
            selection_mode: SelectionMode::from(self.selection_mode.as_str()),
            show_pagination: self.show_pagination,
            show_filter_bar: self.show_filter_bar,
            row_clickable: self.row_clickable,
        }
    }
}

impl FormatConfig {
    pub fn to_options(&self) -> FormatOptions {
        let currency_decimals = if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            warn!(
                target: "config",
                "currency_decimals {} too large, using {}",
                self.currency_decimals,
                MAX_CURRENCY_DECIMALS
            );
            MAX_CURRENCY_DECIMALS
        } else {
            self.currency_decimals
        };

        FormatOptions {
            not_available: self.not_available.clone(),
            currency_symbol: self.currency_symbol.clone(),
            currency_decimals,
        }
    }
}

impl Config {
    pub fn grid_options(&self) -> GridOptions {
        self.grid.to_options()
    }

    pub fn format_options(&self) -> FormatOptions {
        self.format.to_options()
    }

    /// Columns declared in the config file
    pub fn columns<R>(&self) -> Vec<Column<R>> {
        self.columns.iter().map(ColumnSpec::to_column).collect()
    }

    /// Load config from the default location, writing a default file if
    /// none exists yet
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(target: "config", "Loading config from {}", path.display());
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::get_config_path()?)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        debug!(target: "config", "Saved config to {}", path.display());

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("grid-engine").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Grid Engine Configuration File
# Location: ~/.config/grid-engine/config.toml (Linux/macOS)
#           %APPDATA%\grid-engine\config.toml (Windows)

[grid]
# Rows per page. 0 shows every row on a single page.
page_size = 10

# Row selection: "none", "single" or "multiple"
selection_mode = "none"

# Show the pagination footer (when false, every row is shown)
show_pagination = true

# Enable free-text filtering across filterable columns
show_filter_bar = true

# Deliver row clicks to the application
row_clickable = false

[format]
# Marker for missing or unformattable values
not_available = "N/A"

# Currency formatting
currency_symbol = "$"
currency_decimals = 2

# Column definitions. Leave out to derive columns from the data.
# type: text, number, date, datetime, currency, percentage, status,
#       uppercase, lowercase, phone
#
# [[columns]]
# accessor = "name"
# header = "Name"
# type = "text"
#
# [[columns]]
# accessor = "price"
# header = "Price"
# type = "currency"
# filterable = false
"#
        .to_string()
    }
}
