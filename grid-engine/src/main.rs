use anyhow::{anyhow, bail, Context, Result};
use crossterm::style::Stylize;
use grid_engine::config::Config;
use grid_engine::data::loaders::{load_records, LoadedRecords};
use grid_engine::data::cell_value::CellValue;
use grid_engine::data::record::{GridRecord, RowKey};
use grid_engine::data::type_inference::TypeInference;
use grid_engine::grid::{Column, DataGrid, SelectionMode, SortDirection, SortState, ValueFormatter};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

mod table_display;

use table_display::{display_page, export_to_csv};

/// Parsed command-line arguments
#[derive(Debug, Default)]
struct CliArgs {
    file: Option<String>,
    config: Option<String>,
    filter: Option<String>,
    sort: Option<String>,
    page: Option<usize>,
    page_size: Option<usize>,
    select: Vec<String>,
    export: Option<String>,
    generate_config: bool,
    help: bool,
}

impl CliArgs {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("Missing value for {}", name))
            };
            match arg.as_str() {
                "--help" | "-h" => parsed.help = true,
                "--generate-config" => parsed.generate_config = true,
                "--config" => parsed.config = Some(value("--config")?),
                "--filter" => parsed.filter = Some(value("--filter")?),
                "--sort" => parsed.sort = Some(value("--sort")?),
                "--export" => parsed.export = Some(value("--export")?),
                "--select" => parsed.select.push(value("--select")?),
                "--page" => {
                    let raw = value("--page")?;
                    parsed.page = Some(raw.parse().with_context(|| format!("Invalid page '{}'", raw))?);
                }
                "--page-size" => {
                    let raw = value("--page-size")?;
                    parsed.page_size =
                        Some(raw.parse().with_context(|| format!("Invalid page size '{}'", raw))?);
                }
                other if other.starts_with("--") => bail!("Unknown option {}", other),
                _ => {
                    if parsed.file.is_some() {
                        bail!("Only one data file can be given");
                    }
                    parsed.file = Some(arg);
                }
            }
        }
        Ok(parsed)
    }
}

fn print_help() {
    println!("{}", "Grid Engine - filter, sort and page tabular data".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  grid-engine [OPTIONS] FILE.json|FILE.csv");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}      - Config file (default: ~/.config/grid-engine/config.toml)", "--config PATH".green());
    println!("  {}      - Free-text filter across filterable columns", "--filter TEXT".green());
    println!("  {} - Sort by a column, ascending unless ':desc'", "--sort COL[:desc]".green());
    println!("  {}           - Page to show (1-based)", "--page N".green());
    println!("  {}      - Rows per page (0 shows everything)", "--page-size N".green());
    println!("  {}       - Select a row by key (repeatable)", "--select KEY".green());
    println!("  {}     - Write all filtered rows to CSV", "--export PATH".green());
    println!("  {}  - Write a commented default config", "--generate-config".green());
    println!("  {}             - Show this help", "--help".green());
    println!();
    println!("{}", "Examples:".yellow());
    println!("  grid-engine data/animals.json --filter angus --sort weight:desc");
    println!("  grid-engine data/animals.csv --page 2 --select 3 --select 12");
    println!();
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating config directory {}", parent.display()))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file {}", path.display()))?;
    println!("Configuration file created at: {:?}", path);
    println!("Edit this file to customize the grid.");
    Ok(())
}

/// Columns from the config, or one per field with an inferred type
fn build_columns(config: &Config, loaded: &LoadedRecords) -> Vec<Column<Value>> {
    if !config.columns.is_empty() {
        return config.columns();
    }

    loaded
        .fields
        .iter()
        .map(|field| {
            let samples: Vec<CellValue> = loaded
                .records
                .iter()
                .take(100)
                .filter_map(|r| r.field(field))
                .collect();
            let semantic_type = TypeInference::semantic_type_for_cells(samples.iter());
            debug!(target: "grid", "Column '{}' typed as {:?}", field, semantic_type);
            Column::new(field.clone(), field.clone()).with_type(semantic_type)
        })
        .collect()
}

fn parse_sort(raw: &str) -> SortState {
    match raw.rsplit_once(':') {
        Some((column, direction)) => SortState::new(column, SortDirection::from(direction)),
        None => SortState::new(raw, SortDirection::Ascending),
    }
}

fn run(args: CliArgs) -> Result<()> {
    if args.help {
        print_help();
        return Ok(());
    }
    if args.generate_config {
        return generate_config();
    }

    let Some(file) = args.file.as_deref() else {
        print_help();
        bail!("No data file given");
    };

    let config = match args.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let loaded = load_records(file)?;
    let columns = build_columns(&config, &loaded);

    let mut options = config.grid_options();
    if let Some(size) = args.page_size {
        options.page_size = size;
    }
    if !args.select.is_empty() && options.selection_mode == SelectionMode::None {
        options.selection_mode = SelectionMode::Multiple;
    }

    let records = Arc::new(loaded.records);
    let mut grid = DataGrid::new(records, columns, options)
        .with_formatter(ValueFormatter::new(config.format_options()));

    if let Some(filter) = args.filter.as_deref() {
        grid.on_filter_change(filter);
    }
    if let Some(sort) = args.sort.as_deref() {
        let state = parse_sort(sort);
        // Header clicks cycle ascending -> descending
        grid.on_sort_request(&state.column);
        if grid.sort_state().map(|s| s.direction) != Some(state.direction) {
            grid.on_sort_request(&state.column);
        }
    }
    for key in &args.select {
        grid.on_row_select(&RowKey::parse(key));
    }
    if let Some(page) = args.page {
        grid.on_page_change(page);
    }

    display_page(&grid);

    if let Some(path) = args.export.as_deref() {
        export_to_csv(&grid, path)?;
    }
    Ok(())
}

fn main() {
    grid_engine::utils::logging::init_tracing("warn");

    let result = CliArgs::parse(std::env::args().skip(1)).and_then(run);
    if let Err(e) = result {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}
