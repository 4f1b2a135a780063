use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crossterm::style::Stylize;

use grid_engine::data::record::GridRecord;
use grid_engine::grid::{DataGrid, DisplayCell, StatusTag, VisibleRow};

fn tag_color(tag: StatusTag) -> Color {
    match tag {
        StatusTag::Success => Color::Green,
        StatusTag::Danger => Color::Red,
        StatusTag::Warning => Color::Yellow,
        StatusTag::Info => Color::Cyan,
    }
}

fn display_cell(cell: &DisplayCell) -> Cell {
    match cell.tag {
        Some(tag) => Cell::new(&cell.text).fg(tag_color(tag)),
        None => Cell::new(&cell.text),
    }
}

fn build_row<R>(row: &VisibleRow<'_, R>, with_marker: bool) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(row.cells.len() + 1);
    if with_marker {
        cells.push(Cell::new(if row.selected { "[x]" } else { "[ ]" }));
    }
    cells.extend(row.cells.iter().map(display_cell));
    cells
}

/// Print the current page of `grid` with a status line
pub fn display_page<R: GridRecord>(grid: &DataGrid<R>) {
    let rows = grid.visible_rows();
    if rows.is_empty() {
        println!("{}", "No matching rows.".yellow());
    } else {
        let with_marker = grid.selection().mode() != grid_engine::grid::SelectionMode::None;

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);

        let mut headers: Vec<Cell> = Vec::new();
        if with_marker {
            headers.push(Cell::new(""));
        }
        headers.extend(
            grid.header_labels()
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
        table.set_header(headers);

        for row in &rows {
            table.add_row(build_row(row, with_marker));
        }
        println!("{table}");
    }

    println!("\n{}", status_line(grid).green());
    if !grid.filter_text().is_empty() {
        println!(
            "{}",
            format!("Filter: '{}' ({} of {} rows)", grid.filter_text(), grid.filtered_count(), grid.total_count())
                .cyan()
        );
    }
    if !grid.selection().is_empty() {
        let keys: Vec<String> = grid
            .selection()
            .selected_keys()
            .iter()
            .map(|k| k.to_string())
            .collect();
        println!("{}", format!("Selected: {}", keys.join(", ")).magenta());
    }
}

/// "Page 2/3 · rows 11-20 of 23"
pub fn status_line<R: GridRecord>(grid: &DataGrid<R>) -> String {
    let info = grid.page_info();
    format!(
        "Page {}/{} · rows {}-{} of {}",
        info.current_page,
        info.page_count,
        info.first_row(),
        info.last_row(),
        info.total_rows
    )
}

/// Write every filtered and sorted row (all pages) as formatted text
pub fn export_to_csv<R: GridRecord>(grid: &DataGrid<R>, filename: &str) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(filename)?;

    let headers: Vec<&str> = grid.columns().iter().map(|c| c.header.as_str()).collect();
    wtr.write_record(&headers)?;

    let formatter = grid.formatter();
    for &index in grid.ordered_indices() {
        let Some(record) = grid.records().get(index) else {
            continue;
        };
        let row: Vec<String> = grid
            .columns()
            .iter()
            .map(|column| column.render_cell(record, formatter).text)
            .collect();
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    println!("{}", format!("Rows exported to {}", filename).green());
    Ok(())
}
