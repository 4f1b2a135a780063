use grid_engine::data::loaders::load_json_records;
use grid_engine::data::record::{field_key_extractor, RowKey};
use grid_engine::grid::filter::TextFilter;
use grid_engine::grid::paginator::{page_count, paginate};
use grid_engine::grid::sort::RowSorter;
use grid_engine::grid::{
    Column, DataGrid, DisplayCell, GridCallbacks, GridOptions, SelectionMode, SemanticType,
    SortDirection, StatusTag,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

fn get_test_data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // Go up one directory from grid-engine to root
    path.push("data");
    path.push(filename);
    path
}

fn numbered(n: i64) -> Arc<Vec<Value>> {
    Arc::new((1..=n).map(|i| json!({"id": i, "name": format!("Row {}", i)})).collect())
}

fn codes() -> Vec<Value> {
    vec![
        json!({"id": 1, "code": "B2", "label": "beta"}),
        json!({"id": 2, "code": "A1", "label": "alpha"}),
        json!({"id": 3, "code": "C3", "label": "a1 in label"}),
    ]
}

fn code_of(record: &Value) -> String {
    record["code"].as_str().unwrap_or_default().to_string()
}

fn visible_ids(grid: &DataGrid<Value>) -> Vec<i64> {
    grid.visible_rows()
        .iter()
        .map(|row| row.record["id"].as_i64().unwrap())
        .collect()
}

#[test]
fn scenario_a_paging_over_23_records() {
    let columns = vec![Column::new("name", "Name")];
    let mut grid = DataGrid::new(numbered(23), columns, GridOptions::default());

    assert_eq!(grid.page_count(), 3);
    assert_eq!(visible_ids(&grid), (1..=10).collect::<Vec<_>>());

    grid.on_page_change(3);
    assert_eq!(visible_ids(&grid), vec![21, 22, 23]);
}

#[test]
fn scenario_b_sort_by_code() {
    let records = Arc::new(codes());
    let columns = vec![Column::new("code", "Code")];
    let mut grid = DataGrid::new(records, columns, GridOptions::default());

    grid.on_sort_request("code");
    let ascending: Vec<String> = grid.visible_rows().iter().map(|r| code_of(r.record)).collect();
    assert_eq!(ascending, vec!["A1", "B2", "C3"]);

    grid.on_sort_request("code");
    let descending: Vec<String> = grid.visible_rows().iter().map(|r| code_of(r.record)).collect();
    assert_eq!(descending, vec!["C3", "B2", "A1"]);
}

#[test]
fn scenario_c_filter_only_filterable_columns() {
    let records = codes();
    let columns = vec![
        Column::new("code", "Code"),
        Column::new("label", "Label").with_filterable(false),
    ];
    let matched = TextFilter::filter(&records, &columns, "a1");
    assert_eq!(matched.len(), 1);
    assert_eq!(code_of(matched[0]), "A1");
}

#[test]
fn scenario_d_clear_all_visible_is_scoped() {
    let options = GridOptions {
        selection_mode: SelectionMode::Multiple,
        page_size: 1,
        ..GridOptions::default()
    };
    let mut grid = DataGrid::new(numbered(2), vec![Column::new("name", "Name")], options);

    grid.on_row_select(&RowKey::Number(1));
    grid.on_row_select(&RowKey::Number(2));
    // Page 1 shows only key 1
    grid.clear_all_visible();

    assert_eq!(grid.selection().selected_keys(), vec![RowKey::Number(2)]);
}

#[test]
fn filter_is_idempotent_and_identity_on_empty_query() {
    let records = codes();
    let columns = vec![Column::new("code", "Code"), Column::new("label", "Label")];

    let once: Vec<Value> = TextFilter::filter(&records, &columns, "a")
        .into_iter()
        .cloned()
        .collect();
    let twice: Vec<Value> = TextFilter::filter(&once, &columns, "a")
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(once, twice);

    let all: Vec<&Value> = TextFilter::filter(&records, &columns, "");
    assert_eq!(all, records.iter().collect::<Vec<_>>());
}

#[test]
fn sort_round_trip_reverses_distinct_keys() {
    let records = codes();
    let column: Column<Value> = Column::new("code", "Code");
    let asc: Vec<&Value> = RowSorter::sort(&records, &column, SortDirection::Ascending);
    let owned: Vec<Value> = asc.iter().map(|r| (*r).clone()).collect();
    let desc: Vec<&Value> = RowSorter::sort(&owned, &column, SortDirection::Descending);

    let mut reversed: Vec<String> = asc.iter().map(|r| code_of(r)).collect();
    reversed.reverse();
    assert_eq!(desc.iter().map(|r| code_of(r)).collect::<Vec<_>>(), reversed);
}

#[test]
fn pages_cover_every_row_once() {
    let items: Vec<usize> = (0..47).collect();
    for size in [1, 5, 10, 46, 47, 100] {
        let mut seen = Vec::new();
        for page in 1..=page_count(items.len(), size) {
            seen.extend_from_slice(paginate(&items, page, size).rows);
        }
        assert_eq!(seen, items, "page size {}", size);
    }
}

#[test]
fn selection_persists_across_pages_and_refetch() {
    let options = GridOptions {
        selection_mode: SelectionMode::Multiple,
        ..GridOptions::default()
    };
    let mut grid = DataGrid::new(numbered(23), vec![Column::new("name", "Name")], options);

    grid.on_row_select(&RowKey::Number(4));
    grid.on_page_change(2);
    grid.on_page_change(1);
    let selected: Vec<i64> = grid
        .visible_rows()
        .iter()
        .filter(|r| r.selected)
        .map(|r| r.record["id"].as_i64().unwrap())
        .collect();
    assert_eq!(selected, vec![4]);

    // New record instances with the same keys keep their selection
    grid.set_records(numbered(23));
    assert!(grid.is_selected(&RowKey::Number(4)));
    assert_eq!(grid.selected_records().len(), 1);
}

#[test]
fn selection_survives_being_filtered_out() {
    let options = GridOptions {
        selection_mode: SelectionMode::Multiple,
        ..GridOptions::default()
    };
    let mut grid = DataGrid::new(Arc::new(codes()), vec![Column::new("code", "Code")], options);

    grid.on_row_select(&RowKey::Number(2));
    grid.on_filter_change("C3");
    assert_eq!(grid.filtered_count(), 1);
    assert!(grid.visible_rows().iter().all(|r| !r.selected));
    assert!(grid.is_selected(&RowKey::Number(2)));
    let selected: Vec<String> = grid.selected_records().iter().map(|r| code_of(r)).collect();
    assert_eq!(selected, vec!["A1"]);

    grid.on_filter_change("");
    let row = grid
        .visible_rows()
        .into_iter()
        .find(|r| r.key == Some(RowKey::Number(2)))
        .expect("A1 visible again");
    assert!(row.selected);
}

#[test]
fn single_mode_keeps_only_latest() {
    let options = GridOptions {
        selection_mode: SelectionMode::Single,
        ..GridOptions::default()
    };
    let mut grid = DataGrid::new(numbered(5), vec![Column::new("name", "Name")], options);
    grid.on_row_select(&RowKey::Number(1));
    grid.on_row_select(&RowKey::Number(3));
    assert_eq!(grid.selection().selected_keys(), vec![RowKey::Number(3)]);
}

#[test]
fn custom_renderer_and_key_extractor() {
    let records = Arc::new(codes());
    let columns = vec![
        Column::new("code", "Code"),
        Column::new("label", "Label").with_renderer(|value, record: &Value| {
            let label = value.map(|v| v.string_form()).unwrap_or_default();
            DisplayCell::text(format!("{} ({})", label, record["code"].as_str().unwrap_or("?")))
        }),
    ];
    let options = GridOptions {
        selection_mode: SelectionMode::Multiple,
        ..GridOptions::default()
    };
    let mut grid = DataGrid::new(records, columns, options)
        .with_key_extractor(field_key_extractor("code"));

    grid.on_row_select(&RowKey::from("C3"));
    let rows = grid.visible_rows();
    assert_eq!(rows[0].cells[1].text, "beta (B2)");
    assert!(rows[2].selected);
    assert_eq!(rows[2].key, Some(RowKey::from("C3")));
}

#[test]
fn callbacks_fire_on_changes() {
    let events: Rc<RefCell<Vec<String>>> = Rc::default();
    let (pages, sorts, filters) = (Rc::clone(&events), Rc::clone(&events), Rc::clone(&events));
    let callbacks = GridCallbacks {
        on_page_change: Some(Box::new(move |page: usize| pages.borrow_mut().push(format!("page {}", page)))),
        on_sort_request: Some(Box::new(move |col: &str| sorts.borrow_mut().push(format!("sort {}", col)))),
        on_filter_text_change: Some(Box::new(move |text: &str| {
            filters.borrow_mut().push(format!("filter {}", text))
        })),
        ..GridCallbacks::default()
    };
    let mut grid = DataGrid::new(numbered(23), vec![Column::new("name", "Name")], GridOptions::default())
        .with_callbacks(callbacks);

    grid.on_page_change(2);
    grid.on_page_change(2);
    grid.on_sort_request("name");
    grid.on_filter_change("row 2");

    assert_eq!(
        *events.borrow(),
        vec!["page 2", "sort name", "filter row 2"]
    );
    assert_eq!(grid.current_page(), 1);
}

#[test]
fn missing_values_render_marker_and_keep_row() {
    let records = Arc::new(vec![json!({"id": 1, "price": 12.5}), json!({"id": 2})]);
    let columns = vec![Column::new("price", "Price").with_type(SemanticType::Currency)];
    let grid = DataGrid::new(records, columns, GridOptions::default());
    let rows = grid.visible_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].cells[0].text, "$12.50");
    assert_eq!(rows[1].cells[0].text, "N/A");
}

#[test]
fn empty_collection_has_one_page() {
    let grid = DataGrid::new(Arc::new(Vec::<Value>::new()), vec![Column::new("a", "A")], GridOptions::default());
    assert!(grid.visible_rows().is_empty());
    assert_eq!(grid.page_count(), 1);
    assert_eq!(grid.current_page(), 1);
}

#[test]
fn animals_fixture_end_to_end() {
    let loaded = load_json_records(get_test_data_path("animals.json")).expect("Failed to load animals.json");
    assert_eq!(loaded.len(), 23);

    let columns = vec![
        Column::new("tag", "Tag"),
        Column::new("breed", "Breed"),
        Column::new("weight", "Weight").with_type(SemanticType::Number),
        Column::new("status", "Status").with_type(SemanticType::Status).with_filterable(false),
        Column::new("owner_phone", "Phone").with_type(SemanticType::Phone),
    ];
    let mut grid = DataGrid::new(Arc::new(loaded.records), columns, GridOptions::default());

    grid.on_filter_change("ANGUS");
    // Angus and Brangus
    assert_eq!(grid.filtered_count(), 7);

    grid.on_sort_request("weight");
    let weights: Vec<f64> = grid
        .visible_rows()
        .iter()
        .map(|r| r.record["weight"].as_f64().unwrap())
        .collect();
    assert!(weights.windows(2).all(|w| w[0] <= w[1]));

    let row = &grid.visible_rows()[0];
    assert!(row.cells[3].tag.is_some());
    let phone = &row.cells[4].text;
    assert!(phone == "N/A" || phone.starts_with("(300) "), "phone {}", phone);

    // Missing breed still renders
    grid.on_filter_change("CO-107");
    let row = &grid.visible_rows()[0];
    assert_eq!(row.cells[1].text, "N/A");
    assert_eq!(row.cells[3].tag, Some(StatusTag::Info));
}
