use criterion::{black_box, criterion_group, criterion_main, Criterion};
use grid_engine::grid::{Column, DataGrid, GridOptions, SemanticType};
use serde_json::{json, Value};
use std::sync::Arc;

fn create_test_data(rows: usize) -> Arc<Vec<Value>> {
    let breeds = [
        "Angus", "Brahman", "Holstein", "Hereford", "Jersey", "Brangus", "Simmental", "Charolais",
    ];
    let statuses = ["active", "inactive", "pending", "completed"];

    Arc::new(
        (0..rows)
            .map(|i| {
                json!({
                    "id": i,
                    "tag": format!("CO-{:06}", i),
                    "breed": breeds[i % breeds.len()],
                    "weight": 250.0 + (i * 37 % 400) as f64,
                    "status": statuses[i % statuses.len()],
                })
            })
            .collect(),
    )
}

fn columns() -> Vec<Column<Value>> {
    vec![
        Column::new("tag", "Tag"),
        Column::new("breed", "Breed"),
        Column::new("weight", "Weight").with_type(SemanticType::Number),
        Column::new("status", "Status").with_type(SemanticType::Status),
    ]
}

fn benchmark_pipeline(c: &mut Criterion) {
    let data_10k = create_test_data(10_000);
    let data_50k = create_test_data(50_000);

    let mut group = c.benchmark_group("filter_sort_page");

    for (name, data) in [("10k_rows", &data_10k), ("50k_rows", &data_50k)] {
        group.bench_function(name, |b| {
            let mut grid = DataGrid::new(Arc::clone(data), columns(), GridOptions::default());
            let mut toggle = false;
            b.iter(|| {
                // Alternate queries so each iteration recomputes the pipeline
                toggle = !toggle;
                grid.on_filter_change(black_box(if toggle { "angus" } else { "her" }));
                grid.on_sort_request("weight");
                black_box(grid.visible_rows().len())
            });
        });
    }

    group.finish();
}

fn benchmark_render_page(c: &mut Criterion) {
    let data = create_test_data(50_000);
    let mut grid = DataGrid::new(data, columns(), GridOptions::default());
    grid.on_sort_request("tag");

    c.bench_function("render_visible_page_50k", |b| {
        b.iter(|| black_box(grid.visible_rows()));
    });
}

criterion_group!(benches, benchmark_pipeline, benchmark_render_page);
criterion_main!(benches);
