use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::record::GridRecord;
use crate::data::value_compare::compare_optional_cell_values;
use crate::grid::column::Column;

/// Sort direction for the active column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

impl From<&str> for SortDirection {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "desc" | "descending" => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

/// The single active sort: column accessor plus direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Next sort state after a header click on `column`:
    /// the same column flips direction, a different column starts ascending
    pub fn toggle(current: Option<&SortState>, column: &str) -> SortState {
        match current {
            Some(state) if state.column == column => {
                SortState::new(column, state.direction.reversed())
            }
            _ => SortState::new(column, SortDirection::Ascending),
        }
    }
}

/// Stable single-column ordering of records
pub struct RowSorter;

impl RowSorter {
    /// Ordered copy of `records`; the input is not touched
    pub fn sort<'a, R: GridRecord>(
        records: &'a [R],
        column: &Column<R>,
        direction: SortDirection,
    ) -> Vec<&'a R> {
        let all: Vec<usize> = (0..records.len()).collect();
        Self::sort_indices(records, &all, column, direction)
            .into_iter()
            .map(|idx| &records[idx])
            .collect()
    }

    /// Order `indices` (positions in `records`) by the column's values.
    /// Equal keys keep their relative input order in both directions.
    pub fn sort_indices<R: GridRecord>(
        records: &[R],
        indices: &[usize],
        column: &Column<R>,
        direction: SortDirection,
    ) -> Vec<usize> {
        let mut keyed: Vec<(usize, _)> = indices
            .iter()
            .map(|&idx| (idx, records.get(idx).and_then(|r| column.value_of(r))))
            .collect();

        // slice::sort_by is stable
        keyed.sort_by(|(_, a), (_, b)| {
            let cmp = compare_optional_cell_values(a.as_ref(), b.as_ref());
            match direction {
                SortDirection::Ascending => cmp,
                SortDirection::Descending => cmp.reverse(),
            }
        });

        keyed.into_iter().map(|(idx, _)| idx).collect()
    }

    /// Apply an optional sort state; no state (or an unknown column) keeps
    /// insertion order
    pub fn apply<R: GridRecord>(
        records: &[R],
        indices: &[usize],
        columns: &[Column<R>],
        sort: Option<&SortState>,
    ) -> Vec<usize> {
        let Some(state) = sort else {
            return indices.to_vec();
        };
        match columns.iter().find(|c| c.accessor == state.column) {
            Some(column) => {
                debug!(target: "sort", "Sorting {} rows by '{}' {:?}", indices.len(), state.column, state.direction);
                Self::sort_indices(records, indices, column, state.direction)
            }
            None => indices.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_toggle_cycle() {
        let first = SortState::toggle(None, "code");
        assert_eq!(first, SortState::new("code", SortDirection::Ascending));
        let second = SortState::toggle(Some(&first), "code");
        assert_eq!(second.direction, SortDirection::Descending);
        let third = SortState::toggle(Some(&second), "code");
        assert_eq!(third.direction, SortDirection::Ascending);
        let other = SortState::toggle(Some(&second), "name");
        assert_eq!(other, SortState::new("name", SortDirection::Ascending));
    }

    #[test]
    fn test_numeric_sort() {
        let records = vec![json!({"w": 100}), json!({"w": 9}), json!({"w": 25.5})];
        let column: Column<Value> = Column::new("w", "Weight");
        let sorted = RowSorter::sort(&records, &column, SortDirection::Ascending);
        let weights: Vec<f64> = sorted.iter().map(|r| r["w"].as_f64().unwrap()).collect();
        assert_eq!(weights, vec![9.0, 25.5, 100.0]);
    }

    #[test]
    fn test_stable_in_both_directions() {
        let records = vec![
            json!({"id": 1, "lot": "B"}),
            json!({"id": 2, "lot": "A"}),
            json!({"id": 3, "lot": "B"}),
            json!({"id": 4, "lot": "A"}),
        ];
        let column: Column<Value> = Column::new("lot", "Lot");
        let ids = |sorted: Vec<&Value>| -> Vec<i64> {
            sorted.iter().map(|r| r["id"].as_i64().unwrap()).collect()
        };
        assert_eq!(
            ids(RowSorter::sort(&records, &column, SortDirection::Ascending)),
            vec![2, 4, 1, 3]
        );
        assert_eq!(
            ids(RowSorter::sort(&records, &column, SortDirection::Descending)),
            vec![1, 3, 2, 4]
        );
    }

    #[test]
    fn test_apply_without_state_is_identity() {
        let records = vec![json!({"a": 2}), json!({"a": 1})];
        let columns: Vec<Column<Value>> = vec![Column::new("a", "A")];
        assert_eq!(RowSorter::apply(&records, &[0, 1], &columns, None), vec![0, 1]);
        let unknown = SortState::new("b", SortDirection::Ascending);
        assert_eq!(
            RowSorter::apply(&records, &[0, 1], &columns, Some(&unknown)),
            vec![0, 1]
        );
    }

    #[test]
    fn test_input_not_mutated() {
        let records = vec![json!({"a": 2}), json!({"a": 1})];
        let column: Column<Value> = Column::new("a", "A");
        let _ = RowSorter::sort(&records, &column, SortDirection::Ascending);
        assert_eq!(records[0]["a"], 2);
    }
}
