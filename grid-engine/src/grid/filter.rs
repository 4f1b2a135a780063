use tracing::debug;

use crate::data::record::GridRecord;
use crate::grid::column::Column;

/// Free-text filtering over the filterable columns of a record collection
pub struct TextFilter;

impl TextFilter {
    /// Keep the records where at least one filterable column contains `query`
    /// (case-insensitive). An empty query keeps everything.
    pub fn filter<'a, R: GridRecord>(
        records: &'a [R],
        columns: &[Column<R>],
        query: &str,
    ) -> Vec<&'a R> {
        if query.is_empty() {
            return records.iter().collect();
        }
        let needle = query.to_lowercase();
        records
            .iter()
            .filter(|record| Self::matches_lowered(*record, columns, &needle))
            .collect()
    }

    /// Index form of [`TextFilter::filter`]: narrows `indices` (positions in
    /// `records`) while preserving their order
    pub fn filter_indices<R: GridRecord>(
        records: &[R],
        indices: &[usize],
        columns: &[Column<R>],
        query: &str,
    ) -> Vec<usize> {
        if query.is_empty() {
            return indices.to_vec();
        }
        let needle = query.to_lowercase();
        let kept: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&idx| {
                records
                    .get(idx)
                    .is_some_and(|record| Self::matches_lowered(record, columns, &needle))
            })
            .collect();
        debug!(target: "filter", "Filter '{}' kept {} of {} rows", query, kept.len(), indices.len());
        kept
    }

    /// Whether a single record matches `query`
    pub fn matches<R: GridRecord>(record: &R, columns: &[Column<R>], query: &str) -> bool {
        query.is_empty() || Self::matches_lowered(record, columns, &query.to_lowercase())
    }

    fn matches_lowered<R: GridRecord>(record: &R, columns: &[Column<R>], needle: &str) -> bool {
        columns.iter().filter(|c| c.filterable).any(|column| {
            // Missing values match as the empty string
            let haystack = column
                .value_of(record)
                .map(|v| v.string_form())
                .unwrap_or_default();
            haystack.to_lowercase().contains(needle)
        })
    }
}
