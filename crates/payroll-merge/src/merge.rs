//! Copying source values into the roster, one row at a time.

use crate::extract::SourceRecord;
use crate::grid::Grid;
use crate::reconcile::{NameMatching, RosterName};
use crate::roster::RosterLayout;
use serde::Serialize;
use std::collections::HashMap;

/// Records of one source together with the roster columns they are written to.
#[derive(Debug, Clone)]
pub struct ExtractedSource {
    pub name: String,
    pub records: Vec<SourceRecord>,
    /// `records[_].values[i]` goes to `target_cols[i]`.
    pub target_cols: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceMerge {
    pub source: String,
    pub rows_matched: usize,
    pub cells_written: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    /// 0-based rows added for new employees.
    pub rows_appended: Vec<usize>,
    pub sources: Vec<SourceMerge>,
}

/// Write every source's values into the rows whose employee it lists.
///
/// Rows without a record in a source keep whatever the workbook already had in
/// that source's columns. When a source lists an employee more than once the
/// first record wins.
pub fn merge_fields(
    roster: &mut Grid,
    layout: &RosterLayout,
    sources: &[ExtractedSource],
    matching: NameMatching,
) -> Vec<SourceMerge> {
    let indexes: Vec<HashMap<&str, &SourceRecord>> = sources
        .iter()
        .map(|source| {
            let mut index = HashMap::new();
            for record in &source.records {
                index.entry(record.key.as_str()).or_insert(record);
            }
            index
        })
        .collect();

    let mut summary: Vec<SourceMerge> = sources
        .iter()
        .map(|source| SourceMerge {
            source: source.name.clone(),
            ..SourceMerge::default()
        })
        .collect();

    for row in 0..roster.row_count() {
        let Some(name) = RosterName::read(roster, row, layout) else {
            continue;
        };
        let key = name.merge_key(matching);

        for ((source, index), merged) in sources.iter().zip(&indexes).zip(&mut summary) {
            let Some(record) = index.get(key.as_str()) else {
                continue;
            };
            for (value, &col) in record.values.iter().zip(&source.target_cols) {
                roster.set(row, col, value.clone());
                merged.cells_written += 1;
            }
            merged.rows_matched += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;
    use crate::name::EmployeeKey;

    fn roster() -> Grid {
        let mut grid = Grid::new();
        let rows = [
            ("First Name", "Last Name"),
            ("Jane", "Doe"),
            ("John", "Smith"),
            ("Kim", "LEE"),
        ];
        for (row, (first, last)) in rows.into_iter().enumerate() {
            grid.set(row, 2, first.into());
            grid.set(row, 4, last.into());
        }
        // a value typed in by hand earlier
        grid.set(2, 6, 11.0.into());
        grid
    }

    fn record(name: &str, values: &[f64]) -> SourceRecord {
        SourceRecord {
            key: EmployeeKey::parse(name).unwrap(),
            values: values.iter().map(|&value| value.into()).collect(),
        }
    }

    fn contributions() -> ExtractedSource {
        ExtractedSource {
            name: "contributions".to_owned(),
            records: vec![record("Doe, Jane", &[50.0, 600.0]), record("Lee, Kim", &[10.0, 20.0])],
            target_cols: vec![6, 7],
        }
    }

    #[test]
    fn writes_values_positionally() {
        let mut grid = roster();
        let summary = merge_fields(
            &mut grid,
            &RosterLayout::default(),
            &[contributions()],
            NameMatching::Normalized,
        );

        assert_eq!(grid.get(1, 6), &CellValue::Number(50.0));
        assert_eq!(grid.get(1, 7), &CellValue::Number(600.0));
        assert_eq!(grid.get(3, 6), &CellValue::Number(10.0));
        assert_eq!(grid.get(3, 7), &CellValue::Number(20.0));
        assert_eq!(
            summary,
            vec![SourceMerge {
                source: "contributions".to_owned(),
                rows_matched: 2,
                cells_written: 4,
            }]
        );
    }

    #[test]
    fn unmatched_rows_are_untouched() {
        let mut grid = roster();
        merge_fields(
            &mut grid,
            &RosterLayout::default(),
            &[contributions()],
            NameMatching::Normalized,
        );
        assert_eq!(grid.get(2, 6), &CellValue::Number(11.0));
        assert_eq!(grid.get(2, 7), &CellValue::Empty);
    }

    #[test]
    fn merge_is_idempotent() {
        let sources = [contributions()];
        let mut once = roster();
        merge_fields(&mut once, &RosterLayout::default(), &sources, NameMatching::Normalized);
        let mut twice = once.clone();
        merge_fields(&mut twice, &RosterLayout::default(), &sources, NameMatching::Normalized);
        assert_eq!(once, twice);
    }

    #[test]
    fn first_duplicate_wins() {
        let mut source = contributions();
        source.records.push(record("Doe, Jane Q", &[99.0, 99.0]));
        let mut grid = roster();
        merge_fields(&mut grid, &RosterLayout::default(), &[source], NameMatching::Normalized);
        assert_eq!(grid.get(1, 6), &CellValue::Number(50.0));
    }

    #[test]
    fn later_sources_overwrite_shared_columns() {
        let mut ytd = contributions();
        ytd.name = "ytd".to_owned();
        ytd.records = vec![record("Doe, Jane", &[1.0])];
        ytd.target_cols = vec![7];

        let mut grid = roster();
        let summary = merge_fields(
            &mut grid,
            &RosterLayout::default(),
            &[contributions(), ytd],
            NameMatching::Normalized,
        );
        assert_eq!(grid.get(1, 6), &CellValue::Number(50.0));
        assert_eq!(grid.get(1, 7), &CellValue::Number(1.0));
        assert_eq!(summary[1].rows_matched, 1);
    }

    #[test]
    fn exact_matching_uppercases_roster_names() {
        let mut grid = roster();
        let summary = merge_fields(
            &mut grid,
            &RosterLayout::default(),
            &[contributions()],
            NameMatching::Exact,
        );
        assert_eq!(summary[0].rows_matched, 2);

        grid.set(1, 2, "Jane Q".into());
        grid.set(1, 6, CellValue::Empty);
        merge_fields(&mut grid, &RosterLayout::default(), &[contributions()], NameMatching::Exact);
        assert_eq!(grid.get(1, 6), &CellValue::Empty);
    }
}
