//! Turning the rows of an exported report into per-employee records.

use crate::grid::{CellValue, Grid};
use crate::name::{EmployeeKey, looks_like_name};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub key: EmployeeKey,
    /// One value per configured data column, in configuration order.
    pub values: Vec<CellValue>,
}

/// Which cells of a source sheet hold the employee name and the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    pub sheet: usize,
    pub name_col: usize,
    pub data_cols: Vec<usize>,
    pub target_cols: Vec<usize>,
}

/// Collect a record for every name row, in row order.
pub fn extract_records(grid: &Grid, name_col: usize, data_cols: &[usize]) -> Vec<SourceRecord> {
    let mut records = Vec::new();
    for row in 0..grid.row_count() {
        let value = grid.get(row, name_col).text();
        if !looks_like_name(&value) {
            continue;
        }
        // the separator was just checked
        let Ok(key) = EmployeeKey::parse(&value) else {
            continue;
        };
        let values = data_cols
            .iter()
            .map(|&col| grid.get(row, col).clone())
            .collect();
        tracing::debug!(row, %key, "extracted employee row");
        records.push(SourceRecord { key, values });
    }
    records
}

/// Keys that occur more than once, in order of their second occurrence.
pub fn duplicate_keys(records: &[SourceRecord]) -> Vec<EmployeeKey> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for record in records {
        if !seen.insert(&record.key) && !duplicates.contains(&record.key) {
            duplicates.push(record.key.clone());
        }
    }
    duplicates
}
