use crate::grid::{CellValue, Grid};
use crate::name::EmployeeKey;
use crate::roster::RosterLayout;

/// Add a row at the bottom of the roster for every new employee.
///
/// Only the company id and the name cells are written; data columns are left
/// for the merge. Returns the 0-based indices of the new rows.
pub fn append_employees(roster: &mut Grid, layout: &RosterLayout, to_add: &[EmployeeKey]) -> Vec<usize> {
    let mut appended = Vec::with_capacity(to_add.len());
    for key in to_add {
        let row = roster.row_count();
        roster.set(row, layout.company_id_col, layout.company_id.clone());
        roster.set(row, layout.last_name_col, CellValue::from(key.last()));
        roster.set(row, layout.first_name_col, CellValue::from(key.first()));
        tracing::info!(row = row + 1, employee = %key, "appended employee");
        appended.push(row);
    }
    appended
}
