//! Finding employees that are only on one side of the roster source and the provider workbook.

mod matching;

pub use matching::{NameMatching, RosterName};

use crate::extract::SourceRecord;
use crate::grid::Grid;
use crate::name::EmployeeKey;
use crate::roster::RosterLayout;
use serde::Serialize;

/// Column headers of the provider workbook, read as if they were a name.
pub const HEADER_SENTINEL: &str = "Last Name, First Name";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileResult {
    /// In the roster source but not in the workbook, in source order.
    pub to_add: Vec<EmployeeKey>,
    /// In the workbook but not in the roster source, as written in the workbook.
    pub unmatched: Vec<String>,
}

impl ReconcileResult {
    pub fn is_clean(&self) -> bool {
        self.to_add.is_empty() && self.unmatched.is_empty()
    }
}

/// Compare the workbook rows against the roster source.
///
/// Each workbook row consumes at most one source entry with the same key, so
/// an employee listed twice in the source but once in the workbook is still
/// reported as new.
pub fn reconcile(
    roster: &Grid,
    layout: &RosterLayout,
    source: &[SourceRecord],
    matching: NameMatching,
) -> ReconcileResult {
    let mut remaining: Vec<&EmployeeKey> = source.iter().map(|record| &record.key).collect();
    let mut unmatched = Vec::new();

    // PERF: O(rows*source)
    for row in 0..roster.row_count() {
        let Some(name) = RosterName::read(roster, row, layout) else {
            continue;
        };
        let key = name.roster_key(matching);
        match remaining.iter().position(|candidate| candidate.as_str() == key) {
            Some(found) => {
                remaining.remove(found);
            }
            None => unmatched.push(name.display()),
        }
    }

    if let Some(header) = unmatched.iter().position(|name| name == HEADER_SENTINEL) {
        unmatched.remove(header);
    }

    ReconcileResult {
        to_add: remaining.into_iter().cloned().collect(),
        unmatched,
    }
}
