use crate::grid::Grid;
use crate::name::EmployeeKey;
use crate::roster::RosterLayout;
use serde::{Deserialize, Serialize};

/// How employee names read from the roster are compared with source keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameMatching {
    /// Roster names go through the same normalization as source names.
    #[default]
    Normalized,
    /// `Last, First` exactly as typed in the roster. Membership checks are
    /// case-sensitive while the merge compares uppercased names, so casing or
    /// middle-name differences show up as new and missing employees.
    Exact,
}

/// An employee name read from one roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterName {
    pub last: String,
    pub first: String,
}

impl RosterName {
    /// Read the name cells of `row`, or `None` when both are blank.
    pub fn read(grid: &Grid, row: usize, layout: &RosterLayout) -> Option<Self> {
        let last = grid.get(row, layout.last_name_col).text().trim().to_owned();
        let first = grid.get(row, layout.first_name_col).text().trim().to_owned();
        if last.is_empty() && first.is_empty() {
            return None;
        }
        Some(RosterName { last, first })
    }

    /// `Last, First` as written in the roster.
    pub fn display(&self) -> String {
        format!("{}, {}", self.last, self.first)
    }

    /// Key compared against the roster source when diffing.
    pub fn roster_key(&self, matching: NameMatching) -> String {
        match matching {
            NameMatching::Normalized => self.normalized(),
            NameMatching::Exact => self.display(),
        }
    }

    /// Key compared against source records when merging.
    pub fn merge_key(&self, matching: NameMatching) -> String {
        match matching {
            NameMatching::Normalized => self.normalized(),
            NameMatching::Exact => self.display().to_uppercase(),
        }
    }

    fn normalized(&self) -> String {
        EmployeeKey::from_parts(&self.last, &self.first).to_string()
    }
}
