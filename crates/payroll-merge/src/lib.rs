pub mod append;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod grid;
pub mod job;
pub mod locate;
pub mod merge;
pub mod name;
pub mod reconcile;
pub mod roster;
pub mod workbook;

pub use anyhow::Result;

pub use diagnostics::{Diagnostics, Phase};
pub use error::PayrollError;
pub use extract::{SourceLayout, SourceRecord};
pub use grid::{CellValue, Grid};
pub use job::{MergeJob, MergeState, SourceFile, TargetFile};
pub use merge::MergeSummary;
pub use name::EmployeeKey;
pub use reconcile::{NameMatching, ReconcileResult};
pub use roster::RosterLayout;
