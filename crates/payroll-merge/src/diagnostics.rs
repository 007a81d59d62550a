//! What a run has seen so far, for the operator to inspect when something goes wrong.

use crate::merge::MergeSummary;
use crate::name::EmployeeKey;
use crate::reconcile::ReconcileResult;
use serde::Serialize;
use std::path::PathBuf;

/// Pipeline step a run was in when the snapshot was taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    #[default]
    Configure,
    Locate,
    Extract,
    OpenTarget,
    Reconcile,
    Merge,
    Save,
    Done,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceDiagnostics {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
    pub duplicate_keys: Vec<EmployeeKey>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster_rows_before: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster_rows_after: Option<usize>,
    pub sources: Vec<SourceDiagnostics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconcile: Option<ReconcileResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeSummary>,
}

impl Diagnostics {
    /// Entry for the source called `name`, created on first use.
    pub fn source(&mut self, name: &str) -> &mut SourceDiagnostics {
        let index = match self.sources.iter().position(|source| source.name == name) {
            Some(index) => index,
            None => {
                self.sources.push(SourceDiagnostics {
                    name: name.to_owned(),
                    ..SourceDiagnostics::default()
                });
                self.sources.len() - 1
            }
        };
        &mut self.sources[index]
    }
}
