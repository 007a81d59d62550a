//! One run: read every source and the provider workbook, reconcile, merge, save.

use crate::Result;
use crate::append::append_employees;
use crate::diagnostics::{Diagnostics, Phase};
use crate::extract::{SourceLayout, duplicate_keys, extract_records};
use crate::merge::{ExtractedSource, MergeSummary, merge_fields};
use crate::reconcile::{NameMatching, ReconcileResult, reconcile};
use crate::roster::RosterLayout;
use crate::workbook::{TargetDocument, read_source_sheet};
use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct TargetFile {
    pub path: PathBuf,
    pub sheet: usize,
    pub layout: RosterLayout,
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
    pub layout: SourceLayout,
    /// The source that decides who belongs on the roster.
    pub roster: bool,
}

#[derive(Debug, Clone)]
pub struct MergeJob {
    pub target: TargetFile,
    /// Sources to read, in the order their values are written.
    pub sources: Vec<SourceFile>,
    pub matching: NameMatching,
}

impl MergeJob {
    /// Extract every source and load the provider workbook for reading only.
    pub fn read(&self, diagnostics: &mut Diagnostics) -> Result<MergeState> {
        self.load(diagnostics, false)
    }

    fn load(&self, diagnostics: &mut Diagnostics, writable: bool) -> Result<MergeState> {
        let roster_source = self
            .sources
            .iter()
            .position(|source| source.roster)
            .context("no roster source configured")?;

        diagnostics.phase = Phase::Extract;
        let mut sources = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let grid = read_source_sheet(&source.path, source.layout.sheet)?;
            let records = extract_records(&grid, source.layout.name_col, &source.layout.data_cols);
            let duplicates = duplicate_keys(&records);
            for key in &duplicates {
                tracing::warn!(
                    source = %source.name,
                    employee = %key,
                    "employee listed more than once, using the first entry"
                );
            }
            tracing::info!(source = %source.name, records = records.len(), "extracted source");

            let entry = diagnostics.source(&source.name);
            entry.file = Some(source.path.clone());
            entry.read = true;
            entry.records = Some(records.len());
            entry.duplicate_keys = duplicates;

            sources.push(ExtractedSource {
                name: source.name.clone(),
                records,
                target_cols: source.layout.target_cols.clone(),
            });
        }

        diagnostics.phase = Phase::OpenTarget;
        diagnostics.target = Some(self.target.path.clone());
        let document = if writable {
            TargetDocument::open(&self.target.path, self.target.sheet)?
        } else {
            TargetDocument::read(&self.target.path, self.target.sheet)?
        };
        diagnostics.roster_rows_before = Some(document.roster().row_count());

        Ok(MergeState {
            document,
            sources,
            roster_source,
            layout: self.target.layout.clone(),
            matching: self.matching,
        })
    }

    /// Run every phase and write the workbook back.
    pub fn run(&self, diagnostics: &mut Diagnostics) -> Result<(ReconcileResult, MergeSummary)> {
        let mut state = self.load(diagnostics, true)?;

        diagnostics.phase = Phase::Reconcile;
        let result = state.reconcile();
        diagnostics.reconcile = Some(result.clone());

        diagnostics.phase = Phase::Merge;
        let summary = state.apply(&result);
        diagnostics.roster_rows_after = Some(state.document().roster().row_count());
        diagnostics.merge = Some(summary.clone());

        diagnostics.phase = Phase::Save;
        tracing::info!("Updating \"{}\"", state.document().path().display());
        state.save()?;

        diagnostics.phase = Phase::Done;
        Ok((result, summary))
    }
}

/// Everything read for a run, with the workbook still in memory.
#[derive(Debug)]
pub struct MergeState {
    document: TargetDocument,
    sources: Vec<ExtractedSource>,
    roster_source: usize,
    layout: RosterLayout,
    matching: NameMatching,
}

impl MergeState {
    pub fn document(&self) -> &TargetDocument {
        &self.document
    }

    pub fn sources(&self) -> &[ExtractedSource] {
        &self.sources
    }

    /// Compare the workbook as it was read against the roster source.
    pub fn reconcile(&self) -> ReconcileResult {
        reconcile(
            self.document.roster(),
            &self.layout,
            &self.sources[self.roster_source].records,
            self.matching,
        )
    }

    /// Append new employees, then merge every source into the workbook.
    pub fn apply(&mut self, result: &ReconcileResult) -> MergeSummary {
        let rows_appended = append_employees(self.document.roster_mut(), &self.layout, &result.to_add);
        let sources = merge_fields(
            self.document.roster_mut(),
            &self.layout,
            &self.sources,
            self.matching,
        );
        MergeSummary {
            rows_appended,
            sources,
        }
    }

    pub fn save(&self) -> Result<()> {
        self.document.save()
    }
}
