use std::fmt::Write as _;
use std::io::IsTerminal as _;
use std::path::Path;

use anstyle::{AnsiColor, Color, Style};
use payroll_merge::{Diagnostics, MergeSummary, PayrollError, Phase, ReconcileResult};

pub struct Palette {
    added: Style,
    missing: Style,
    heading: Style,
    error: Style,
}

impl Palette {
    pub fn detect() -> Self {
        if std::io::stdout().is_terminal() {
            Palette::colored()
        } else {
            Palette::plain()
        }
    }

    fn colored() -> Self {
        Palette {
            added: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))),
            missing: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            heading: Style::new().bold(),
            error: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold(),
        }
    }

    fn plain() -> Self {
        Palette {
            added: Style::new(),
            missing: Style::new(),
            heading: Style::new(),
            error: Style::new(),
        }
    }
}

/// `applied` is false for a diff, where nothing was written.
pub fn discrepancy_report(result: &ReconcileResult, applied: bool, palette: &Palette) -> String {
    let Palette { added, missing, .. } = palette;
    let mut out = String::new();

    if result.to_add.is_empty() {
        out.push_str("Searching for employee discrepancies... no new employees found.\n");
    } else {
        let verb = if applied { "added" } else { "to add" };
        let _ = writeln!(out, "{added}━━━ New employees ({verb}) ━━━{added:#}");
        for key in &result.to_add {
            let _ = writeln!(out, "  {key}");
        }
    }

    if !result.unmatched.is_empty() {
        out.push('\n');
        let _ = writeln!(
            out,
            "{missing}━━━ No data in the roster source for the following employees ━━━{missing:#}"
        );
        for name in &result.unmatched {
            let _ = writeln!(out, "  {name}");
        }
    }

    out
}

/// Discrepancies of a run that failed before the workbook was saved.
pub fn unsaved_report(diagnostics: &Diagnostics, palette: &Palette) -> Option<String> {
    if diagnostics.phase == Phase::Done {
        return None;
    }
    let result = diagnostics.reconcile.as_ref()?;
    Some(discrepancy_report(result, false, palette))
}

pub fn merge_report(summary: &MergeSummary, target: &Path, palette: &Palette) -> String {
    let Palette { added, heading, .. } = palette;
    let mut out = String::new();

    let _ = writeln!(out, "{heading}━━━ Summary ━━━{heading:#}");
    if !summary.rows_appended.is_empty() {
        let _ = writeln!(
            out,
            "  {added}{}{added:#} row(s) appended",
            summary.rows_appended.len()
        );
    }
    for source in &summary.sources {
        let _ = writeln!(
            out,
            "  {}: {} row(s) matched, {} cell(s) written",
            source.source, source.rows_matched, source.cells_written
        );
    }
    let _ = writeln!(out, "✓ Saved \"{}\"", target.display());

    out
}

pub fn located_report(diagnostics: &Diagnostics) -> String {
    let mut out = String::new();

    if let Some(target) = &diagnostics.target {
        let _ = writeln!(out, "target: {}", target.display());
    }
    for source in &diagnostics.sources {
        let Some(file) = &source.file else { continue };
        let note = if source.read { "" } else { " (not read)" };
        let _ = writeln!(out, "{}: {}{note}", source.name, file.display());
    }

    out
}

pub fn print_diagnostics(diagnostics: &Diagnostics) {
    println!("━━━ Debug values ━━━");
    match toml::to_string_pretty(diagnostics) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            tracing::debug!("diagnostics are not representable as TOML: {err}");
            println!("{diagnostics:#?}");
        }
    }
}

pub fn print_error(err: &PayrollError, palette: &Palette) {
    let style = &palette.error;
    eprintln!("{style}Error:{style:#} {err}");
}

pub fn print_unclassified(err: &anyhow::Error, palette: &Palette) {
    let style = &palette.error;
    eprintln!("{style}An unexpected error occurred:{style:#} {err:?}");
}
