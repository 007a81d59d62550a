use payroll_merge::workbook::{Sheet, TargetDocument, write_workbook};
use payroll_merge::{
    CellValue, Diagnostics, Grid, MergeJob, NameMatching, PayrollError, Phase, RosterLayout,
    SourceFile, SourceLayout, TargetFile,
};
use std::path::{Path, PathBuf};

fn sheet(name: &str, rows: Vec<Vec<CellValue>>) -> Sheet {
    Sheet {
        name: name.to_owned(),
        grid: Grid::from_rows(rows),
    }
}

fn text(value: &str) -> CellValue {
    CellValue::from(value)
}

fn num(value: f64) -> CellValue {
    CellValue::Number(value)
}

fn empty() -> CellValue {
    CellValue::Empty
}

/// Provider workbook with Jane Doe and John Smith; John has contributions
/// that were typed in by hand and Jane has a total formula and a hire date.
fn write_target(dir: &Path) -> PathBuf {
    let path = dir.join("Transamerica Upload.xlsx");
    let roster = sheet(
        "Upload",
        vec![
            vec![
                text("Company"),
                empty(),
                text("First Name"),
                empty(),
                text("Last Name"),
                text("Gross"),
                text("401k"),
                text("YTD"),
            ],
            vec![
                num(28.0),
                empty(),
                text("Jane"),
                empty(),
                text("Doe"),
                empty(),
                empty(),
                empty(),
                CellValue::Formula("F2+G2".to_owned()),
                CellValue::Date(45352.0),
            ],
            vec![
                num(28.0),
                empty(),
                text("John"),
                empty(),
                text("Smith"),
                empty(),
                num(11.0),
                num(12.0),
            ],
        ],
    );
    let notes = sheet("Instructions", vec![vec![text("Upload by the 5th")]]);
    write_workbook(&path, &[roster, notes], 0).unwrap();
    path
}

/// Payroll summary listing Jane Doe and Kim Lee.
fn write_summary(dir: &Path) -> PathBuf {
    let path = dir.join("Payroll Summary.xlsx");
    let report = sheet(
        "Summary",
        vec![
            vec![text("Employee"), text("Gross")],
            vec![text("Doe, Jane"), num(1000.0)],
            vec![text("Lee, Kim A"), num(800.0)],
            vec![text("Total, 2 employees"), num(1800.0)],
        ],
    );
    write_workbook(&path, &[report], 0).unwrap();
    path
}

/// Contribution report with Jane Doe and Kim Lee on its second sheet.
fn write_contributions(dir: &Path) -> PathBuf {
    let path = dir.join("401k Contributions.xlsx");
    let cover = sheet("Cover", vec![vec![text("Generated report")]]);
    let report = sheet(
        "Detail",
        vec![
            vec![text("Name"), text("Deferral"), text("YTD")],
            vec![text("Doe, Jane Q"), num(50.0), num(600.0)],
            vec![text("Lee, Kim"), num(10.0), num(20.0)],
        ],
    );
    write_workbook(&path, &[cover, report], 0).unwrap();
    path
}

fn job(dir: &Path) -> MergeJob {
    MergeJob {
        target: TargetFile {
            path: write_target(dir),
            sheet: 0,
            layout: RosterLayout::default(),
        },
        sources: vec![
            SourceFile {
                name: "payroll_summary".to_owned(),
                path: write_summary(dir),
                layout: SourceLayout {
                    sheet: 0,
                    name_col: 0,
                    data_cols: vec![1],
                    target_cols: vec![5],
                },
                roster: true,
            },
            SourceFile {
                name: "contributions".to_owned(),
                path: write_contributions(dir),
                layout: SourceLayout {
                    sheet: 1,
                    name_col: 0,
                    data_cols: vec![1, 2],
                    target_cols: vec![6, 7],
                },
                roster: false,
            },
        ],
        matching: NameMatching::Normalized,
    }
}

#[test]
fn merge_appends_and_fills_rows() {
    let dir = tempfile::tempdir().unwrap();
    let job = job(dir.path());
    let mut diagnostics = Diagnostics::default();

    let (result, summary) = job.run(&mut diagnostics).unwrap();

    let to_add: Vec<_> = result.to_add.iter().map(|key| key.as_str()).collect();
    assert_eq!(to_add, ["LEE, KIM"]);
    assert_eq!(result.unmatched, ["Smith, John"]);
    assert_eq!(summary.rows_appended, [3]);
    assert_eq!(summary.sources[0].rows_matched, 2);
    assert_eq!(summary.sources[1].rows_matched, 2);

    assert_eq!(diagnostics.phase, Phase::Done);
    assert_eq!(diagnostics.roster_rows_before, Some(3));
    assert_eq!(diagnostics.roster_rows_after, Some(4));

    let document = TargetDocument::open(&job.target.path, 0).unwrap();
    let roster = document.roster();

    // Jane: matched in both sources
    assert_eq!(roster.get(1, 5), &num(1000.0));
    assert_eq!(roster.get(1, 6), &num(50.0));
    assert_eq!(roster.get(1, 7), &num(600.0));

    assert_eq!(roster.get(1, 8), &CellValue::Formula("F2+G2".to_owned()));
    assert_eq!(roster.get(1, 9), &CellValue::Date(45352.0));

    // John: no data anywhere, manual values survive
    assert_eq!(roster.get(2, 5), &empty());
    assert_eq!(roster.get(2, 6), &num(11.0));
    assert_eq!(roster.get(2, 7), &num(12.0));

    // Kim: appended, then filled
    assert_eq!(roster.get(3, 0), &num(28.0));
    assert_eq!(roster.get(3, 2), &text("KIM"));
    assert_eq!(roster.get(3, 4), &text("LEE"));
    assert_eq!(roster.get(3, 5), &num(800.0));
    assert_eq!(roster.get(3, 6), &num(10.0));
    assert_eq!(roster.get(3, 7), &num(20.0));

    assert_eq!(
        document.sheets()[1].grid.get(0, 0),
        &text("Upload by the 5th")
    );
}

#[test]
fn second_run_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let job = job(dir.path());

    job.run(&mut Diagnostics::default()).unwrap();
    let first = TargetDocument::open(&job.target.path, 0).unwrap();

    let (result, summary) = job.run(&mut Diagnostics::default()).unwrap();
    let second = TargetDocument::open(&job.target.path, 0).unwrap();

    assert!(result.to_add.is_empty());
    assert_eq!(result.unmatched, ["Smith, John"]);
    assert!(summary.rows_appended.is_empty());
    assert_eq!(first.sheets(), second.sheets());
}

#[test]
fn diff_only_leaves_target_alone() {
    let dir = tempfile::tempdir().unwrap();
    let job = job(dir.path());
    let before = std::fs::read(&job.target.path).unwrap();

    let state = job.read(&mut Diagnostics::default()).unwrap();
    let result = state.reconcile();

    assert_eq!(result.to_add.len(), 1);
    assert_eq!(state.sources().len(), 2);
    assert_eq!(std::fs::read(&job.target.path).unwrap(), before);
}

#[test]
fn missing_sheet_stops_before_target() {
    let dir = tempfile::tempdir().unwrap();
    let mut job = job(dir.path());
    job.sources[1].layout.sheet = 5;
    let before = std::fs::read(&job.target.path).unwrap();
    let mut diagnostics = Diagnostics::default();

    let err = job.run(&mut diagnostics).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PayrollError>(),
        Some(PayrollError::SheetOutOfRange { sheet: 5, .. })
    ));
    assert_eq!(diagnostics.phase, Phase::Extract);
    assert_eq!(diagnostics.sources.len(), 1);
    assert_eq!(std::fs::read(&job.target.path).unwrap(), before);
}

#[test]
fn diff_reads_a_read_only_target() {
    let dir = tempfile::tempdir().unwrap();
    let job = job(dir.path());
    let mut permissions = std::fs::metadata(&job.target.path).unwrap().permissions();
    permissions.set_readonly(true);
    std::fs::set_permissions(&job.target.path, permissions).unwrap();

    let state = job.read(&mut Diagnostics::default()).unwrap();

    assert_eq!(state.reconcile().unmatched, ["Smith, John"]);
}
