//! Spreadsheet files: read-only source reports and the writable provider workbook.

use crate::Result;
use crate::error::PayrollError;
use crate::grid::{CellValue, Grid};
use anyhow::Context;
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// Extensions calamine can open.
pub const SOURCE_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods"];
/// The provider workbook is written back as xlsx.
pub const TARGET_EXTENSION: &str = "xlsx";

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn ensure_extension(path: &Path, allowed: &[&str]) -> Result<(), PayrollError> {
    let extension = extension_of(path);
    if allowed.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(PayrollError::UnsupportedFormat {
            path: path.to_owned(),
            extension: format!(".{extension}"),
        })
    }
}

pub fn ensure_source_format(path: &Path) -> Result<(), PayrollError> {
    ensure_extension(path, SOURCE_EXTENSIONS)
}

/// Whether an I/O failure means another program holds the file.
fn is_locked(err: &io::Error) -> bool {
    // 32/33: sharing and lock violations, which is how an open Excel window shows up
    matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
    ) || (cfg!(windows) && matches!(err.raw_os_error(), Some(32 | 33)))
}

fn open_sheets(path: &Path) -> Result<Sheets<BufReader<File>>> {
    open_workbook_auto(path).with_context(|| format!("Failed to open workbook {}", path.display()))
}

fn sheet_range(workbook: &mut Sheets<BufReader<File>>, path: &Path, name: &str) -> Result<Grid> {
    let range = workbook
        .worksheet_range(name)
        .with_context(|| format!("Failed to read sheet '{name}' of {}", path.display()))?;
    Ok(grid_from_range(&range))
}

/// Put the formulas of sheet `name` over their cached values in `grid`.
fn overlay_formulas(
    workbook: &mut Sheets<BufReader<File>>,
    path: &Path,
    name: &str,
    grid: &mut Grid,
) -> Result<()> {
    let formulas = workbook
        .worksheet_formula(name)
        .with_context(|| format!("Failed to read formulas of sheet '{name}' of {}", path.display()))?;
    let (start_row, start_col) = formulas.start().unwrap_or((0, 0));
    for (row_idx, row) in formulas.rows().enumerate() {
        for (col_idx, formula) in row.iter().enumerate() {
            if formula.is_empty() {
                continue;
            }
            grid.set(
                start_row as usize + row_idx,
                start_col as usize + col_idx,
                CellValue::Formula(formula.trim_start_matches('=').to_owned()),
            );
        }
    }
    Ok(())
}

fn sheet_name(path: &Path, names: &[String], sheet: usize) -> Result<String, PayrollError> {
    names
        .get(sheet)
        .cloned()
        .ok_or_else(|| PayrollError::SheetOutOfRange {
            path: path.to_owned(),
            sheet,
            available: names.len(),
        })
}

fn grid_from_range(range: &Range<Data>) -> Grid {
    let mut grid = Grid::new();
    // data may not begin at A1
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    for (row_idx, row) in range.rows().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let value = cell_value(cell);
            if value.is_empty() {
                continue;
            }
            grid.set(
                start_row as usize + row_idx,
                start_col as usize + col_idx,
                value,
            );
        }
    }
    grid
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Date(dt.as_f64()),
        Data::Error(e) => CellValue::Text(format!("#{e:?}")),
    }
}

/// Read one sheet of a source report.
pub fn read_source_sheet(path: &Path, sheet: usize) -> Result<Grid> {
    ensure_source_format(path)?;
    tracing::info!("Reading file \"{}\"", path.display());
    let mut workbook = open_sheets(path)?;
    let name = sheet_name(path, &workbook.sheet_names(), sheet)?;
    sheet_range(&mut workbook, path, &name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub grid: Grid,
}

/// The provider workbook, held in memory for the whole run and written back once.
#[derive(Debug, Clone)]
pub struct TargetDocument {
    path: PathBuf,
    sheets: Vec<Sheet>,
    roster: usize,
}

impl TargetDocument {
    /// Load every sheet of `path` to be saved later; `roster_sheet` is the one
    /// that gets merged into.
    ///
    /// Fails with [`PayrollError::TargetLocked`] up front when the file cannot
    /// be written back.
    pub fn open(path: &Path, roster_sheet: usize) -> Result<Self> {
        ensure_extension(path, &[TARGET_EXTENSION])?;

        if let Err(err) = OpenOptions::new().read(true).write(true).open(path) {
            if is_locked(&err) {
                return Err(PayrollError::TargetLocked {
                    path: path.to_owned(),
                }
                .into());
            }
            return Err(err).with_context(|| format!("Failed to open {}", path.display()));
        }

        Self::read(path, roster_sheet)
    }

    /// Load every sheet of `path` without checking that it can be written.
    pub fn read(path: &Path, roster_sheet: usize) -> Result<Self> {
        ensure_extension(path, &[TARGET_EXTENSION])?;

        tracing::info!("Reading file \"{}\"", path.display());
        let mut workbook = open_sheets(path)?;
        let names = workbook.sheet_names();
        sheet_name(path, &names, roster_sheet)?;

        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let mut grid = sheet_range(&mut workbook, path, &name)?;
            overlay_formulas(&mut workbook, path, &name, &mut grid)?;
            sheets.push(Sheet { name, grid });
        }

        Ok(TargetDocument {
            path: path.to_owned(),
            sheets,
            roster: roster_sheet,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn roster(&self) -> &Grid {
        &self.sheets[self.roster].grid
    }

    pub fn roster_mut(&mut self) -> &mut Grid {
        &mut self.sheets[self.roster].grid
    }

    /// Write the whole workbook back to where it was read from.
    pub fn save(&self) -> Result<()> {
        self.save_as(&self.path)
    }

    pub fn save_as(&self, path: &Path) -> Result<()> {
        write_workbook(path, &self.sheets, self.roster)
    }
}

/// Write `sheets` to a new xlsx file at `path`, replacing it if it exists.
pub fn write_workbook(path: &Path, sheets: &[Sheet], active: usize) -> Result<()> {
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook
            .add_worksheet()
            .set_name(&sheet.name)
            .with_context(|| format!("Failed to create sheet '{}'", sheet.name))?;

        for (row, col, value) in sheet.grid.cells() {
            let row = u32::try_from(row).context("row index out of range")?;
            let col = u16::try_from(col).context("column index out of range")?;
            let written = match value {
                CellValue::Empty => continue,
                CellValue::Text(text) => worksheet.write_string(row, col, text),
                CellValue::Number(n) => worksheet.write_number(row, col, *n),
                CellValue::Bool(b) => worksheet.write_boolean(row, col, *b),
                CellValue::Date(serial) => {
                    worksheet.write_number_with_format(row, col, *serial, &date_format(*serial))
                }
                CellValue::Formula(formula) => worksheet.write_formula(row, col, formula.as_str()),
            };
            written.with_context(|| {
                format!("Failed to write cell ({row}, {col}) of '{}'", sheet.name)
            })?;
        }
    }

    if let Ok(worksheet) = workbook.worksheet_from_index(active) {
        worksheet.set_active(true);
    }

    workbook
        .save(path)
        .map_err(|err| classify_save_error(path, err))
}

fn classify_save_error(path: &Path, err: XlsxError) -> anyhow::Error {
    match err {
        XlsxError::IoError(err) if is_locked(&err) => PayrollError::TargetLocked {
            path: path.to_owned(),
        }
        .into(),
        err => anyhow::Error::new(err).context(format!("Failed to save {}", path.display())),
    }
}

fn date_format(serial: f64) -> Format {
    let has_date = serial.floor() > 0.0;
    let has_time = serial.fract().abs() > 0.0001;
    let pattern = match (has_date, has_time) {
        (true, true) => "m/d/yyyy h:mm:ss",
        (false, true) => "h:mm:ss",
        _ => "m/d/yyyy",
    };
    Format::new().set_num_format(pattern)
}
