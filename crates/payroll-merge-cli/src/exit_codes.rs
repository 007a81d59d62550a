//! Exit codes of `payroll-merge`.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | Unclassified error                              |
//! | 2    | Configuration error (also clap usage errors)    |
//! | 3    | No file matches a search                        |
//! | 4    | Source file format is not supported             |
//! | 5    | Provider workbook is open in another program    |

use payroll_merge::PayrollError;

pub const EXIT_SUCCESS: u8 = 0;

/// Anything not listed below; the operator is offered the debug values.
pub const EXIT_ERROR: u8 = 1;

/// Config file missing, unreadable, invalid, or pointing at a sheet that does not exist.
pub const EXIT_CONFIG: u8 = 2;

pub const EXIT_NO_MATCHING_FILE: u8 = 3;

pub const EXIT_UNSUPPORTED_FORMAT: u8 = 4;

pub const EXIT_TARGET_LOCKED: u8 = 5;

pub fn for_error(err: &PayrollError) -> u8 {
    match err {
        PayrollError::Config { .. } | PayrollError::SheetOutOfRange { .. } => EXIT_CONFIG,
        PayrollError::NoMatchingFile { .. } => EXIT_NO_MATCHING_FILE,
        PayrollError::UnsupportedFormat { .. } => EXIT_UNSUPPORTED_FORMAT,
        PayrollError::TargetLocked { .. } => EXIT_TARGET_LOCKED,
        PayrollError::MalformedName(_) => EXIT_ERROR,
    }
}
