//! Failures the operator is expected to fix themselves.
//!
//! Everything else travels as a plain [`anyhow::Error`] and is reported as
//! unclassified.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("Unable to load configuration from \"{}\": {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error(
        "Could not find a file containing \"{keyword}\" ending in \"{extension}\" in folder \"{}\". \
         Ensure that you have downloaded the correct file, or adjust the search settings in the configuration.",
        dir.display()
    )]
    NoMatchingFile {
        keyword: String,
        extension: String,
        dir: PathBuf,
    },

    #[error(
        "Unable to read \"{}\": \"{extension}\" files are not supported yet. Ask the maintainer to add support if you need them.",
        path.display()
    )]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error(
        "Cannot access \"{}\", it is likely open in another program. Please close the file and try again.",
        path.display()
    )]
    TargetLocked { path: PathBuf },

    #[error("\"{}\" has no sheet #{sheet} ({available} sheet(s) available)", path.display())]
    SheetOutOfRange {
        path: PathBuf,
        sheet: usize,
        available: usize,
    },

    #[error("not a \"Last, First\" name: {0:?}")]
    MalformedName(String),
}
