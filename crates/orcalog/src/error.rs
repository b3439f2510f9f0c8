use std::{error::Error, fmt::Display, path::PathBuf};

/// Errors encountered while turning a single output file into a record. None
/// of these are fatal to a batch; they end up as diagnostic rows.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    /// a section bounded by markers that must be present was not found
    MissingSection(&'static str),
    /// a line that must be present was not found
    MissingField(&'static str),
    /// a token was found where a number was expected but failed to parse
    BadNumber { what: &'static str, token: String },
    /// a line was found but did not have enough fields
    ShortLine { what: &'static str, line: String },
    /// a scan data file contained no rows
    EmptyScan,
    /// the `.allxyz` trajectory has more frames than the scan has points
    FrameMismatch { frames: usize, points: usize },
    ReadFile(String, std::io::ErrorKind),
    WriteFile(String, std::io::ErrorKind),
}

impl ParseError {
    pub(crate) fn bad_number(what: &'static str, token: &str) -> Self {
        Self::BadNumber {
            what,
            token: token.to_owned(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingSection(s) => write!(f, "missing section {s}"),
            ParseError::MissingField(s) => write!(f, "missing {s}"),
            ParseError::BadNumber { what, token } => write!(
                f,
                "could not convert '{token}' to a number for {what}"
            ),
            ParseError::ShortLine { what, line } => {
                write!(f, "too few fields for {what} in '{line}'")
            }
            ParseError::EmptyScan => write!(f, "scan data contains no rows"),
            ParseError::FrameMismatch { frames, points } => write!(
                f,
                "trajectory has {frames} frames but the scan has {points} points"
            ),
            ParseError::ReadFile(name, kind) => {
                write!(f, "failed to read {name}: {kind}")
            }
            ParseError::WriteFile(name, kind) => {
                write!(f, "failed to write {name}: {kind}")
            }
        }
    }
}

impl Error for ParseError {}

/// Errors that stop a whole batch. Everything else is reported per file.
#[derive(Debug)]
pub enum BatchError {
    ReadDir(PathBuf, std::io::Error),
    Write(PathBuf, std::io::Error),
    Csv(PathBuf, csv::Error),
}

impl Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::ReadDir(p, e) => {
                write!(f, "failed to read directory {}: {e}", p.display())
            }
            BatchError::Write(p, e) => {
                write!(f, "failed to write {}: {e}", p.display())
            }
            BatchError::Csv(p, e) => {
                write!(f, "failed to write csv {}: {e}", p.display())
            }
        }
    }
}

impl Error for BatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BatchError::ReadDir(_, e) | BatchError::Write(_, e) => Some(e),
            BatchError::Csv(_, e) => Some(e),
        }
    }
}
