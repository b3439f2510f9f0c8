//! Relative energies and local extrema along a relaxed surface scan

use std::{fmt::Display, fs::read_to_string, path::Path};

use serde::Serialize;

use crate::{KCALHT, error::ParseError};

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Extremum {
    /// the first or last point of the scan
    Edge,
    Min,
    Max,
    #[default]
    None,
}

impl Display for Extremum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Extremum::Edge => "edge",
            Extremum::Min => "min",
            Extremum::Max => "max",
            Extremum::None => "",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScanPoint {
    pub coordinate: f64,
    /// in hartree
    pub energy: f64,
    /// in kcal/mol above the lowest point of the scan
    pub relative: f64,
    /// change in `relative` from the previous point. `None` for the first
    pub step: Option<f64>,
    pub kind: Extremum,
}

/// The scan data for one scan job
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ScanData {
    Found { file: String, points: Vec<ScanPoint> },
    /// the `.relaxscanact.dat` file for the job does not exist
    Missing { file: String },
}

/// Convert `(coordinate, energy)` rows into a [ScanPoint] trajectory in a
/// single pass. A point is a [Extremum::Max] when the step into it is positive
/// and the step out of it is not, and a [Extremum::Min] for the reverse. The
/// first and last points are always [Extremum::Edge].
pub fn analyze(rows: &[(f64, f64)]) -> Result<Vec<ScanPoint>, ParseError> {
    let scan_min = rows
        .iter()
        .map(|&(_, e)| e)
        .min_by(f64::total_cmp)
        .ok_or(ParseError::EmptyScan)?;

    let mut points: Vec<ScanPoint> = Vec::with_capacity(rows.len());
    for (i, &(coordinate, energy)) in rows.iter().enumerate() {
        let relative = (energy - scan_min) * KCALHT;
        let step = points.last().map(|p| relative - p.relative);
        if i > 1 {
            let prev = &mut points[i - 1];
            if let (Some(cur), Some(last)) = (step, prev.step) {
                prev.kind = if cur <= 0.0 && 0.0 < last {
                    Extremum::Max
                } else if cur >= 0.0 && 0.0 > last {
                    Extremum::Min
                } else {
                    Extremum::None
                };
            }
        }
        points.push(ScanPoint {
            coordinate,
            energy,
            relative,
            step,
            kind: Extremum::None,
        });
    }

    if let Some(first) = points.first_mut() {
        first.kind = Extremum::Edge;
    }
    if let Some(last) = points.last_mut() {
        last.kind = Extremum::Edge;
    }

    Ok(points)
}

/// Read the `(coordinate, energy)` columns of a whitespace-delimited
/// `.relaxscanact.dat` file. Additional columns are ignored.
pub fn read_scan_file(
    path: impl AsRef<Path>,
) -> Result<Vec<(f64, f64)>, ParseError> {
    const WHAT: &str = "scan data";
    let path = path.as_ref();
    let contents = read_to_string(path).map_err(|e| {
        ParseError::ReadFile(path.display().to_string(), e.kind())
    })?;
    let mut rows = Vec::new();
    for line in contents.lines().filter(|l| !l.trim().is_empty()) {
        let mut sp = line.split_whitespace();
        let (Some(x), Some(e)) = (sp.next(), sp.next()) else {
            return Err(ParseError::ShortLine {
                what: WHAT,
                line: line.to_owned(),
            });
        };
        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|_| ParseError::bad_number(WHAT, s))
        };
        rows.push((parse(x)?, parse(e)?));
    }
    Ok(rows)
}
