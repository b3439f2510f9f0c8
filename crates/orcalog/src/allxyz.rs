//! Annotating the multi-frame trajectory ORCA writes for a relaxed scan

use std::{
    fs::{read_to_string, remove_file, write},
    path::{Path, PathBuf},
};

use crate::{error::ParseError, scan::ScanPoint};


/// the line ORCA places between frames in a `.allxyz` file
const FRAME_SEPARATOR: char = '>';

/// Rewrite the `.allxyz` file at `path` as a plain multi-frame `.all.xyz`
/// file next to it and remove the original. The comment line of each frame is
/// replaced by `<molecule> <coordinate> <kind>` for the matching scan point,
/// and the `>` separators become blank lines. Returns the path of the new
/// file.
pub fn annotate(
    molecule: &str,
    path: impl AsRef<Path>,
    points: &[ScanPoint],
) -> Result<PathBuf, ParseError> {
    let path = path.as_ref();
    let contents = read_to_string(path).map_err(|e| {
        ParseError::ReadFile(path.display().to_string(), e.kind())
    })?;
    let out = relabel(molecule, &contents, points)?;

    let new = path.with_extension("all.xyz");
    write(&new, out).map_err(|e| {
        ParseError::WriteFile(new.display().to_string(), e.kind())
    })?;
    remove_file(path).map_err(|e| {
        ParseError::WriteFile(path.display().to_string(), e.kind())
    })?;
    log::info!("annotated trajectory written to {}", new.display());

    Ok(new)
}

pub(crate) fn relabel(
    molecule: &str,
    contents: &str,
    points: &[ScanPoint],
) -> Result<String, ParseError> {
    let mut lines: Vec<String> = contents.lines().map(String::from).collect();
    if lines.is_empty() {
        return Ok(String::new());
    }
    let frames =
        1 + lines.iter().filter(|l| l.contains(FRAME_SEPARATOR)).count();
    if frames > points.len() {
        return Err(ParseError::FrameMismatch {
            frames,
            points: points.len(),
        });
    }

    let label =
        |p: &ScanPoint| format!("{molecule} {:?} {}", p.coordinate, p.kind);

    // each frame is an atom count, a comment line, and the atoms. the first
    // frame has no separator in front of it
    let mut comments = vec![1];
    for (i, line) in lines.iter_mut().enumerate() {
        if line.contains(FRAME_SEPARATOR) {
            line.clear();
            comments.push(i + 2);
        }
    }
    for (&c, p) in comments.iter().zip(points) {
        if let Some(line) = lines.get_mut(c) {
            *line = label(p);
        }
    }

    let mut ret = lines.join("\n");
    ret.push('\n');
    Ok(ret)
}
