//! Locating lines and marker-bounded regions within the lines of an output
//! file.

#[cfg(test)]
mod tests;

/// The order in which to scan lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    /// from the end of the file, for values that are printed repeatedly and
    /// only the last one matters
    Reverse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Case {
    Sensitive,
    Insensitive,
}

/// How a marker is compared against a normalized line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker<'a> {
    /// the line contains the text anywhere
    Contains(&'a str),
    /// the line ends with the text, as for banners printed after the `|  N>`
    /// prefix of the input echo
    EndsWith(&'a str),
    /// the whole line is exactly the text
    Line(&'a str),
}

impl Marker<'_> {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Marker::Contains(s) => line.contains(s),
            Marker::EndsWith(s) => line.ends_with(s),
            Marker::Line(s) => line == *s,
        }
    }
}

/// Return the first line of `lines`, in the order given by `direction`, that
/// starts with `prefix`, or `None` if there is no such line.
pub fn find_in<'a, S: AsRef<str>>(
    lines: &'a [S],
    prefix: &str,
    direction: Direction,
    case: Case,
) -> Option<&'a str> {
    let lower = prefix.to_lowercase();
    let hit = |line: &&S| {
        let line = line.as_ref();
        match case {
            Case::Sensitive => line.starts_with(prefix),
            Case::Insensitive => line.to_lowercase().starts_with(&lower),
        }
    };
    match direction {
        Direction::Forward => lines.iter().find(hit),
        Direction::Reverse => lines.iter().rev().find(hit),
    }
    .map(|l| l.as_ref())
}

/// Slice `lines` between two markers. The section is anchored on the *last*
/// line matching `start` (or the first line if `start` is `None`) and ends at
/// the first line at or after the anchor matching `end` (or the end of
/// `lines`). The returned slice is `[anchor - start_shift, end + end_shift)`,
/// so a negative `start_shift` skips header lines after the start marker and a
/// negative `end_shift` drops footer lines before the end marker.
///
/// Returns `None` if either requested marker is missing or if the shifted
/// bounds leave `lines` or cross each other.
pub fn cut_section<'a, S: AsRef<str>>(
    lines: &'a [S],
    start: Option<Marker>,
    start_shift: isize,
    end: Option<Marker>,
    end_shift: isize,
) -> Option<&'a [S]> {
    let anchor = match start {
        Some(m) => lines.iter().rposition(|l| m.matches(l.as_ref()))?,
        None => 0,
    };
    let stop = match end {
        Some(m) => {
            anchor
                + lines[anchor..]
                    .iter()
                    .position(|l| m.matches(l.as_ref()))?
        }
        None => lines.len(),
    };
    let lo = anchor as isize - start_shift;
    let hi = stop as isize + end_shift;
    if lo < 0 || hi < lo || hi as usize > lines.len() {
        return None;
    }
    Some(&lines[lo as usize..hi as usize])
}
