use crate::{
    error::ParseError,
    section::{Case, Direction, find_in},
};

/// Return the `index`th whitespace-separated field of the line found by
/// [find_in] for `marker`. Negative indices count from the end of the line, so
/// `-1` is the last field. `None` if the line or the field does not exist.
pub fn extract_field<'a, S: AsRef<str>>(
    lines: &'a [S],
    marker: &str,
    index: isize,
    direction: Direction,
) -> Option<&'a str> {
    let line = find_in(lines, marker, direction, Case::Sensitive)?;
    nth_field(line, index)
}

/// Like [extract_field] with [Direction::Reverse], but parse the field as a
/// float. A missing line is `Ok(None)`, while a field that is present but
/// not a number is an error.
pub fn extract_f64<S: AsRef<str>>(
    lines: &[S],
    marker: &'static str,
    index: isize,
) -> Result<Option<f64>, ParseError> {
    extract_field(lines, marker, index, Direction::Reverse)
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| ParseError::bad_number(marker, s))
        })
        .transpose()
}

/// the `index`th field of `line`, counting from the back for negative indices
pub(crate) fn nth_field(line: &str, index: isize) -> Option<&str> {
    if index >= 0 {
        line.split_whitespace().nth(index as usize)
    } else {
        line.split_whitespace().rev().nth((-index - 1) as usize)
    }
}
