use test_case::test_case;

use super::*;

const LINES: [&str; 8] = [
    "START",
    "a 1",
    "END",
    "START",
    "b 2",
    "c 3",
    "END",
    "Tail line",
];

#[test_case(Direction::Forward, "START", Some("START"))]
#[test_case(Direction::Reverse, "tail", None)]
#[test_case(Direction::Forward, "a", Some("a 1"))]
#[test_case(Direction::Reverse, "missing", None)]
fn find_sensitive(dir: Direction, prefix: &str, want: Option<&str>) {
    assert_eq!(find_in(&LINES, prefix, dir, Case::Sensitive), want);
}

#[test]
fn find_insensitive() {
    assert_eq!(
        find_in(&LINES, "tail", Direction::Reverse, Case::Insensitive),
        Some("Tail line")
    );
    let lines = ["%PAL NPROCS 4 END", "%pal nprocs 8 end"];
    assert_eq!(
        find_in(&lines, "%pal nprocs", Direction::Forward, Case::Insensitive),
        Some("%PAL NPROCS 4 END")
    );
    assert_eq!(
        find_in(&lines, "%pal nprocs", Direction::Reverse, Case::Insensitive),
        Some("%pal nprocs 8 end")
    );
}

#[test]
fn cut_last_start() {
    let got = cut_section(
        &LINES,
        Some(Marker::Line("START")),
        0,
        Some(Marker::Line("END")),
        0,
    );
    assert_eq!(got, Some(&LINES[3..6]));
}

#[test]
fn cut_shifts() {
    // skip the marker itself and keep the END line
    let got = cut_section(
        &LINES,
        Some(Marker::Line("START")),
        -1,
        Some(Marker::Line("END")),
        1,
    );
    assert_eq!(got, Some(&["b 2", "c 3", "END"][..]));

    // reach back outside of the anchor
    let got = cut_section(&LINES, Some(Marker::Line("START")), 1, None, 0);
    assert_eq!(got, Some(&LINES[2..]));
}

#[test]
fn cut_defaults() {
    assert_eq!(cut_section(&LINES, None, 0, None, 0), Some(&LINES[..]));
    assert_eq!(
        cut_section(&LINES, None, 0, Some(Marker::Contains("ND")), 0),
        Some(&LINES[..2])
    );
}

#[test]
fn cut_absent() {
    assert!(
        cut_section(&LINES, Some(Marker::Line("nope")), 0, None, 0).is_none()
    );
    // END never follows the last "Tail"
    assert!(
        cut_section(
            &LINES,
            Some(Marker::Contains("Tail")),
            0,
            Some(Marker::Line("END")),
            0
        )
        .is_none()
    );
    // shifted past the end of the document
    assert!(
        cut_section(&LINES, Some(Marker::Contains("Tail")), -3, None, 0)
            .is_none()
    );
}

#[test]
fn line_marker_is_exact() {
    assert!(Marker::Line("INPUT FILE").matches("INPUT FILE"));
    assert!(!Marker::Line("INPUT FILE").matches("NO INPUT FILE"));
    assert!(Marker::Contains("INPUT FILE").matches("NO INPUT FILE"));
    assert!(
        Marker::EndsWith("****END OF INPUT****")
            .matches("| 10>                          ****END OF INPUT****")
    );
    assert!(!Marker::EndsWith("INPUT").matches("INPUT FILE"));
}
