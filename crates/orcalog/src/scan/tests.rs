use approx::assert_abs_diff_eq;
use test_case::test_case;

use super::*;

use super::Extremum::{Edge, Max, Min};

fn kinds(points: &[ScanPoint]) -> Vec<Extremum> {
    points.iter().map(|p| p.kind).collect()
}

fn rows(energies: &[f64]) -> Vec<(f64, f64)> {
    energies
        .iter()
        .enumerate()
        .map(|(i, &e)| (1.0 + 0.1 * i as f64, e))
        .collect()
}

#[test]
fn example_trajectory() {
    let got = analyze(&rows(&[-10.0, -10.5, -10.2, -10.6, -10.1])).unwrap();
    let want = [376.5054, 62.7509, 251.0036, 0.0, 313.7545];
    for (p, w) in got.iter().zip(want) {
        assert_abs_diff_eq!(p.relative, w, epsilon = 1e-4);
    }
    assert_eq!(got[0].step, None);
    assert_abs_diff_eq!(got[1].step.unwrap(), -313.7545, epsilon = 1e-4);
    assert_abs_diff_eq!(got[4].step.unwrap(), 313.7545, epsilon = 1e-4);
    assert_eq!(kinds(&got), [Edge, Min, Max, Min, Edge]);
}

#[test]
fn minimum_is_zero() {
    let got = analyze(&rows(&[-3.2, -3.9, -4.4, -4.1, -3.0, -3.6])).unwrap();
    let lowest = got
        .iter()
        .min_by(|a, b| a.energy.total_cmp(&b.energy))
        .unwrap();
    assert_abs_diff_eq!(lowest.relative, 0.0);
    assert!(got.iter().all(|p| p.relative >= 0.0));
}

#[test]
fn single_well() {
    let got =
        analyze(&rows(&[-1.0, -1.2, -1.3, -1.35, -1.3, -1.1, -0.9])).unwrap();
    assert_eq!(got.first().unwrap().kind, Edge);
    assert_eq!(got.last().unwrap().kind, Edge);
    let interior = &got[1..got.len() - 1];
    assert_eq!(interior.iter().filter(|p| p.kind == Min).count(), 1);
    assert_eq!(got[3].kind, Min);
    assert!(interior.iter().all(|p| p.kind != Max));
}

/// the middle point of a three-point scan is classified like any other
/// interior point
#[test_case(&[-1.0, -2.0, -1.5], Min)]
#[test_case(&[-2.0, -1.0, -1.5], Max)]
#[test_case(&[-2.0, -1.5, -1.0], Extremum::None)]
fn three_points(energies: &[f64], middle: Extremum) {
    let got = analyze(&rows(energies)).unwrap();
    assert_eq!(kinds(&got), [Edge, middle, Edge]);
}

#[test]
fn plateau_counts_as_turning() {
    // a flat step after a rise still marks the top
    let got = analyze(&rows(&[-2.0, -1.0, -1.0, -2.0])).unwrap();
    assert_eq!(kinds(&got), [Edge, Max, Extremum::None, Edge]);
}

#[test]
fn short_scans() {
    assert_eq!(kinds(&analyze(&rows(&[-1.0])).unwrap()), [Edge]);
    assert_eq!(kinds(&analyze(&rows(&[-1.0, -2.0])).unwrap()), [Edge, Edge]);
    assert_eq!(analyze(&[]), Err(ParseError::EmptyScan));
}

#[test]
fn read_dat() {
    let got = read_scan_file("testfiles/ethane_scan.relaxscanact.dat").unwrap();
    assert_eq!(got.len(), 5);
    assert_eq!(got[0], (1.4, -10.0));
    assert_eq!(got[4], (1.8, -10.1));
}

#[test]
fn read_bad_dat() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.relaxscanact.dat");
    std::fs::write(&path, "1.0 -2.0 3.0\n\n1.1 nan?\n").unwrap();
    assert_eq!(
        read_scan_file(&path),
        Err(ParseError::BadNumber {
            what: "scan data",
            token: "nan?".to_owned()
        })
    );
    std::fs::write(&path, "1.0\n").unwrap();
    assert!(matches!(
        read_scan_file(&path),
        Err(ParseError::ShortLine { .. })
    ));
}

#[test]
fn display() {
    let got: Vec<_> = [Edge, Min, Max, Extremum::None]
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(got, ["edge", "min", "max", ""]);
}
