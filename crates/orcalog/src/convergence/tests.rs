use super::*;

fn load(name: &str) -> LogDocument {
    LogDocument::load(format!("testfiles/{name}")).unwrap()
}

#[test]
fn h2o_opt() {
    let got = Postmortem::track(&load("h2o_opt.out")).unwrap();

    assert_eq!(
        got.tolerances,
        Some(Tolerances {
            energy_change: 0.000005,
            rms_gradient: 0.0001,
            max_gradient: 0.0003,
            rms_step: 0.002,
            max_step: 0.004,
        })
    );

    let want = vec![
        ConvergenceRecord {
            cycle: 1,
            scf_steps: Some(6),
            energy: Some(-76.322657702115),
            energy_change: None,
            abs_energy_change: None,
            rms_gradient: Some(0.0089364583),
            max_gradient: Some(0.0124728041),
            rms_step: Some(0.0140239710),
            max_step: Some(0.0206019452),
        },
        ConvergenceRecord {
            cycle: 2,
            scf_steps: Some(5),
            energy: Some(-76.323003381224),
            energy_change: Some(-0.0003456790),
            abs_energy_change: Some(0.0003456790),
            rms_gradient: Some(0.0012345678),
            max_gradient: Some(0.0019876543),
            rms_step: Some(0.0021098765),
            max_step: Some(0.0030123456),
        },
        // the final single point after convergence overwrites the SCF count
        ConvergenceRecord {
            cycle: 3,
            scf_steps: Some(3),
            energy: Some(-76.323010155433),
            energy_change: Some(-0.0000067742),
            abs_energy_change: Some(0.0000067742),
            rms_gradient: Some(0.0000456789),
            max_gradient: Some(0.0000812345),
            rms_step: Some(0.0001234567),
            max_step: Some(0.0001987654),
        },
    ];
    assert_eq!(got.cycles, want);

    assert_eq!(
        got.hessians,
        vec![HessianSnapshot {
            cycle: Some(3),
            neg_freqs: vec![-312.45],
        }]
    );

    assert_eq!(got.tail.len(), 10);
    assert!(got.tail[0].starts_with("ITER"));
    assert_eq!(
        got.tail.last().unwrap(),
        "*****************************************************"
    );
    assert!(got.tail.iter().any(|l| l.contains("SCF CONVERGED AFTER   3")));
}

#[test]
fn crashed_mid_scf() {
    let got = Postmortem::track(&load("ts_optts.out")).unwrap();
    assert_eq!(got.tolerances, None);
    assert_eq!(got.cycles.len(), 2);
    assert_eq!(got.cycles[0].scf_steps, Some(3));
    assert_eq!(got.cycles[0].energy, Some(-153.8960871123));
    assert_eq!(got.cycles[0].energy_change, None);
    assert_eq!(got.cycles[0].rms_gradient, Some(0.0051012841));
    // three iterations were printed before the end of the file
    assert_eq!(
        got.cycles[1],
        ConvergenceRecord {
            cycle: 2,
            scf_steps: Some(3),
            ..Default::default()
        }
    );
    assert!(got.hessians.is_empty());
    assert_eq!(got.tail.len(), 4);
    assert!(got.tail[3].starts_with("2   -153.8993012207"));
}

#[test]
fn no_optimization() {
    let got = Postmortem::track(&load("methane_sp.out")).unwrap();
    assert!(got.cycles.is_empty());
    assert_eq!(got.tolerances, None);
}

#[test]
fn truncated_convergence_table() {
    let doc = LogDocument::new(
        "short.out",
        "
*                GEOMETRY OPTIMIZATION CYCLE   1            *
----------------------|Geometry convergence|-------------------------
Item                value                   Tolerance       Converged
---------------------------------------------------------------------
RMS gradient        0.0089364583            0.0001000000      NO
",
    );
    assert_eq!(
        Postmortem::track(&doc),
        Err(ParseError::MissingField("geometry convergence item"))
    );
}

#[test]
fn bad_cycle_number() {
    let doc =
        LogDocument::new("bad.out", "*   GEOMETRY OPTIMIZATION CYCLE   x   *");
    assert_eq!(
        Postmortem::track(&doc),
        Err(ParseError::BadNumber {
            what: CYCLE,
            token: "x".to_owned()
        })
    );
}

#[test]
fn scf_counts() {
    let lines: Vec<String> = [
        "SCF ITERATIONS",
        "----",
        "ITER  Energy",
        "0   -1.0",
        "1   -1.1",
        "***Turning on DIIS***",
        "2   -1.2",
        "",
        SCF_SEPARATOR,
        "*   SUCCESS   *",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(scf_block(&lines, 0), (Some(3), 8));
    assert_eq!(scf_block(&lines[..3], 0), (None, 3));
}
