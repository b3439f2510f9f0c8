use test_case::test_case;

use super::*;

/// the summary and the postmortem of the same file should agree on the final
/// energy and the convergence state
#[test_case("h2o_opt.out", true)]
#[test_case("ts_optts.out", false)]
fn summary_matches_postmortem(file: &str, converged: bool) {
    let doc = LogDocument::load(format!("testfiles/{file}")).unwrap();
    let rec = JobRecord::parse(&doc).unwrap();
    let pm = Postmortem::track(&doc).unwrap();

    let last = pm.cycles.iter().rev().find_map(|c| c.energy);
    assert_eq!(rec.energy, last);
    assert_eq!(rec.converged, Some(converged));
    assert_eq!(
        rec.neg_freqs.iter().map(|f| f.value).collect::<Vec<_>>(),
        pm.hessians
            .last()
            .map(|h| h.neg_freqs.clone())
            .unwrap_or_default()
    );
}

#[test]
fn always() {
    assert!(Always(true).confirm("overwrite?"));
    assert!(!Always(false).confirm("overwrite?"));
}
