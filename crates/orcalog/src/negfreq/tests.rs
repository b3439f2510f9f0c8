use super::*;

fn settings() -> Settings {
    let mut s = Settings::new("/scratch/job");
    s.version = "0.1.0".to_owned();
    s.module_lines = vec!["module purge".to_owned(), "module add orca".to_owned()];
    s
}

fn entries(n: usize) -> Vec<NegativeFrequencyEntry> {
    (0..n)
        .map(|i| NegativeFrequencyEntry {
            molecule: format!("mol{i}"),
            mode: 6,
        })
        .collect()
}

#[test]
fn inline() {
    let entries = vec![NegativeFrequencyEntry {
        molecule: "h2o_opt".to_owned(),
        mode: 6,
    }];
    let got = render(&entries, &settings());
    assert_eq!(
        got,
        "#!/bin/bash
module purge
module add orca

echo \"There are 1 negative frequencies.
Executing neg_freqs.sh\"

orca_pltvib h2o_opt.hess 6

#This shell file was created with orcasum 0.1.0 and extracted from job/
"
    );
}

#[test]
fn gated_at_limit() {
    let s = settings();
    let below = render(&entries(s.inline_limit - 1), &s);
    assert!(!below.contains("#SBATCH"));

    let got = render(&entries(s.inline_limit), &s);
    assert!(got.starts_with("#!/bin/bash\n#SBATCH -J neg_freqs\n#SBATCH -t 1:00:00\n"));
    assert!(got.contains("if [ -n \"$SLURM_JOB_ID\" ]; then"));
    assert!(got.contains("    module add orca\n"));
    assert!(got.contains("Excessive negative frequencies (10) detected."));
    assert_eq!(got.matches("orca_pltvib").count(), 10);
    assert!(got.contains("orca_pltvib mol9.hess 6\n"));
}

#[test]
fn custom_limit_and_time() {
    let mut s = settings();
    s.inline_limit = 2;
    s.sbatch_time = "4:00:00".to_owned();
    let got = render(&entries(2), &s);
    assert!(got.contains("#SBATCH -t 4:00:00"));
}
