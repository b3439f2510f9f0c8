//! The shell script for visualizing imaginary modes with `orca_pltvib`

use std::fmt::Write;

use serde::Serialize;

use crate::batch::Settings;

#[cfg(test)]
mod tests;

pub const SCRIPT_NAME: &str = "neg_freqs.sh";

/// A single imaginary mode to visualize
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NegativeFrequencyEntry {
    pub molecule: String,
    pub mode: usize,
}

/// Build the `neg_freqs.sh` script for `entries`. With fewer than
/// `settings.inline_limit` entries the script runs `orca_pltvib` directly.
/// Otherwise it is written as a batch script that refuses to run outside of a
/// SLURM allocation.
pub fn render(
    entries: &[NegativeFrequencyEntry],
    settings: &Settings,
) -> String {
    let n = entries.len();
    let pltvib: String = entries.iter().fold(String::new(), |mut s, e| {
        let _ = writeln!(s, "orca_pltvib {}.hess {}", e.molecule, e.mode);
        s
    });
    let footer = format!(
        "#This shell file was created with orcasum {} and extracted from {}/",
        settings.version, settings.job_name
    );

    let mut s = String::from("#!/bin/bash\n");
    if n < settings.inline_limit {
        for line in &settings.module_lines {
            let _ = writeln!(s, "{line}");
        }
        let _ = write!(
            s,
            "
echo \"There are {n} negative frequencies.
Executing {SCRIPT_NAME}\"

{pltvib}
{footer}
"
        );
    } else {
        let _ = write!(
            s,
            "#SBATCH -J neg_freqs
#SBATCH -t {time}
#SBATCH -N 1
#SBATCH --ntasks-per-node=1

#checks if job is running through SLURM
if [ -n \"$SLURM_JOB_ID\" ]; then

",
            time = settings.sbatch_time,
        );
        for line in &settings.module_lines {
            let _ = writeln!(s, "    {line}");
        }
        let _ = write!(
            s,
            "
{pltvib}
else
    echo \"Warning: Excessive negative frequencies ({n}) detected.
Please run this job through SLURM with sbatch {SCRIPT_NAME}\"
    exit 0
fi

{footer}
"
        );
    }
    s
}
