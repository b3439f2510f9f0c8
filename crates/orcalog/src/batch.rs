//! Processing every ORCA output file in a directory

use std::{
    collections::HashMap,
    fs::{read_dir, write},
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use serde::Serialize;

use crate::{
    Confirm,
    allxyz::annotate,
    document::LogDocument,
    error::{BatchError, ParseError},
    job::{JobType, Outcome, classify},
    negfreq::{self, NegativeFrequencyEntry, SCRIPT_NAME},
    report::{available_filename, summary_table, write_csv},
    scan::{ScanData, analyze, read_scan_file},
};


/// Everything a [Batch] needs to know that is not in the output files
/// themselves
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Settings {
    /// the directory to search for `.out` files
    pub dir: PathBuf,

    /// used to name the summary file and in the provenance lines of the
    /// outputs
    pub job_name: String,

    /// the version reported in the provenance lines
    pub version: String,

    /// the number of negative frequencies at which `neg_freqs.sh` is written
    /// as a SLURM batch script instead of a plain script
    pub inline_limit: usize,

    /// shell lines that prepare the environment for `orca_pltvib`
    pub module_lines: Vec<String>,

    /// the time limit requested by the batch version of `neg_freqs.sh`
    pub sbatch_time: String,
}

impl Settings {
    /// Default settings for `dir`, taking the job name from its last
    /// component
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let job_name = dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            dir,
            job_name,
            version: env!("CARGO_PKG_VERSION").to_owned(),
            inline_limit: 10,
            module_lines: vec![
                "module purge".to_owned(),
                "module add orca".to_owned(),
            ],
            sbatch_time: "1:00:00".to_owned(),
        }
    }
}

pub struct Batch {
    settings: Settings,
}

impl Batch {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Classify every `.out` file in the directory in parallel. The only
    /// fatal error is failing to list the directory; problems with individual
    /// files are recorded in their [Outcome].
    pub fn run(self) -> Result<BatchReport, BatchError> {
        let files = self.out_files()?;
        log::info!(
            "processing {} output files in {}",
            files.len(),
            self.settings.dir.display()
        );
        let mut outcomes: Vec<Outcome> =
            files.par_iter().map(|f| process(f)).collect();
        self.attach_scans(&files, &mut outcomes);

        let neg_freqs = outcomes
            .iter()
            .filter_map(Outcome::record)
            .filter(|r| r.freq && r.job_type != JobType::Scan)
            .flat_map(|r| {
                r.neg_freqs.iter().map(|f| NegativeFrequencyEntry {
                    molecule: r.molecule.clone(),
                    mode: f.mode,
                })
            })
            .collect();

        Ok(BatchReport {
            settings: self.settings,
            outcomes,
            neg_freqs,
        })
    }

    /// Attach the scan trajectory to every scan record. Files named alike up
    /// to the first `.` share a molecule name and therefore the same
    /// companion files, so each molecule is read and annotated only once.
    fn attach_scans(&self, files: &[PathBuf], outcomes: &mut [Outcome]) {
        let mut molecules: Vec<String> = outcomes
            .iter()
            .filter_map(Outcome::record)
            .filter(|r| r.job_type == JobType::Scan)
            .map(|r| r.molecule.clone())
            .collect();
        molecules.sort();
        molecules.dedup();
        let scans: HashMap<String, Result<ScanData, ParseError>> = molecules
            .into_par_iter()
            .map(|m| {
                let scan = attach_scan(&self.settings.dir, &m);
                (m, scan)
            })
            .collect();

        for (outcome, path) in outcomes.iter_mut().zip(files) {
            let Outcome::Record(rec) = outcome else {
                continue;
            };
            let error = match scans.get(&rec.molecule) {
                Some(Ok(scan)) => {
                    rec.scan = Some(scan.clone());
                    continue;
                }
                Some(Err(e)) => e.clone(),
                None => continue,
            };
            let file = file_name(path);
            log::warn!("Error with {file}: {error}; Skipping file.");
            *outcome = Outcome::Failed { file, error };
        }
    }

    /// the `.out` files in the directory, sorted by name
    fn out_files(&self) -> Result<Vec<PathBuf>, BatchError> {
        let dir = &self.settings.dir;
        let read_err = |e: std::io::Error| BatchError::ReadDir(dir.clone(), e);
        let mut ret = Vec::new();
        for entry in read_dir(dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            if path.is_file() && path.extension().is_some_and(|e| e == "out") {
                ret.push(path);
            }
        }
        ret.sort();
        Ok(ret)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Load and classify the file at `path`
fn process(path: &Path) -> Outcome {
    let file = file_name(path);
    log::trace!("processing {file}");
    let doc = match LogDocument::load(path) {
        Ok(doc) => doc,
        Err(error) => {
            log::warn!("Error with {file}: {error}; Skipping file.");
            return Outcome::Failed { file, error };
        }
    };
    classify(&doc)
}

/// Read and analyze `<molecule>.relaxscanact.dat` in `dir`. If it exists,
/// also annotate the matching `.allxyz` trajectory
fn attach_scan(dir: &Path, molecule: &str) -> Result<ScanData, ParseError> {
    let file = format!("{molecule}.relaxscanact.dat");
    let path = dir.join(&file);
    if !path.exists() {
        log::warn!("{file} does not exist");
        return Ok(ScanData::Missing { file });
    }
    let points = analyze(&read_scan_file(&path)?)?;

    let allxyz = dir.join(format!("{molecule}.allxyz"));
    if allxyz.exists() {
        if let Err(e) = annotate(molecule, &allxyz, &points) {
            log::warn!("failed to annotate {}: {e}", allxyz.display());
        }
    } else {
        log::warn!("no trajectory found at {}", allxyz.display());
    }

    Ok(ScanData::Found { file, points })
}

/// The collected results of a [Batch]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchReport {
    pub settings: Settings,
    /// one entry per `.out` file, in file name order
    pub outcomes: Vec<Outcome>,
    pub neg_freqs: Vec<NegativeFrequencyEntry>,
}

/// The files written by [BatchReport::write]
#[derive(Clone, Debug, PartialEq)]
pub struct Written {
    pub summary: PathBuf,
    /// `None` if there were no negative frequencies or overwriting an existing
    /// script was refused
    pub script: Option<PathBuf>,
}

impl BatchReport {
    /// Write the summary CSV to the first unused `<job>_summary*.csv` name in
    /// the directory and, if there are any negative frequencies, the
    /// `neg_freqs.sh` script. `confirm` is asked before replacing an existing
    /// script.
    pub fn write(&self, confirm: &dyn Confirm) -> Result<Written, BatchError> {
        let Settings {
            dir,
            job_name,
            version,
            ..
        } = &self.settings;
        let summary =
            available_filename(&dir.join(format!("{job_name}_summary.csv")));
        write_csv(&summary, &summary_table(&self.outcomes, job_name, version))?;
        log::info!("Summary file {} created", summary.display());

        if self.neg_freqs.is_empty() {
            return Ok(Written {
                summary,
                script: None,
            });
        }

        let script = dir.join(SCRIPT_NAME);
        if script.exists()
            && !confirm.confirm(&format!(
                "{SCRIPT_NAME} already exists. Overwrite it with new data?"
            ))
        {
            log::warn!("leaving existing {} untouched", script.display());
            return Ok(Written {
                summary,
                script: None,
            });
        }
        write(&script, negfreq::render(&self.neg_freqs, &self.settings))
            .map_err(|e| BatchError::Write(script.clone(), e))?;
        log::info!("{} written", script.display());

        Ok(Written {
            summary,
            script: Some(script),
        })
    }

    /// Return the number of records, skipped files, and failed files
    pub fn counts(&self) -> (usize, usize, usize) {
        self.outcomes
            .iter()
            .fold((0, 0, 0), |(r, s, f), o| match o {
                Outcome::Record(_) => (r + 1, s, f),
                Outcome::Skipped { .. } => (r, s + 1, f),
                Outcome::Failed { .. } => (r, s, f + 1),
            })
    }
}
