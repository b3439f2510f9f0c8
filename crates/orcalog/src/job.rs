use std::{fmt::Display, sync::OnceLock};

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::{
    document::LogDocument,
    error::ParseError,
    field::{extract_f64, nth_field},
    scan::ScanData,
    section::{Case, Direction, Marker, cut_section, find_in},
};


pub(crate) const INPUT_START: &str = "INPUT FILE";
pub(crate) const INPUT_END: &str = "****END OF INPUT****";
const TERMINATED: &str = "****ORCA TERMINATED NORMALLY****";
const RUN_TIME: &str = "TOTAL RUN TIME:";
pub(crate) const FINAL_ENERGY: &str = "FINAL SINGLE POINT ENERGY";
const ENTHALPY: &str = "Total enthalpy";
const FREE_ENERGY: &str = "Final Gibbs free energy";
pub(crate) const HESSIAN: &str = "Writing the Hessian file to the disk";
const NORMAL_MODES: &str = "NORMAL MODES";
const OPT_CONVERGED: &str =
    "***        THE OPTIMIZATION HAS CONVERGED     ***";

/// number of lines between the Hessian notice and the first frequency
pub(crate) const FREQ_OFFSET: usize = 11;

static CELL: OnceLock<[Regex; 3]> = OnceLock::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum JobType {
    Scan,
    Opt,
    OptTS,
    SP,
}

impl JobType {
    /// classify a job from its input echo and lower-cased command line. a
    /// `%geom scan` block takes precedence over the keywords
    fn new<S: AsRef<str>>(echo: &[S], commands: &str) -> Self {
        if find_in(echo, "%geom scan", Direction::Forward, Case::Insensitive)
            .is_some()
        {
            Self::Scan
        } else if commands.contains("optts") {
            Self::OptTS
        } else if commands.contains("opt") {
            Self::Opt
        } else {
            Self::SP
        }
    }

    /// Returns `true` for both kinds of geometry optimization
    #[must_use]
    pub fn is_opt(&self) -> bool {
        matches!(self, Self::Opt | Self::OptTS)
    }
}

impl Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::Scan => write!(f, "scan"),
            JobType::Opt => write!(f, "opt"),
            JobType::OptTS => write!(f, "optTS"),
            JobType::SP => write!(f, "SP"),
        }
    }
}

/// An imaginary vibrational mode, printed by ORCA as a negative frequency
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NegativeFrequency {
    pub mode: usize,
    /// in cm⁻¹
    pub value: f64,
}

/// The summary of a single ORCA job
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JobRecord {
    /// the file name up to the first `.`
    pub molecule: String,

    /// the `!` line of the input, lower-cased
    pub commands: String,

    pub job_type: JobType,

    /// whether `freq` appears in the command line
    pub freq: bool,

    /// `None` if neither a `%pal` block nor a `PALn` keyword gives it
    pub cores: Option<usize>,

    /// cores × wall time in hours, or `None` if the job did not terminate
    /// normally or the core count is unknown
    pub cost: Option<f64>,

    pub energy: Option<f64>,
    pub enthalpy: Option<f64>,
    pub free_energy: Option<f64>,

    pub neg_freqs: Vec<NegativeFrequency>,

    /// whether the optimization converged. only set for optimizations
    pub converged: Option<bool>,

    /// the relaxed scan trajectory, attached after parsing for scan jobs
    pub scan: Option<ScanData>,
}

impl JobRecord {
    /// Build a record from the lines of an ORCA output file. Missing results
    /// (a crashed job, for example) leave the corresponding fields empty, but
    /// a missing input echo or a malformed number is an error.
    pub fn parse(doc: &LogDocument) -> Result<Self, ParseError> {
        let lines = doc.lines();
        let echo = input_echo(lines)?;
        let commands =
            find_in(&echo, "!", Direction::Forward, Case::Sensitive)
                .ok_or(ParseError::MissingField("command line"))?
                .to_lowercase();
        let cores = core_count(&echo, &commands)?;
        if cores.is_none() {
            log::warn!("no core count found in {}", doc.name());
        }
        let freq = commands.contains("freq");
        let job_type = JobType::new(&echo, &commands);

        let (results, cost) = if normal_termination(lines) {
            let results = cut_section(
                lines,
                Some(Marker::EndsWith(INPUT_END)),
                -3,
                Some(Marker::Line(TERMINATED)),
                0,
            )
            .unwrap_or_default();
            let hours = run_hours(lines)?;
            (results, cores.map(|n| n as f64 * hours))
        } else {
            let results = cut_section(
                lines,
                Some(Marker::EndsWith(INPUT_END)),
                -3,
                None,
                0,
            )
            .unwrap_or_default();
            (results, None)
        };

        let mut record = Self {
            molecule: molecule_name(doc.name()).to_owned(),
            commands,
            job_type,
            freq,
            cores,
            cost,
            energy: None,
            enthalpy: None,
            free_energy: None,
            neg_freqs: Vec::new(),
            converged: None,
            scan: None,
        };

        // energies of a scan are per point, not per job
        if job_type == JobType::Scan {
            return Ok(record);
        }

        record.energy = extract_f64(results, FINAL_ENERGY, -1)?;
        if freq {
            record.enthalpy = extract_f64(results, ENTHALPY, -2)?;
            record.free_energy = extract_f64(results, FREE_ENERGY, -2)?;
            record.neg_freqs = negative_frequencies(results)?;
        }
        if job_type.is_opt() {
            record.converged =
                Some(results.iter().any(|l| l.contains(OPT_CONVERGED)));
        }

        Ok(record)
    }
}

/// The result of processing one output file
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Outcome {
    Record(JobRecord),
    /// the file is not a single ORCA job and is left out of the table
    Skipped { file: String, reason: String },
    /// the file looked like a job but could not be parsed
    Failed {
        file: String,
        #[serde(serialize_with = "display")]
        error: ParseError,
    },
}

impl Outcome {
    pub fn record(&self) -> Option<&JobRecord> {
        match self {
            Outcome::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Returns `true` if the outcome is [`Failed`].
    ///
    /// [`Failed`]: Outcome::Failed
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns `true` if the outcome is [`Skipped`].
    ///
    /// [`Skipped`]: Outcome::Skipped
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

fn display<S: Serializer>(e: &ParseError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(e)
}

/// Classify a single document. This never fails: files that are not single
/// jobs are [Outcome::Skipped], and parse errors become [Outcome::Failed].
pub fn classify(doc: &LogDocument) -> Outcome {
    let file = doc.name().to_owned();
    if file.contains("slurm") {
        log::info!("{file} is queue output. Skipping this file.");
        return Outcome::Skipped {
            file,
            reason: "queue output".to_owned(),
        };
    }
    let [multi, ..] = regexes();
    if doc.lines().iter().any(|l| multi.is_match(l)) {
        log::warn!("{file} contains multiple jobs. Skipping this file.");
        return Outcome::Skipped {
            file,
            reason: "contains multiple jobs".to_owned(),
        };
    }
    match JobRecord::parse(doc) {
        Ok(record) => Outcome::Record(record),
        Err(error) => {
            log::warn!("Error with {file}: {error}; Skipping file.");
            Outcome::Failed { file, error }
        }
    }
}

fn regexes() -> &'static [Regex; 3] {
    CELL.get_or_init(|| {
        [
            Regex::new(r"(?i)\$new_job").unwrap(),
            Regex::new(
                r"^TOTAL RUN TIME:\s+(\S+)\s+days\s+(\S+)\s+hours\s+(\S+)\s+minutes\s+(\S+)\s+seconds",
            )
            .unwrap(),
            Regex::new(r"(?:^|\s)pal(\d+)(?:\s|$)").unwrap(),
        ]
    })
}

/// the part of a file name before the first `.`
pub(crate) fn molecule_name(file: &str) -> &str {
    file.split('.').next().unwrap_or(file)
}

/// Return the echoed input lines with the `|  N> ` prefix removed
fn input_echo(lines: &[String]) -> Result<Vec<&str>, ParseError> {
    let echo = cut_section(
        lines,
        Some(Marker::Line(INPUT_START)),
        -3,
        Some(Marker::EndsWith(INPUT_END)),
        0,
    )
    .ok_or(ParseError::MissingSection("input file"))?;
    echo.iter()
        .map(|line| match line.split_once('>') {
            Some((_, rest)) => Ok(rest.trim()),
            None => Err(ParseError::ShortLine {
                what: "input echo",
                line: line.clone(),
            }),
        })
        .collect()
}

/// Read the number of cores from `%pal nprocs N end`, a `%pal` block with
/// `nprocs N` on its own line, or a `PALn` keyword in the lower-cased command
/// line, in that order. Returns `None` if none of them is present
fn core_count(
    echo: &[&str],
    commands: &str,
) -> Result<Option<usize>, ParseError> {
    const WHAT: &str = "%pal nprocs";
    let token = if let Some(line) =
        find_in(echo, WHAT, Direction::Forward, Case::Insensitive)
    {
        nth_field(line, 2)
    } else if let Some(pal) = echo
        .iter()
        .position(|l| l.to_lowercase().starts_with("%pal"))
    {
        find_in(&echo[pal..], "nprocs", Direction::Forward, Case::Insensitive)
            .and_then(|line| nth_field(line, 1))
    } else {
        let [.., keyword] = regexes();
        let Some(caps) = keyword.captures(commands) else {
            return Ok(None);
        };
        let n = &caps[1];
        return n
            .parse()
            .map(Some)
            .map_err(|_| ParseError::bad_number("PAL keyword", n));
    };
    let Some(token) = token else {
        return Err(ParseError::MissingField(WHAT));
    };
    token
        .parse()
        .map(Some)
        .map_err(|_| ParseError::bad_number(WHAT, token))
}

/// ORCA prints the termination banner followed by the run time as the last
/// two lines of the file. trailing blank lines are ignored
fn normal_termination(lines: &[String]) -> bool {
    lines
        .iter()
        .rev()
        .filter(|l| !l.is_empty())
        .take(2)
        .any(|l| l == TERMINATED)
}

/// parse the wall time in hours from a line like
///
/// ```text
/// TOTAL RUN TIME: 0 days 1 hours 30 minutes 0 seconds 412 msec
/// ```
fn run_hours(lines: &[String]) -> Result<f64, ParseError> {
    let [_, time_re, _] = regexes();
    let line = find_in(lines, RUN_TIME, Direction::Reverse, Case::Sensitive)
        .ok_or(ParseError::MissingField(RUN_TIME))?;
    let caps = time_re.captures(line).ok_or(ParseError::ShortLine {
        what: RUN_TIME,
        line: line.to_owned(),
    })?;
    let mut parts = [0.0; 4];
    for (i, part) in parts.iter_mut().enumerate() {
        let s = &caps[i + 1];
        *part = s.parse().map_err(|_| ParseError::bad_number(RUN_TIME, s))?;
    }
    let [days, hours, mins, secs] = parts;
    Ok(24.0 * days + hours + mins / 60.0 + secs / 3600.0)
}

/// parse a line of the vibrational frequency table like
///
/// ```text
/// 6:      -312.45 cm**-1 ***imaginary mode***
/// ```
pub(crate) fn frequency_line(
    line: &str,
) -> Result<NegativeFrequency, ParseError> {
    const WHAT: &str = "vibrational frequency";
    let mut sp = line.split_whitespace();
    let (Some(mode), Some(value)) = (sp.next(), sp.next()) else {
        return Err(ParseError::ShortLine {
            what: WHAT,
            line: line.to_owned(),
        });
    };
    let mode = mode.trim_end_matches(':');
    Ok(NegativeFrequency {
        mode: mode
            .parse()
            .map_err(|_| ParseError::bad_number(WHAT, mode))?,
        value: value
            .parse()
            .map_err(|_| ParseError::bad_number(WHAT, value))?,
    })
}

/// collect the negative entries of the frequency table between the Hessian
/// notice and the normal modes
fn negative_frequencies(
    results: &[String],
) -> Result<Vec<NegativeFrequency>, ParseError> {
    let Some(block) = cut_section(
        results,
        Some(Marker::Contains(HESSIAN)),
        -(FREQ_OFFSET as isize),
        Some(Marker::Contains(NORMAL_MODES)),
        -3,
    ) else {
        return Ok(Vec::new());
    };
    let mut ret = Vec::new();
    for line in block.iter().filter(|l| !l.is_empty()) {
        let freq = frequency_line(line)?;
        if freq.value < 0.0 {
            ret.push(freq);
        }
    }
    Ok(ret)
}
