//! CSV tables for the batch summary and the convergence postmortem

use std::path::{Path, PathBuf};

use crate::{
    convergence::Postmortem,
    error::BatchError,
    job::{JobRecord, JobType, Outcome},
    scan::ScanData,
};


pub type Row = Vec<String>;

const SUMMARY_HEADER: [&str; 10] = [
    "molecule name",
    "command line",
    "job type",
    "freq?",
    "cost (cpu*hr)",
    "E (a.u.)",
    "H (a.u.)",
    "G (a.u.)",
    "neg freq (cm^-1)",
    "geom converged?",
];

const SCAN_HEADER: [&str; 5] = [
    "coordinate",
    "abs energy (a.u.)",
    "rel energy (kcal/mol)",
    "step (kcal/mol)",
    "type",
];

const CONVERGENCE_ITEMS: [&str; 5] = [
    "abs Energy Change",
    "RMS Gradient",
    "MAX Gradient",
    "RMS Step",
    "MAX Step",
];

/// format a float the way it would look in the output file, always with a
/// decimal point
pub fn float(x: f64) -> String {
    let s = x.to_string();
    if x.is_finite() && !s.contains('.') {
        s + ".0"
    } else {
        s
    }
}

fn opt_float(x: Option<f64>) -> String {
    x.map(float).unwrap_or_default()
}

fn boolean(b: bool) -> String {
    let s = if b { "True" } else { "False" };
    s.to_owned()
}

fn row<I, S>(cells: I) -> Row
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    cells.into_iter().map(Into::into).collect()
}

/// A row with a single empty cell, used to separate blocks
fn blank() -> Row {
    vec![String::new()]
}

fn record_row(rec: &JobRecord) -> Row {
    let scan = rec.job_type == JobType::Scan;
    let neg_freqs = if rec.freq && !scan {
        let values: Vec<String> =
            rec.neg_freqs.iter().map(|f| float(f.value)).collect();
        format!("[{}]", values.join(", "))
    } else {
        String::new()
    };
    vec![
        rec.molecule.clone(),
        rec.commands.clone(),
        rec.job_type.to_string(),
        if scan { String::new() } else { boolean(rec.freq) },
        rec.cost.map_or_else(|| "N/A".to_owned(), float),
        opt_float(rec.energy),
        opt_float(rec.enthalpy),
        opt_float(rec.free_energy),
        neg_freqs,
        rec.converged.map(boolean).unwrap_or_default(),
    ]
}

fn scan_rows(scan: &ScanData) -> Vec<Row> {
    match scan {
        ScanData::Found { file, points } => {
            let mut ret =
                vec![blank(), vec![file.clone()], row(SCAN_HEADER)];
            ret.extend(points.iter().map(|p| {
                vec![
                    float(p.coordinate),
                    float(p.energy),
                    float(p.relative),
                    opt_float(p.step),
                    p.kind.to_string(),
                ]
            }));
            ret
        }
        ScanData::Missing { file } => {
            vec![vec![format!("{file} does not exist")], blank()]
        }
    }
}

/// Build the summary table: an info row, the header, one row per parsed or
/// failed file, and then one sub-table per scan. Skipped files do not appear.
pub fn summary_table(
    outcomes: &[Outcome],
    job_name: &str,
    version: &str,
) -> Vec<Row> {
    let mut ret = vec![
        vec![format!(
            "This table was compiled with orcasum {version} \
             and extracted from {job_name}/"
        )],
        row(SUMMARY_HEADER),
    ];
    let mut scans = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Record(rec) => {
                ret.push(record_row(rec));
                if let Some(scan) = &rec.scan {
                    scans.extend(scan_rows(scan));
                }
            }
            Outcome::Failed { file, error } => ret.push(vec![format!(
                "Error with {file}: {error}; Skipping file."
            )]),
            Outcome::Skipped { .. } => {}
        }
    }
    ret.extend(scans);
    ret
}

/// Build the postmortem table: the tolerances, one row per optimization
/// cycle, the negative frequencies at each Hessian, and the last SCF block.
/// The tolerances are offset by four columns to line up with the cycle rows.
pub fn postmortem_table(pm: &Postmortem) -> Vec<Row> {
    const PAD: [&str; 4] = [""; 4];
    let mut ret = vec![
        row(PAD.iter().copied().chain(["Tolerances"])),
        row(PAD.iter().copied().chain(CONVERGENCE_ITEMS)),
    ];
    if let Some(t) = &pm.tolerances {
        ret.push(row(PAD.iter().map(|s| s.to_string()).chain(
            [
                t.energy_change,
                t.rms_gradient,
                t.max_gradient,
                t.rms_step,
                t.max_step,
            ]
            .map(float),
        )));
    }

    ret.push(blank());
    ret.push(row(["Convergence Data"]));
    ret.push(row(
        ["Iteration", "SCF Steps", "Energy", "rel Energy Change"]
            .into_iter()
            .chain(CONVERGENCE_ITEMS),
    ));
    for c in &pm.cycles {
        ret.push(vec![
            c.cycle.to_string(),
            c.scf_steps.map(|n| n.to_string()).unwrap_or_default(),
            opt_float(c.energy),
            opt_float(c.energy_change),
            opt_float(c.abs_energy_change),
            opt_float(c.rms_gradient),
            opt_float(c.max_gradient),
            opt_float(c.rms_step),
            opt_float(c.max_step),
        ]);
    }

    ret.push(blank());
    ret.push(row(["Negative Frequencies"]));
    ret.push(row(["Iteration", "Negative Frequencies"]));
    for h in &pm.hessians {
        let freqs: Vec<String> =
            h.neg_freqs.iter().copied().map(float).collect();
        ret.push(vec![
            h.cycle.map(|c| c.to_string()).unwrap_or_default(),
            format!("[{}]", freqs.join(", ")),
        ]);
    }

    ret.push(blank());
    ret.push(row(["last SCF data"]));
    for line in &pm.tail {
        if line.is_empty() {
            ret.push(blank());
        } else if line.starts_with('*') {
            ret.push(vec![line.clone()]);
        } else {
            ret.push(row(line.split_whitespace()));
        }
    }
    ret
}

/// Write `rows` to `path` as CSV. Rows may have different lengths.
pub fn write_csv(path: &Path, rows: &[Row]) -> Result<(), BatchError> {
    let csv_err = |e: csv::Error| BatchError::Csv(path.to_owned(), e);
    let mut w = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    for r in rows {
        w.write_record(r).map_err(csv_err)?;
    }
    w.flush()
        .map_err(|e| BatchError::Write(path.to_owned(), e))?;
    Ok(())
}

/// Return `path` if nothing exists there yet, otherwise the first of
/// `stem_1.ext`, `stem_2.ext`, ... that is unused
pub fn available_filename(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_owned();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (1..)
        .map(|n| path.with_file_name(format!("{stem}_{n}{ext}")))
        .find(|p| !p.exists())
        .unwrap_or_else(|| path.to_owned())
}
