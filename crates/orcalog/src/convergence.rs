//! Reconstructing the cycle-by-cycle history of a geometry optimization

use serde::Serialize;

use crate::{
    document::LogDocument,
    error::ParseError,
    field::nth_field,
    job::{FINAL_ENERGY, FREQ_OFFSET, HESSIAN, frequency_line},
};

#[cfg(test)]
mod tests;

const CYCLE: &str = "GEOMETRY OPTIMIZATION CYCLE";
const SCF_ITERATIONS: &str = "SCF ITERATIONS";
const GEOM_CONVERGENCE: &str = "|Geometry convergence|";
const ENERGY_CHANGE: &str = "Energy change";
/// the box ORCA draws around the SCF convergence message
const SCF_SEPARATOR: &str =
    "*****************************************************";

/// One geometry optimization cycle
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ConvergenceRecord {
    pub cycle: usize,
    pub scf_steps: Option<usize>,
    pub energy: Option<f64>,
    /// the energy change reported relative to the previous cycle. the first
    /// cycle has nothing to compare to
    pub energy_change: Option<f64>,
    pub abs_energy_change: Option<f64>,
    pub rms_gradient: Option<f64>,
    pub max_gradient: Option<f64>,
    pub rms_step: Option<f64>,
    pub max_step: Option<f64>,
}

/// The convergence thresholds, in the same order as the items of a
/// [ConvergenceRecord]
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Tolerances {
    pub energy_change: f64,
    pub rms_gradient: f64,
    pub max_gradient: f64,
    pub rms_step: f64,
    pub max_step: f64,
}

/// The negative frequencies found when a Hessian was written during `cycle`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HessianSnapshot {
    /// `None` if the Hessian was computed before the first cycle
    pub cycle: Option<usize>,
    pub neg_freqs: Vec<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Postmortem {
    pub tolerances: Option<Tolerances>,
    pub cycles: Vec<ConvergenceRecord>,
    pub hessians: Vec<HessianSnapshot>,
    /// the lines of the last SCF block, for reading by eye
    pub tail: Vec<String>,
}

impl Postmortem {
    /// Walk forward through `doc` once, opening a new [ConvergenceRecord] at
    /// each optimization cycle and filling it in as the SCF, energy, and
    /// convergence blocks for that cycle go by.
    pub fn track(doc: &LogDocument) -> Result<Self, ParseError> {
        let lines = doc.lines();
        let mut ret = Self::default();
        // bounds of the most recent SCF block
        let mut scf: Option<(usize, usize)> = None;
        for (i, line) in lines.iter().enumerate() {
            if line.contains(CYCLE) {
                let cycle = field(line, 4, CYCLE)?;
                ret.cycles.push(ConvergenceRecord {
                    cycle: cycle
                        .parse()
                        .map_err(|_| ParseError::bad_number(CYCLE, cycle))?,
                    ..Default::default()
                });
            } else if line == SCF_ITERATIONS {
                let (steps, end) = scf_block(lines, i);
                scf = Some((i, end));
                if let Some(cur) = ret.cycles.last_mut() {
                    cur.scf_steps = steps;
                }
            } else if line.contains(FINAL_ENERGY) {
                let energy = number(line, 4, FINAL_ENERGY)?;
                if let Some(cur) = ret.cycles.last_mut() {
                    cur.energy = Some(energy);
                }
            } else if line.contains(GEOM_CONVERGENCE) {
                ret.geometry_convergence(lines, i)?;
            } else if line.contains(HESSIAN) {
                let mut neg_freqs = Vec::new();
                for line in lines
                    .iter()
                    .skip(i + FREQ_OFFSET)
                    .take_while(|l| !l.is_empty())
                {
                    let freq = frequency_line(line)?;
                    if freq.value < 0.0 {
                        neg_freqs.push(freq.value);
                    }
                }
                ret.hessians.push(HessianSnapshot {
                    cycle: ret.cycles.last().map(|c| c.cycle),
                    neg_freqs,
                });
            }
        }

        if let Some((start, mut end)) = scf {
            // take in the summary line after the separator unless the file
            // ended in the middle of the SCF
            if end + 1 < lines.len() {
                end += 1;
            }
            let hi = (end + 3).min(lines.len());
            let lo = (start + 2).min(hi);
            ret.tail = lines[lo..hi].to_vec();
        }

        Ok(ret)
    }

    /// Handle the table following the `|Geometry convergence|` line at
    /// `lines[i]`. The items start three lines below the header, and the
    /// energy change is missing on the first cycle.
    fn geometry_convergence(
        &mut self,
        lines: &[String],
        i: usize,
    ) -> Result<(), ParseError> {
        let item = |n: usize| {
            lines.get(i + 3 + n).map(String::as_str).ok_or(
                ParseError::MissingField("geometry convergence item"),
            )
        };
        let has_energy = item(0)?.starts_with(ENERGY_CHANGE);
        let first = usize::from(has_energy);
        let mut values = [0.0; 4];
        for (n, v) in values.iter_mut().enumerate() {
            *v = number(item(first + n)?, 2, GEOM_CONVERGENCE)?;
        }
        let [rms_gradient, max_gradient, rms_step, max_step] = values;

        let Some(cur) = self.cycles.last_mut() else {
            return Ok(());
        };
        cur.rms_gradient = Some(rms_gradient);
        cur.max_gradient = Some(max_gradient);
        cur.rms_step = Some(rms_step);
        cur.max_step = Some(max_step);
        if has_energy {
            let change = number(item(0)?, 2, GEOM_CONVERGENCE)?;
            cur.energy_change = Some(change);
            cur.abs_energy_change = Some(change.abs());
            if self.tolerances.is_none() {
                let mut tols = [0.0; 5];
                for (n, t) in tols.iter_mut().enumerate() {
                    *t = number(item(n)?, 3, GEOM_CONVERGENCE)?;
                }
                let [
                    energy_change,
                    rms_gradient,
                    max_gradient,
                    rms_step,
                    max_step,
                ] = tols;
                self.tolerances = Some(Tolerances {
                    energy_change,
                    rms_gradient,
                    max_gradient,
                    rms_step,
                    max_step,
                });
            }
        }
        Ok(())
    }
}

/// Return the number of SCF iterations in the block starting at
/// `lines[start]` and the index where the block ends. ORCA counts iterations
/// from zero, so the count is one more than the last iteration number
fn scf_block(lines: &[String], start: usize) -> (Option<usize>, usize) {
    let end = lines[start..]
        .iter()
        .position(|l| l.contains(SCF_SEPARATOR))
        .map_or(lines.len(), |p| start + p);
    let steps = lines[start..end].iter().rev().find_map(|l| {
        let tok = l.split_whitespace().next()?;
        if tok.bytes().all(|b| b.is_ascii_digit()) {
            tok.parse::<usize>().ok().map(|n| n + 1)
        } else {
            None
        }
    });
    (steps, end)
}

fn field<'a>(
    line: &'a str,
    n: isize,
    what: &'static str,
) -> Result<&'a str, ParseError> {
    nth_field(line, n).ok_or_else(|| ParseError::ShortLine {
        what,
        line: line.to_owned(),
    })
}

fn number(line: &str, n: isize, what: &'static str) -> Result<f64, ParseError> {
    let s = field(line, n, what)?;
    s.parse().map_err(|_| ParseError::bad_number(what, s))
}
