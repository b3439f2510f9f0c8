//! Parsing of ORCA output files into summary records, convergence histories,
//! and scan trajectories.

pub mod allxyz;
pub mod batch;
pub mod convergence;
pub mod document;
pub mod error;
pub mod field;
pub mod job;
pub mod negfreq;
pub mod report;
pub mod scan;
pub mod section;

#[cfg(test)]
mod tests;

pub use batch::{Batch, BatchReport, Settings};
pub use convergence::Postmortem;
pub use document::LogDocument;
pub use error::{BatchError, ParseError};
pub use job::{JobRecord, JobType, Outcome, classify};

/// kcal/mol per hartree, as used for relative scan energies
pub const KCALHT: f64 = 627.509;

/// call `rayon::ThreadPoolBuilder` to set `num_threads` to `n`. Discards the
/// error returned by `build_global` if the thread pool has already been
/// initialized
pub fn max_threads(n: usize) {
    let _ = rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build_global();
}

/// Something that can answer a yes/no question before an existing file is
/// overwritten. The library never reads from the terminal itself.
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

/// A [Confirm] that always gives the same answer
#[derive(Clone, Copy, Debug)]
pub struct Always(pub bool);

impl Confirm for Always {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}
