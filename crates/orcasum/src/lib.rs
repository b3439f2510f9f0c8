//! Command-line front end for summarizing directories of ORCA jobs

use std::io::{BufRead, Write};

use orcalog::Confirm;

pub mod config;

/// Print an error message to stderr and exit with status 1
#[macro_export]
macro_rules! die {
    ($($t:tt)*) => {{
        eprintln!($($t)*);
        std::process::exit(1);
    }};
}

/// Ask questions on the terminal. Only an answer of `y` counts as yes, and a
/// closed stdin counts as no.
#[derive(Clone, Copy, Debug)]
pub struct Stdin;

impl Confirm for Stdin {
    fn confirm(&self, question: &str) -> bool {
        print!(
            "Potential Error: {question}\n\
             Enter 'y' to overwrite, or press any other key to continue\n > "
        );
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(_) => line.trim() == "y",
            Err(_) => false,
        }
    }
}
