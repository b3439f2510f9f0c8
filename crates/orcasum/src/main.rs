use std::path::{Path, PathBuf};

use clap::Parser;
use orcalog::{Always, Batch, Confirm, max_threads};
use orcasum::{Stdin, config::Config, die};

/// summarize a directory of ORCA output files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// directory containing the .out files
    #[arg(value_parser, default_value_t = String::from("."))]
    dir: String,

    /// Configuration file. Defaults to orcasum.toml in the job directory if it
    /// exists.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overwrite an existing neg_freqs.sh without asking. Defaults to false.
    #[arg(short, long, default_value_t = false)]
    overwrite: bool,

    /// Set the maximum number of threads to use. Defaults to 0, which means to
    /// use the value from the config file, or as many threads as there are
    /// CPUs.
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Print the results as JSON instead of writing any files. Defaults to
    /// false.
    #[arg(short, long, default_value_t = false)]
    json: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let dir = match Path::new(&args.dir).canonicalize() {
        Ok(d) => d,
        Err(e) => die!("failed to find job directory {} with {e}", args.dir),
    };
    let config = match Config::find(args.config.as_deref(), &dir) {
        Ok(c) => c,
        Err(e) => die!("{e}"),
    };
    log::debug!("{config}");
    max_threads(if args.threads > 0 {
        args.threads
    } else {
        config.threads
    });

    let settings = config.settings(dir, env!("CARGO_PKG_VERSION"));
    let report = match Batch::new(settings).run() {
        Ok(r) => r,
        Err(e) => die!("{e}"),
    };

    if args.json {
        match serde_json::to_string_pretty(&report.outcomes) {
            Ok(s) => println!("{s}"),
            Err(e) => die!("failed to serialize results with {e}"),
        }
        return;
    }

    let confirm: &dyn Confirm = if args.overwrite {
        &Always(true)
    } else {
        &Stdin
    };
    let written = match report.write(confirm) {
        Ok(w) => w,
        Err(e) => die!("{e}"),
    };

    let (records, skipped, failed) = report.counts();
    println!(
        "Summary file {} created with {records} results \
         ({skipped} skipped, {failed} failed).",
        written.summary.display()
    );
    if let Some(script) = written.script {
        println!(
            "{} negative frequencies written to {}",
            report.neg_freqs.len(),
            script.display()
        );
    }
}
