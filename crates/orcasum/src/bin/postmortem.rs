use std::path::Path;

use clap::Parser;
use orcalog::{
    LogDocument, Postmortem,
    report::{postmortem_table, write_csv},
};
use orcasum::die;

/// write the geometry and SCF convergence history of an ORCA optimization to
/// <name>_postmortem.csv
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ORCA output file
    #[arg(value_parser)]
    outfile: String,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let doc = match LogDocument::load(&args.outfile) {
        Ok(d) => d,
        Err(e) => die!("{e}"),
    };
    let pm = match Postmortem::track(&doc) {
        Ok(pm) => pm,
        Err(e) => die!("failed to read {}: {e}", args.outfile),
    };
    if pm.cycles.is_empty() {
        log::warn!("no optimization cycles found in {}", args.outfile);
    }

    let path = Path::new(&args.outfile);
    let stem = doc.name().split('.').next().unwrap_or_default();
    let csv = path.with_file_name(format!("{stem}_postmortem.csv"));
    if let Err(e) = write_csv(&csv, &postmortem_table(&pm)) {
        die!("{e}");
    }
    println!("postmortem analysis written to {}", csv.display());
}
