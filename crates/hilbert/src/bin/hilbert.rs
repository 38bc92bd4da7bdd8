//! Command-line front-end: prove one target from a set of axiom schemas

use clap::Parser;
use hilbert::json::{SearchReport, SearchResultJson};
use hilbert::{Prover, ProverConfig, ProofResult, STANDARD_AXIOMS};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

/// Search for a Hilbert-style proof of a propositional formula
#[derive(Parser, Debug)]
#[command(name = "hilbert", version, about, long_about = None)]
struct Args {
    /// Formula to prove
    #[arg(short, long)]
    target: String,

    /// Axiom schema (repeatable; defaults to the Łukasiewicz axioms)
    #[arg(short, long = "axiom")]
    axioms: Vec<String>,

    /// Wall-clock budget in milliseconds
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,

    /// Initial size budget for candidates
    #[arg(long)]
    max_len: Option<usize>,

    /// Cap on the number of admitted formulas (0 for no limit)
    #[arg(long)]
    max_known: Option<usize>,

    /// Candidates examined per batch (0 for the whole frontier)
    #[arg(long)]
    batch: Option<usize>,

    /// Do not split the target with the deduction theorem
    #[arg(long)]
    no_deduction: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Write the derivation event log to this file as JSON lines
    #[arg(long)]
    events: Option<PathBuf>,

    /// Collect and report search statistics
    #[arg(long)]
    profile: bool,
}

impl Args {
    fn config(&self) -> ProverConfig {
        let defaults = ProverConfig::default();
        ProverConfig {
            timeout: Duration::from_millis(self.timeout_ms),
            initial_max_len: self.max_len,
            max_known: self.max_known.unwrap_or(defaults.max_known),
            batch_limit: self.batch.unwrap_or(defaults.batch_limit),
            deduction: !self.no_deduction,
            record_events: self.events.is_some(),
            enable_profiling: self.profile,
            ..defaults
        }
    }
}

fn run(args: &Args) -> hilbert::Result<bool> {
    let axioms: Vec<&str> = if args.axioms.is_empty() {
        STANDARD_AXIOMS.to_vec()
    } else {
        args.axioms.iter().map(String::as_str).collect()
    };

    let mut prover = Prover::from_strings(&axioms, &args.target, args.config())?;
    let start = Instant::now();
    let result = prover.prove()?;
    let elapsed = start.elapsed();

    if let Some(proof) = result.proof() {
        prover.verify_proof(proof)?;
    }

    if let Some(path) = &args.events {
        prover.write_event_log(BufWriter::new(File::create(path)?))?;
    }

    if args.json {
        let report = SearchReport {
            target: prover.target().to_string(),
            result: SearchResultJson::new(&result, prover.state.known.len(), elapsed),
            profile: prover.profile(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &result {
            ProofResult::Proved(proof) => {
                println!("Proved {} in {:.3}s", prover.target(), elapsed.as_secs_f64());
                print!("{}", proof);
            }
            exhausted => {
                println!(
                    "No proof of {}: {} after {:.3}s ({} formulas known)",
                    prover.target(),
                    exhausted.status(),
                    elapsed.as_secs_f64(),
                    prover.state.known.len()
                );
            }
        }
        if let Some(profile) = prover.profile() {
            println!("{}", serde_json::to_string_pretty(profile)?);
        }
    }

    Ok(result.is_proved())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
