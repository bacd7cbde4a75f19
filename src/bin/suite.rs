use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use perftcheck::board::Backend;
use perftcheck::report;
use perftcheck::suite::{self, SuiteEntry};

#[derive(Parser, Debug)]
#[command(name = "suite", version, about = "Run the reference perft suite and report per-depth results")]
struct Args {
    /// JSON Lines suite file (falls back to $PERFTCHECK_SUITE, then the built-in suite)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Skip expectations deeper than this
    #[arg(long, default_value_t = 4)]
    max_depth: i32,

    /// Rules backend answering legality questions
    #[arg(long, value_enum, default_value_t = Backend::default_backend())]
    backend: Backend,

    /// Print the report as JSON instead of Markdown tables
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let entries: Vec<SuiteEntry> = suite::resolve_suite(args.file.as_deref())
        .context("loading suite")?
        .iter()
        .map(|e| e.up_to(args.max_depth))
        .filter(|e| !e.expected.is_empty())
        .collect();
    let runs: usize = entries.iter().map(|e| e.expected.len()).sum();
    info!("{} positions, {runs} runs on {}", entries.len(), args.backend);

    let pb = if args.quiet { ProgressBar::hidden() } else { ProgressBar::new(runs as u64) };
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}] {msg}")
            .context("progress template")?,
    );
    let report = suite::run_suite_on(args.backend, &entries, |entry, result| {
        pb.set_message(format!("{} depth {}", entry.name, result.depth));
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    if args.json {
        println!("{}", report::json(&report)?);
    } else {
        print!("{}", report::markdown(&report));
    }
    if !report.passed() {
        anyhow::bail!("perft mismatch on backend {}", report.backend);
    }
    Ok(())
}
