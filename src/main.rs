//! Command-line shell for sentential logic.
//!
//! - `sentential eval` - evaluate formulas and truth-value assignments
//! - `sentential prove` - build a natural deduction proof line by line

mod repl;

use anyhow::Context;
use clap::{Parser, Subcommand};
use repl::Repl;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sentential")]
#[command(about = "Evaluate sentential formulas and check natural deduction proofs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Read session lines from a file instead of stdin
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,
    /// Tracing filter such as `debug`; defaults to $SENTENTIAL_LOG, then `warn`
    #[arg(long, global = true)]
    log: Option<String>,
    /// Do not print prompts
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate formulas; `(p : T)` assigns a truth-value to `p`
    Eval,
    /// Build a proof from premises by applying inference rules
    Prove {
        /// Comma separated premises, asked for when absent
        #[arg(short, long)]
        premises: Option<String>,
        /// Print the proof as a numbered listing
        #[arg(short, long)]
        numbered: bool,
    },
}

fn init_tracing(filter: Option<&str>) {
    let filter = filter
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_env("SENTENTIAL_LOG").ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let mut repl = Repl::new(input, io::stdout().lock(), !cli.quiet);

    match cli.command {
        Commands::Eval => repl.evaluator()?,
        Commands::Prove { premises, numbered } => repl.numbered(numbered).prover(premises)?,
    }

    Ok(())
}
