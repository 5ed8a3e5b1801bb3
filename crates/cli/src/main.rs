//! Memory hierarchy simulator CLI.
//!
//! This binary replays instruction traces through the simulated translation path. It performs:
//! 1. **Run:** Parse a trace file, replay it, stream the access log, and print statistics.
//! 2. **Config:** Print the effective configuration as JSON, as a starting point for `--config`.
//!
//! Debug logging (faults, evictions, write-backs) goes to stderr through
//! `tracing`; the access log and the report go to stdout.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vmsim_core::common::{ConfigError, TraceError};
use vmsim_core::config::Config;
use vmsim_core::sim::{Simulator, trace};
use vmsim_core::soc::memory::log::{AccessEvent, AccessSink};
use vmsim_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "vmsim",
    author,
    version,
    about = "Two-level TLB, page table and swap latency simulator",
    long_about = "Replay a trace of reads and writes through a two-level TLB, a page table, DRAM and disk.\n\nTrace lines look like `R 1f00` or `W 0x7fff0010`.\n\nExamples:\n  vmsim run traces/seq.txt\n  vmsim run traces/seq.txt --config small.json --quiet\n  vmsim config > small.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter for stderr diagnostics (overridden by RUST_LOG).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay an instruction trace.
    Run {
        /// Instruction file, one `<R|W> <hex address>` per line.
        trace: PathBuf,

        /// JSON configuration file; missing fields use defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Suppress the per-access log.
        #[arg(short, long)]
        quiet: bool,

        /// Statistics sections to print (default: all).
        #[arg(long, value_delimiter = ',', value_parser = clap::builder::PossibleValuesParser::new(STATS_SECTIONS))]
        sections: Vec<String>,

        /// Print statistics as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as JSON.
    Config {
        /// JSON configuration file to merge over the defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Failures surfaced to the user.
#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read config {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error("cannot encode statistics: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),
}

/// Streams access events to stdout as `[time] R DRAM[addr]` lines.
struct StdoutSink {
    out: BufWriter<io::Stdout>,
    failed: bool,
}

impl StdoutSink {
    fn new() -> Self {
        Self {
            out: BufWriter::new(io::stdout()),
            failed: false,
        }
    }
}

impl AccessSink for StdoutSink {
    fn record(&mut self, event: &AccessEvent) {
        // A closed pipe stops the log, not the simulation.
        if !self.failed && writeln!(self.out, "{event}").is_err() {
            self.failed = true;
        }
    }
}

impl Drop for StdoutSink {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result = match cli.command {
        Commands::Run {
            trace,
            config,
            quiet,
            sections,
            json,
        } => cmd_run(&trace, config.as_deref(), quiet, &sections, json),
        Commands::Config { config } => cmd_config(config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path).map_err(|source| CliError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Config::from_json_str(&text)?)
}

/// Replays `trace_path` and prints the report.
fn cmd_run(
    trace_path: &Path,
    config_path: Option<&Path>,
    quiet: bool,
    sections: &[String],
    json: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let mut sim = if quiet || !config.general.log_accesses {
        Simulator::new(&config)?
    } else {
        Simulator::with_sink(&config, Box::new(StdoutSink::new()))?
    };

    let layout = sim.layout();
    info!(
        virtual_bits = layout.virtual_bits(),
        page_bits = layout.page_bits(),
        dram_bits = layout.dram_bits(),
        disk_bits = layout.disk_bits(),
        page_size = layout.page_size(),
        total_pages = layout.total_pages(),
        dram_frames = layout.dram_frames(),
        "system properties"
    );

    let reader = trace::open(trace_path)?;
    let executed = sim.run_trace(reader)?;
    info!(executed, "trace replayed");

    let stats = sim.stats();
    // Dropping the simulator flushes the access log ahead of the report.
    drop(sim);

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &stats)?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", stats.render_sections(sections))?;
    }
    Ok(())
}

/// Prints the effective configuration.
fn cmd_config(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let _ = config.validate()?;
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &config)?;
    writeln!(stdout)?;
    Ok(())
}
