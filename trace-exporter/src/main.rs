//! Tarmac Trace Exporter
//!
//! Replays a captured JSON commit log through the tracer and writes the
//! resulting Tarmac text trace. Each log row carries the commit facts plus
//! the architectural state changes the instruction caused, so register
//! values resolve against the same post-commit state the simulator saw.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use tarmac_tracer::{
    ArchVersion, CoreState, FloatWidth, InstructionCommit, LineSink, TarmacTracer, TracerConfig,
};

/// Convert a simulator commit log into a Tarmac text trace
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON commit log to replay
    log: PathBuf,

    /// Output file for the trace
    #[arg(short, long, default_value = "out.tarmac")]
    out: PathBuf,

    /// Architecture version: v7 or v8
    #[arg(long, default_value = "v7")]
    arch: String,

    /// Skip commits before this tick
    #[arg(long, default_value = "0")]
    start_tick: u64,

    /// Line verbosity passed to each entry
    #[arg(short, long, default_value = "0")]
    verbosity: u8,

    /// Prefix prepended to every trace line
    #[arg(long, default_value = "")]
    prefix: String,
}

/// One architectural state change, applied before its commit is traced
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum StateUpdate {
    Int { index: u16, value: u64 },
    Float { index: u16, value: u64 },
    Vector { index: u16, hi: u64, lo: u64 },
    Predicate { index: u16, value: u32 },
    Misc { index: u16, value: u32 },
    Flag { index: u16, value: u32 },
    FloatWidth { double: bool },
}

/// One commit log row
#[derive(Debug, Deserialize)]
struct LogRow {
    #[serde(flatten)]
    commit: InstructionCommit,
    #[serde(default)]
    updates: Vec<StateUpdate>,
}

fn apply_update(update: &StateUpdate, state: &mut CoreState) {
    match *update {
        StateUpdate::Int { index, value } => state.set_int_reg(index, value),
        StateUpdate::Float { index, value } => state.set_float_reg(index, value),
        StateUpdate::Vector { index, hi, lo } => {
            state.set_vector_reg(index, ((hi as u128) << 64) | lo as u128)
        }
        StateUpdate::Predicate { index, value } => state.set_predicate_reg(index, value),
        StateUpdate::Misc { index, value } => state.set_misc_reg(index, value),
        StateUpdate::Flag { index, value } => state.set_flag(index, value),
        StateUpdate::FloatWidth { double } => state.set_float_width(if double {
            FloatWidth::Double
        } else {
            FloatWidth::Single
        }),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let arch = match args.arch.as_str() {
        "v7" => ArchVersion::V7,
        "v8" => ArchVersion::V8,
        other => bail!("unknown architecture version: {other} (expected v7 or v8)"),
    };

    let text = fs::read_to_string(&args.log)
        .with_context(|| format!("failed to read commit log: {}", args.log.display()))?;
    let rows: Vec<LogRow> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse commit log: {}", args.log.display()))?;
    tracing::info!("loaded {} commits from {}", rows.len(), args.log.display());

    let out = File::create(&args.out)
        .with_context(|| format!("failed to create trace file: {}", args.out.display()))?;
    let sink = LineSink::new(BufWriter::new(out))
        .with_verbosity(args.verbosity)
        .with_prefix(args.prefix.as_str());

    let config = TracerConfig {
        arch,
        start_tick: args.start_tick,
    };
    let mut tracer = TarmacTracer::new(config, sink);
    let mut state = CoreState::new();

    for row in &rows {
        for update in &row.updates {
            apply_update(update, &mut state);
        }
        tracer
            .record_commit(&row.commit, &state)
            .with_context(|| format!("failed to trace commit at tick {}", row.commit.tick))?;
    }
    tracer.flush().context("failed to flush trace output")?;

    println!(
        "exported {} of {} commits to {}",
        tracer.instructions_traced(),
        rows.len(),
        args.out.display()
    );

    Ok(())
}
