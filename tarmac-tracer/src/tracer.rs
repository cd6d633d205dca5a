//! Trace stream driver

use serde::{Deserialize, Serialize};

use crate::arch::ArchVersion;
use crate::commit::InstructionCommit;
use crate::context::ExecutionContext;
use crate::record::{InstructionSequence, TraceRecord};
use crate::resolver::{ArmV7Resolver, ArmV8Resolver, RegisterResolver};
use crate::sink::TraceSink;
use crate::Result;

/// Tracer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracerConfig {
    /// Architecture version selecting the default resolver
    pub arch: ArchVersion,
    /// Commits before this tick are not traced
    pub start_tick: u64,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            arch: ArchVersion::V7,
            start_tick: 0,
        }
    }
}

/// Drives record assembly for one core's commit stream
///
/// Owns the instruction sequence counter, the register resolver and the
/// output sink. One tracer per simulated core; its stream is independent
/// of any other tracer's.
pub struct TarmacTracer<S: TraceSink> {
    config: TracerConfig,
    resolver: Box<dyn RegisterResolver>,
    sink: S,
    seq: InstructionSequence,
}

impl<S: TraceSink> TarmacTracer<S> {
    /// Create a tracer with the version-default resolver
    pub fn new(config: TracerConfig, sink: S) -> Self {
        let resolver: Box<dyn RegisterResolver> = match config.arch {
            ArchVersion::V7 => Box::new(ArmV7Resolver),
            ArchVersion::V8 => Box::new(ArmV8Resolver),
        };
        tracing::info!(
            "tarmac tracer ready: arch {:?}, start tick {}",
            config.arch,
            config.start_tick
        );
        Self {
            config,
            resolver,
            sink,
            seq: InstructionSequence::new(),
        }
    }

    /// Replace the resolver, keeping counter, configuration and sink
    pub fn with_resolver(mut self, resolver: Box<dyn RegisterResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Assemble and flush the record for one committed instruction
    ///
    /// Commits before the configured start tick are skipped whole and do
    /// not consume a sequence number.
    pub fn record_commit(
        &mut self,
        commit: &InstructionCommit,
        ctx: &dyn ExecutionContext,
    ) -> Result<()> {
        if commit.tick < self.config.start_tick {
            tracing::trace!("commit at tick {} before trace window", commit.tick);
            return Ok(());
        }

        let mut record = TraceRecord::new(commit.tick);
        record.add_instruction_entry(commit, &mut self.seq);
        record.add_register_entries(&commit.reg_writes, self.resolver.as_ref(), ctx);
        record.add_memory_entries(&commit.mem_accesses);
        record.dump(&mut self.sink)
    }

    /// Number of instruction entries emitted so far
    pub fn instructions_traced(&self) -> u64 {
        self.seq.emitted()
    }

    /// Push buffered sink output to its destination
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()
    }

    /// Consume the tracer, returning the sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}
