//! Tarmac Tracer - Instruction-trace record assembly for simulated ARM cores
//!
//! This crate turns the per-instruction facts reported by a simulated core
//! into ordered, Tarmac-style trace records and hands them to an output sink.
//!
//! # Overview
//!
//! For every committed instruction the tracer captures:
//!
//! * One instruction entry carrying the sequence number, program counter,
//!   opcode, instruction-set state, operating mode and security state
//! * One register entry per reported write, resolved per register class,
//!   with decomposed condition-flag writes folded into a single status
//!   register entry
//! * One memory entry per issued access, in issue order
//!
//! Register values are sampled from the core through [`ExecutionContext`];
//! the tracer never executes or decodes instructions itself.
//!
//! # Usage
//!
//! ```
//! use tarmac_tracer::{
//!     AccessKind, ArchVersion, CoreState, EncodingSize, InstSet, InstructionCommit, LineSink,
//!     MemAccess, OperatingMode, RegClass, RegId, TarmacTracer, TracerConfig,
//! };
//!
//! // One committed load: r1 <- [0x1000]
//! let mut state = CoreState::new();
//! state.set_int_reg(1, 0x42);
//!
//! let commit = InstructionCommit {
//!     tick: 100,
//!     pc: 0x8000,
//!     opcode: 0xe591_1000,
//!     encoding: EncodingSize::Bits32,
//!     iset: InstSet::Arm,
//!     mode: OperatingMode::Supervisor,
//!     secure: false,
//!     taken: true,
//!     disasm: "ldr r1, [r1]".to_string(),
//!     reg_writes: vec![RegId::new(RegClass::Int, 1)],
//!     mem_accesses: vec![MemAccess {
//!         kind: AccessKind::Load,
//!         addr: 0x1000,
//!         size: 4,
//!         data: 0x42,
//!     }],
//! };
//!
//! let config = TracerConfig { arch: ArchVersion::V7, start_tick: 0 };
//! let mut tracer = TarmacTracer::new(config, LineSink::new(Vec::new()));
//! tracer.record_commit(&commit, &state).unwrap();
//!
//! let trace = String::from_utf8(tracer.into_sink().into_inner()).unwrap();
//! assert!(trace.contains("R r1 00000042"));
//! assert!(trace.contains("MR4 00001000 00000042"));
//! ```
//!
//! # Limitations
//!
//! * Vector and predicate registers only resolve under the v8 resolver;
//!   the base resolver drops their entries, matching its AArch32 scope.
//! * Output is the line-oriented Tarmac text format. There is no binary
//!   encoding of records.
//! * One tracer serves one core. Hosts simulating several cores run one
//!   tracer and one sink per core; interleaving streams is their concern.

pub mod arch;
pub mod commit;
pub mod context;
pub mod entry;
pub mod error;
pub mod merge;
pub mod record;
pub mod resolver;
pub mod sink;
pub mod tracer;

pub use arch::{ArchVersion, EncodingSize, FloatWidth, InstSet, OperatingMode, RegClass, RegId};
pub use commit::{AccessKind, InstructionCommit, MemAccess};
pub use context::{CoreState, ExecutionContext};
pub use entry::{InstructionEntry, MemoryEntry, Printable, RegValue, RegisterEntry};
pub use error::TraceError;
pub use merge::merge_cc_entries;
pub use record::{InstructionSequence, TraceRecord};
pub use resolver::{build_entry, ArmV7Resolver, ArmV8Resolver, RegisterResolver};
pub use sink::{LineSink, TraceSink};
pub use tracer::{TarmacTracer, TracerConfig};

/// Result type for trace emission
pub type Result<T> = std::result::Result<T, TraceError>;
