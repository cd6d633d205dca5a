//! Facts reported by the executing core at instruction commit
//!
//! The tracer never executes or decodes instructions itself; the host
//! simulator hands it one [`InstructionCommit`] per retired instruction.
//! These are boundary types and serialize with serde so commit streams can
//! be captured and replayed from JSON.

use serde::{Deserialize, Serialize};

use crate::arch::{EncodingSize, InstSet, OperatingMode, RegId};

/// Direction of a memory access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessKind {
    Load,
    Store,
}

/// One memory access issued by an instruction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemAccess {
    /// Access direction
    pub kind: AccessKind,
    /// Target address
    pub addr: u64,
    /// Access size in bytes
    pub size: u8,
    /// Data read or written
    pub data: u64,
}

/// Everything the tracer consumes about one committed instruction
///
/// Register writes carry identity only; the value of each write is sampled
/// from the execution context at resolution time. Both lists preserve the
/// order the instruction issued them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionCommit {
    /// Commit timestamp in simulated ticks
    pub tick: u64,
    /// Program counter of the committed instruction
    pub pc: u64,
    /// Encoded opcode
    pub opcode: u32,
    /// Encoding size class
    pub encoding: EncodingSize,
    /// Instruction-set state
    pub iset: InstSet,
    /// Operating mode at commit
    pub mode: OperatingMode,
    /// True when committed in the secure world
    pub secure: bool,
    /// False when a predicated instruction was architecturally skipped
    pub taken: bool,
    /// Disassembled instruction text
    pub disasm: String,
    /// Registers the instruction wrote, in issue order
    #[serde(default)]
    pub reg_writes: Vec<RegId>,
    /// Memory accesses the instruction issued, in issue order
    #[serde(default)]
    pub mem_accesses: Vec<MemAccess>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::RegClass;

    #[test]
    fn test_commit_round_trips_through_json() {
        let commit = InstructionCommit {
            tick: 500,
            pc: 0x8000,
            opcode: 0xe3a0_0010,
            encoding: EncodingSize::Bits32,
            iset: InstSet::Arm,
            mode: OperatingMode::Supervisor,
            secure: true,
            taken: true,
            disasm: "mov r0, #16".to_string(),
            reg_writes: vec![RegId::new(RegClass::Int, 0)],
            mem_accesses: vec![MemAccess {
                kind: AccessKind::Store,
                addr: 0x1000,
                size: 4,
                data: 0x10,
            }],
        };

        let json = serde_json::to_string(&commit).unwrap();
        let back: InstructionCommit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pc, commit.pc);
        assert_eq!(back.reg_writes, commit.reg_writes);
        assert_eq!(back.mem_accesses.len(), 1);
    }

    #[test]
    fn test_write_lists_default_to_empty() {
        // A commit log row without side effects omits both lists
        let json = r#"{
            "tick": 0,
            "pc": 0,
            "opcode": 0,
            "encoding": "Bits32",
            "iset": "Arm",
            "mode": "User",
            "secure": false,
            "taken": true,
            "disasm": "nop"
        }"#;
        let commit: InstructionCommit = serde_json::from_str(json).unwrap();
        assert!(commit.reg_writes.is_empty());
        assert!(commit.mem_accesses.is_empty());
    }
}
