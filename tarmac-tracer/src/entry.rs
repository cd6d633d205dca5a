//! Trace entry types
//!
//! A record is assembled from three entry kinds: one instruction entry,
//! the register entries for every write the instruction performed, and one
//! memory entry per access. Every entry renders itself as a single
//! Tarmac-style text line through [`Printable`].

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

use crate::arch::{EncodingSize, InstSet, OperatingMode, RegId};
use crate::commit::{AccessKind, InstructionCommit, MemAccess};

/// Line-rendering contract shared by all entry kinds
///
/// `prefix` is prepended verbatim to the line. Verbosity 0 renders the
/// canonical Tarmac line; higher levels may append diagnostic detail.
pub trait Printable {
    /// Write this entry as one text line
    fn print(&self, out: &mut dyn io::Write, verbosity: u8, prefix: &str) -> io::Result<()>;
}

/// A resolved register value
///
/// The width follows the register class and the architecture version that
/// resolved the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegValue {
    /// 32-bit value: AArch32 integer, single-precision float, status
    Word(u32),
    /// 64-bit value: A64 integer, double-precision float
    Double(u64),
    /// 128-bit vector value, split in 64-bit halves
    Quad { hi: u64, lo: u64 },
}

impl fmt::Display for RegValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegValue::Word(value) => write!(f, "{value:08x}"),
            RegValue::Double(value) => write!(f, "{value:016x}"),
            RegValue::Quad { hi, lo } => write!(f, "{hi:016x}_{lo:016x}"),
        }
    }
}

/// Identity of one committed instruction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionEntry {
    /// Position in the committed-instruction stream, starting at 1
    pub seq: u64,
    /// Commit timestamp in simulated ticks
    pub tick: u64,
    /// Program counter
    pub pc: u64,
    /// Encoded opcode
    pub opcode: u32,
    /// Encoding size class, controls opcode padding
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
}

impl InstructionEntry {
    /// Build the entry for a committed instruction under sequence number `seq`
    pub fn new(seq: u64, commit: &InstructionCommit) -> Self {
        Self {
            seq,
            tick: commit.tick,
            pc: commit.pc,
            opcode: commit.opcode,
            encoding: commit.encoding,
            iset: commit.iset,
            mode: commit.mode,
            secure: commit.secure,
            taken: commit.taken,
            disasm: commit.disasm.clone(),
        }
    }
}

impl Printable for InstructionEntry {
    fn print(&self, out: &mut dyn io::Write, _verbosity: u8, prefix: &str) -> io::Result<()> {
        // Pad the opcode to one hex digit per nibble of the encoding
        let opcode_width = (self.encoding.bits() / 4) as usize;
        writeln!(
            out,
            "{}{} clk {} ({}) {:08x} {:0width$x} {} {}_{} : {}",
            prefix,
            self.tick,
            if self.taken { "IT" } else { "IS" },
            self.seq,
            self.pc,
            self.opcode,
            self.iset.as_str(),
            self.mode.as_str(),
            if self.secure { "s" } else { "ns" },
            self.disasm,
            width = opcode_width,
        )
    }
}

/// One architectural register write
///
/// Construction establishes identity only and the entry starts invalid; a
/// resolver must fill in name, value and validity afterwards. Entries that
/// never went through a resolver are dropped before emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterEntry {
    /// Register identity
    pub reg: RegId,
    /// Commit timestamp in simulated ticks
    pub tick: u64,
    /// Display name, filled in on resolution
    pub name: String,
    /// Resolved value; meaningless while `valid` is false
    pub value: RegValue,
    /// True once a resolver has updated this entry
    pub valid: bool,
}

impl RegisterEntry {
    /// Create an unresolved entry for `reg`
    pub fn new(reg: RegId, tick: u64) -> Self {
        Self {
            reg,
            tick,
            name: String::new(),
            value: RegValue::Word(0),
            valid: false,
        }
    }
}

impl Printable for RegisterEntry {
    fn print(&self, out: &mut dyn io::Write, verbosity: u8, prefix: &str) -> io::Result<()> {
        write!(out, "{}{} clk R {} {}", prefix, self.tick, self.name, self.value)?;
        if verbosity >= 1 {
            write!(out, " ({})", self.reg.class.as_str())?;
        }
        writeln!(out)
    }
}

/// One memory access, immutable once built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Commit timestamp in simulated ticks
    pub tick: u64,
    /// True for loads, false for stores
    pub load: bool,
    /// Target address
    pub addr: u64,
    /// Access size in bytes
    pub size: u8,
    /// Data read or written
    pub data: u64,
}

impl MemoryEntry {
    /// Build the entry for one issued access
    pub fn new(tick: u64, access: &MemAccess) -> Self {
        Self {
            tick,
            load: access.kind == AccessKind::Load,
            addr: access.addr,
            size: access.size,
            data: access.data,
        }
    }
}

impl Printable for MemoryEntry {
    fn print(&self, out: &mut dyn io::Write, _verbosity: u8, prefix: &str) -> io::Result<()> {
        // Pad the data to one hex digit per nibble of the access
        let data_width = ((self.size as usize) * 2).min(16);
        writeln!(
            out,
            "{}{} clk M{}{} {:08x} {:0width$x}",
            prefix,
            self.tick,
            if self.load { "R" } else { "W" },
            self.size,
            self.addr,
            self.data,
            width = data_width,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::RegClass;

    fn render(entry: &dyn Printable, verbosity: u8, prefix: &str) -> String {
        let mut out = Vec::new();
        entry.print(&mut out, verbosity, prefix).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample_commit() -> InstructionCommit {
        InstructionCommit {
            tick: 100,
            pc: 0x8000,
            opcode: 0xe3a0_0010,
            encoding: EncodingSize::Bits32,
            iset: InstSet::Arm,
            mode: OperatingMode::Supervisor,
            secure: true,
            taken: true,
            disasm: "mov r0, #16".to_string(),
            reg_writes: Vec::new(),
            mem_accesses: Vec::new(),
        }
    }

    #[test]
    fn test_reg_value_display_widths() {
        assert_eq!(RegValue::Word(0x10).to_string(), "00000010");
        assert_eq!(RegValue::Double(0x10).to_string(), "0000000000000010");
        assert_eq!(
            RegValue::Quad { hi: 1, lo: 2 }.to_string(),
            "0000000000000001_0000000000000002"
        );
    }

    #[test]
    fn test_instruction_line_format() {
        let entry = InstructionEntry::new(1, &sample_commit());
        assert_eq!(
            render(&entry, 0, ""),
            "100 clk IT (1) 00008000 e3a00010 A svc_s : mov r0, #16\n"
        );
    }

    #[test]
    fn test_skipped_instruction_marked_is() {
        let mut commit = sample_commit();
        commit.taken = false;
        commit.secure = false;
        let entry = InstructionEntry::new(7, &commit);
        assert_eq!(
            render(&entry, 0, ""),
            "100 clk IS (7) 00008000 e3a00010 A svc_ns : mov r0, #16\n"
        );
    }

    #[test]
    fn test_narrow_encoding_pads_opcode_to_four_digits() {
        let mut commit = sample_commit();
        commit.opcode = 0x2010;
        commit.encoding = EncodingSize::Bits16;
        commit.iset = InstSet::Thumb;
        commit.disasm = "movs r0, #16".to_string();
        let entry = InstructionEntry::new(2, &commit);
        assert_eq!(
            render(&entry, 0, ""),
            "100 clk IT (2) 00008000 2010 T svc_s : movs r0, #16\n"
        );
    }

    #[test]
    fn test_register_line_format() {
        let mut entry = RegisterEntry::new(RegId::new(RegClass::Int, 0), 100);
        entry.name = "r0".to_string();
        entry.value = RegValue::Word(0x10);
        entry.valid = true;
        assert_eq!(render(&entry, 0, ""), "100 clk R r0 00000010\n");
        assert_eq!(render(&entry, 1, ""), "100 clk R r0 00000010 (int)\n");
    }

    #[test]
    fn test_memory_line_format() {
        let access = MemAccess {
            kind: AccessKind::Load,
            addr: 0x1000,
            size: 4,
            data: 0xdead_beef,
        };
        let entry = MemoryEntry::new(100, &access);
        assert_eq!(render(&entry, 0, ""), "100 clk MR4 00001000 deadbeef\n");

        let store = MemAccess {
            kind: AccessKind::Store,
            addr: 0x1004,
            size: 1,
            data: 0x7f,
        };
        let entry = MemoryEntry::new(100, &store);
        assert_eq!(render(&entry, 0, ""), "100 clk MW1 00001004 7f\n");
    }

    #[test]
    fn test_prefix_prepended_verbatim() {
        let entry = InstructionEntry::new(1, &sample_commit());
        let line = render(&entry, 0, "cpu0: ");
        assert!(line.starts_with("cpu0: 100 clk IT"));
    }
}
