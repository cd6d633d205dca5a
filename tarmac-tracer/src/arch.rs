//! Architecture vocabulary shared by the trace pipeline
//!
//! Register classes and identities, index remapping tables, display names,
//! instruction-set states and operating modes, following the AArch32/A64
//! conventions the Tarmac trace format was written against.

use serde::{Deserialize, Serialize};

/// Architectural register classes distinguished by the tracer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegClass {
    /// General-purpose integer registers
    Int,
    /// Scalar floating-point registers
    Float,
    /// SIMD vector registers
    Vector,
    /// Predicate registers
    Predicate,
    /// Decomposed condition flags, merged before emission
    ConditionCode,
    /// Miscellaneous control and status registers
    Misc,
}

impl RegClass {
    /// Short tag used in diagnostic output
    pub fn as_str(&self) -> &'static str {
        match self {
            RegClass::Int => "int",
            RegClass::Float => "float",
            RegClass::Vector => "vec",
            RegClass::Predicate => "pred",
            RegClass::ConditionCode => "cc",
            RegClass::Misc => "misc",
        }
    }
}

/// A register identity: class plus class-relative index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegId {
    /// Register class
    pub class: RegClass,
    /// Index within the class-local register file
    pub index: u16,
}

impl RegId {
    /// Create a register identity
    pub fn new(class: RegClass, index: u16) -> Self {
        Self { class, index }
    }
}

/// Instruction-set state an instruction was fetched in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstSet {
    Arm,
    Thumb,
    A64,
}

impl InstSet {
    /// Tarmac spelling of the instruction-set state
    pub fn as_str(&self) -> &'static str {
        match self {
            InstSet::Arm => "A",
            InstSet::Thumb => "T",
            InstSet::A64 => "A64",
        }
    }
}

/// Encoding size class of a fetched instruction
///
/// Narrow Thumb encodings are 16 bits; ARM, BigThumb and A64 encodings
/// are 32 bits. The opcode field of the instruction line is padded to
/// one hex digit per nibble of the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingSize {
    Bits16,
    Bits32,
}

impl EncodingSize {
    /// Encoding width in bits
    pub fn bits(&self) -> u32 {
        match self {
            EncodingSize::Bits16 => 16,
            EncodingSize::Bits32 => 32,
        }
    }
}

/// Operating mode (CPSR.M[3:0] field, plus the A64 exception levels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatingMode {
    El0t,
    El1t,
    El1h,
    El2t,
    El2h,
    El3t,
    El3h,
    User,
    Fiq,
    Irq,
    Supervisor,
    Monitor,
    Abort,
    Hypervisor,
    Undefined,
    System,
}

impl OperatingMode {
    /// Tarmac spelling of the operating mode
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::El0t => "EL0t",
            OperatingMode::El1t => "EL1t",
            OperatingMode::El1h => "EL1h",
            OperatingMode::El2t => "EL2t",
            OperatingMode::El2h => "EL2h",
            OperatingMode::El3t => "EL3t",
            OperatingMode::El3h => "EL3h",
            OperatingMode::User => "usr",
            OperatingMode::Fiq => "fiq",
            OperatingMode::Irq => "irq",
            OperatingMode::Supervisor => "svc",
            OperatingMode::Monitor => "mon",
            OperatingMode::Abort => "abt",
            OperatingMode::Hypervisor => "hyp",
            OperatingMode::Undefined => "und",
            OperatingMode::System => "sys",
        }
    }
}

/// Architecture version a tracer resolves registers for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchVersion {
    /// AArch32, pre-v8 cores
    V7,
    /// ARMv8 cores: 64-bit integer registers, 128-bit vectors, predicates
    V8,
}

/// Width scalar floating-point registers currently resolve at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloatWidth {
    Single,
    Double,
}

/// Core architectural integer registers visible at any one time (r0-r15)
pub const NUM_CORE_INT_REGS: u16 = 16;

/// Total integer register-file slots, including mode-banked SP/LR copies
pub const NUM_INT_SLOTS: u16 = 26;

/// Integer register-file slots on an A64 core (x0-x30 plus sp)
pub const NUM_A64_INT_SLOTS: u16 = 32;

/// Scalar floating-point registers
pub const NUM_FLOAT_REGS: u16 = 32;

/// SIMD vector registers
pub const NUM_VECTOR_REGS: u16 = 32;

/// Predicate registers
pub const NUM_PREDICATE_REGS: u16 = 16;

/// Stack pointer index within the core integer registers
pub const SP: u16 = 13;

/// Link register index within the core integer registers
pub const LR: u16 = 14;

/// Program counter index within the core integer registers
pub const PC: u16 = 15;

/// Collapse an integer register-file slot onto the architectural register
/// it aliases
///
/// Slots past the core sixteen are the mode-banked SP/LR copies; they read
/// through the current-mode view of r13/r14. Returns `None` for slots
/// outside the register file.
pub fn canonical_int_index(index: u16) -> Option<u16> {
    match index {
        0..=15 => Some(index),
        // Banked SP slots: svc, abt, und, irq, fiq
        16 | 18 | 20 | 22 | 24 => Some(SP),
        // Banked LR slots: svc, abt, und, irq, fiq
        17 | 19 | 21 | 23 | 25 => Some(LR),
        _ => None,
    }
}

/// Display name of an AArch32 core integer register
pub fn int_name(index: u16) -> Option<&'static str> {
    const NAMES: [&str; NUM_CORE_INT_REGS as usize] = [
        "r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9", "r10", "r11", "r12", "sp",
        "lr", "pc",
    ];
    NAMES.get(index as usize).copied()
}

/// Display name of an A64 integer register-file slot
pub fn a64_int_name(index: u16) -> Option<String> {
    match index {
        0..=30 => Some(format!("x{index}")),
        31 => Some("sp".to_string()),
        _ => None,
    }
}

/// Miscellaneous control and status register indices
pub mod misc {
    /// Current program status register, the merge target for flag writes
    pub const CPSR: u16 = 0;
    /// Saved program status register
    pub const SPSR: u16 = 1;
    /// Floating-point status and control register
    pub const FPSCR: u16 = 2;
    /// Floating-point status register
    pub const FPSR: u16 = 3;
    /// Floating-point control register
    pub const FPCR: u16 = 4;
    /// System control register
    pub const SCTLR: u16 = 5;
    /// Translation table base register 0
    pub const TTBR0: u16 = 6;
    /// Vector base address register
    pub const VBAR: u16 = 7;

    /// Number of control registers the tracer knows about
    pub const COUNT: u16 = 8;

    /// Display name of a control register
    pub fn name(index: u16) -> Option<&'static str> {
        const NAMES: [&str; COUNT as usize] = [
            "cpsr", "spsr", "fpscr", "fpsr", "fpcr", "sctlr", "ttbr0", "vbar",
        ];
        NAMES.get(index as usize).copied()
    }
}

/// Decomposed condition-flag indices and their CPSR layout
pub mod cc {
    /// Negative flag
    pub const N: u16 = 0;
    /// Zero flag
    pub const Z: u16 = 1;
    /// Carry flag
    pub const C: u16 = 2;
    /// Overflow flag
    pub const V: u16 = 3;
    /// Saturation flag
    pub const Q: u16 = 4;
    /// Greater-than-or-equal SIMD field
    pub const GE: u16 = 5;

    /// Number of flag fields
    pub const COUNT: u16 = 6;

    /// Display name of a flag field
    pub fn name(index: u16) -> Option<&'static str> {
        const NAMES: [&str; COUNT as usize] = ["n", "z", "c", "v", "q", "ge"];
        NAMES.get(index as usize).copied()
    }

    /// CPSR position of a flag field as (shift, width in bits)
    pub fn field(index: u16) -> Option<(u32, u32)> {
        match index {
            N => Some((31, 1)),
            Z => Some((30, 1)),
            C => Some((29, 1)),
            V => Some((28, 1)),
            Q => Some((27, 1)),
            GE => Some((16, 4)),
            _ => None,
        }
    }
}
