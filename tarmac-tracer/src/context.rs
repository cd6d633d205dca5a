//! Execution-state view sampled during register resolution
//!
//! The tracer is handed the fact that a register was written; the value of
//! that write is read back from the core through [`ExecutionContext`].
//! [`CoreState`] is a plain in-memory implementation used by the exporter
//! replay and throughout the tests.

use crate::arch::{self, FloatWidth};

/// Read-only view of the architectural state at commit time
///
/// Implementations expose post-commit values. Flag writes are expected to
/// be folded into the status register by the time entries resolve; the
/// condition-code merge relies on that.
pub trait ExecutionContext {
    /// General-purpose register by canonical index
    fn int_reg(&self, index: u16) -> u64;

    /// Scalar floating-point register, raw bits
    fn float_reg(&self, index: u16) -> u64;

    /// SIMD vector register
    fn vector_reg(&self, index: u16) -> u128;

    /// Predicate register
    fn predicate_reg(&self, index: u16) -> u32;

    /// Current value of one decomposed flag field
    fn cc_flag(&self, index: u16) -> u32;

    /// Control register by misc-register index
    fn misc_reg(&self, index: u16) -> u32;

    /// Width scalar floating-point registers currently resolve at
    fn float_width(&self) -> FloatWidth;
}

/// Array-backed core state
///
/// Flag writes fold into the status register immediately, so reads through
/// [`ExecutionContext`] always see a consistent CPSR. The integer file is
/// sized for the A64 register space; the AArch32 canonical remap only ever
/// reads the low sixteen slots.
#[derive(Debug, Clone)]
pub struct CoreState {
    int_regs: [u64; arch::NUM_A64_INT_SLOTS as usize],
    float_regs: [u64; arch::NUM_FLOAT_REGS as usize],
    vector_regs: [u128; arch::NUM_VECTOR_REGS as usize],
    predicate_regs: [u32; arch::NUM_PREDICATE_REGS as usize],
    misc_regs: [u32; arch::misc::COUNT as usize],
    float_width: FloatWidth,
}

impl CoreState {
    /// Create a zeroed core state
    pub fn new() -> Self {
        Self {
            int_regs: [0; arch::NUM_A64_INT_SLOTS as usize],
            float_regs: [0; arch::NUM_FLOAT_REGS as usize],
            vector_regs: [0; arch::NUM_VECTOR_REGS as usize],
            predicate_regs: [0; arch::NUM_PREDICATE_REGS as usize],
            misc_regs: [0; arch::misc::COUNT as usize],
            float_width: FloatWidth::Single,
        }
    }

    /// Set a general-purpose register by canonical index
    pub fn set_int_reg(&mut self, index: u16, value: u64) {
        self.int_regs[index as usize] = value;
    }

    /// Set a scalar floating-point register, raw bits
    pub fn set_float_reg(&mut self, index: u16, value: u64) {
        self.float_regs[index as usize] = value;
    }

    /// Set a SIMD vector register
    pub fn set_vector_reg(&mut self, index: u16, value: u128) {
        self.vector_regs[index as usize] = value;
    }

    /// Set a predicate register
    pub fn set_predicate_reg(&mut self, index: u16, value: u32) {
        self.predicate_regs[index as usize] = value;
    }

    /// Set a control register by misc-register index
    pub fn set_misc_reg(&mut self, index: u16, value: u32) {
        self.misc_regs[index as usize] = value;
    }

    /// Write one flag field, folding it into the status register
    pub fn set_flag(&mut self, index: u16, value: u32) {
        let (shift, width) = match arch::cc::field(index) {
            Some(field) => field,
            None => panic!("condition flag index {index} out of range"),
        };
        let mask = ((1u32 << width) - 1) << shift;
        let cpsr = &mut self.misc_regs[arch::misc::CPSR as usize];
        *cpsr = (*cpsr & !mask) | ((value << shift) & mask);
    }

    /// Select the width floating-point registers resolve at
    pub fn set_float_width(&mut self, width: FloatWidth) {
        self.float_width = width;
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext for CoreState {
    fn int_reg(&self, index: u16) -> u64 {
        self.int_regs[index as usize]
    }

    fn float_reg(&self, index: u16) -> u64 {
        self.float_regs[index as usize]
    }

    fn vector_reg(&self, index: u16) -> u128 {
        self.vector_regs[index as usize]
    }

    fn predicate_reg(&self, index: u16) -> u32 {
        self.predicate_regs[index as usize]
    }

    fn cc_flag(&self, index: u16) -> u32 {
        let (shift, width) = match arch::cc::field(index) {
            Some(field) => field,
            None => panic!("condition flag index {index} out of range"),
        };
        (self.misc_regs[arch::misc::CPSR as usize] >> shift) & ((1 << width) - 1)
    }

    fn misc_reg(&self, index: u16) -> u32 {
        self.misc_regs[index as usize]
    }

    fn float_width(&self) -> FloatWidth {
        self.float_width
    }
}
