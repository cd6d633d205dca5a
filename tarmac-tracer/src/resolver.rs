//! Register update resolution
//!
//! A freshly built register entry carries identity only. The resolver
//! fills in its display name, value and validity, with the state lookup
//! dispatched on the register class. Vector and predicate classes are
//! deliberate extension points: the base resolver leaves them untouched so
//! newer architecture versions can support them without changes here.

use crate::arch::{self, FloatWidth, RegClass, RegId};
use crate::context::ExecutionContext;
use crate::entry::{RegisterEntry, RegValue};

/// Class-dispatched register resolution
///
/// `update` is the required second phase of register-entry construction.
/// The per-class methods have sensible defaults and can be overridden one
/// at a time; the vector and predicate defaults do nothing, leaving the
/// entry invalid so it is dropped at emission.
///
/// The per-class methods panic on a class-relative index outside the
/// register file, since that means the reporting simulator is broken.
pub trait RegisterResolver {
    /// Resolve `entry` in place against the core state
    fn update(&self, entry: &mut RegisterEntry, ctx: &dyn ExecutionContext) {
        match entry.reg.class {
            RegClass::Misc => self.update_misc(entry, ctx),
            RegClass::ConditionCode => self.update_cc(entry, ctx),
            RegClass::Float => self.update_float(entry, ctx),
            RegClass::Int => self.update_int(entry, ctx),
            RegClass::Vector => self.update_vector(entry, ctx),
            RegClass::Predicate => self.update_predicate(entry, ctx),
        }
    }

    /// Resolve a control-register write
    fn update_misc(&self, entry: &mut RegisterEntry, ctx: &dyn ExecutionContext) {
        let index = entry.reg.index;
        let name = match arch::misc::name(index) {
            Some(name) => name,
            None => panic!("control register index {index} out of range"),
        };
        entry.name = name.to_string();
        entry.value = RegValue::Word(ctx.misc_reg(index));
        entry.valid = true;
    }

    /// Resolve a decomposed flag write
    fn update_cc(&self, entry: &mut RegisterEntry, ctx: &dyn ExecutionContext) {
        let index = entry.reg.index;
        let name = match arch::cc::name(index) {
            Some(name) => name,
            None => panic!("condition flag index {index} out of range"),
        };
        entry.name = name.to_string();
        entry.value = RegValue::Word(ctx.cc_flag(index));
        entry.valid = true;
    }

    /// Resolve a scalar floating-point write
    fn update_float(&self, entry: &mut RegisterEntry, ctx: &dyn ExecutionContext) {
        let index = entry.reg.index;
        if index >= arch::NUM_FLOAT_REGS {
            panic!("floating-point register index {index} out of range");
        }
        let bits = ctx.float_reg(index);
        match ctx.float_width() {
            FloatWidth::Single => {
                entry.name = format!("s{index}");
                entry.value = RegValue::Word(bits as u32);
            }
            FloatWidth::Double => {
                entry.name = format!("d{index}");
                entry.value = RegValue::Double(bits);
            }
        }
        entry.valid = true;
    }

    /// Resolve a general-purpose register write
    fn update_int(&self, entry: &mut RegisterEntry, ctx: &dyn ExecutionContext) {
        let slot = entry.reg.index;
        // Banked SP/LR slots read through the current-mode view
        let canonical = match arch::canonical_int_index(slot) {
            Some(canonical) => canonical,
            None => panic!("integer register slot {slot} out of range"),
        };
        entry.name = arch::int_name(canonical).unwrap_or_default().to_string();
        entry.value = RegValue::Word(ctx.int_reg(canonical) as u32);
        entry.valid = true;
    }

    /// Extension point for vector registers
    fn update_vector(&self, _entry: &mut RegisterEntry, _ctx: &dyn ExecutionContext) {}

    /// Extension point for predicate registers
    fn update_predicate(&self, _entry: &mut RegisterEntry, _ctx: &dyn ExecutionContext) {}
}

/// Build an entry for `reg` and resolve it in one step
pub fn build_entry(
    reg: RegId,
    tick: u64,
    resolver: &dyn RegisterResolver,
    ctx: &dyn ExecutionContext,
) -> RegisterEntry {
    let mut entry = RegisterEntry::new(reg, tick);
    resolver.update(&mut entry, ctx);
    entry
}

/// Resolver for AArch32, pre-v8 cores
///
/// Integer and status values are 32-bit words; vector and predicate
/// registers are not modelled and their entries stay unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArmV7Resolver;

impl RegisterResolver for ArmV7Resolver {}

/// Resolver for ARMv8 cores
///
/// Fills in the extension points: 64-bit integer registers under their A64
/// names, double-width floats, 128-bit vectors and predicate registers.
/// Control-register and flag handling is shared with the base resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArmV8Resolver;

impl RegisterResolver for ArmV8Resolver {
    fn update_int(&self, entry: &mut RegisterEntry, ctx: &dyn ExecutionContext) {
        let index = entry.reg.index;
        let name = match arch::a64_int_name(index) {
            Some(name) => name,
            None => panic!("integer register slot {index} out of range"),
        };
        entry.name = name;
        entry.value = RegValue::Double(ctx.int_reg(index));
        entry.valid = true;
    }

    fn update_float(&self, entry: &mut RegisterEntry, ctx: &dyn ExecutionContext) {
        let index = entry.reg.index;
        if index >= arch::NUM_FLOAT_REGS {
            panic!("floating-point register index {index} out of range");
        }
        entry.name = format!("d{index}");
        entry.value = RegValue::Double(ctx.float_reg(index));
        entry.valid = true;
    }

    fn update_vector(&self, entry: &mut RegisterEntry, ctx: &dyn ExecutionContext) {
        let index = entry.reg.index;
        if index >= arch::NUM_VECTOR_REGS {
            panic!("vector register index {index} out of range");
        }
        let value = ctx.vector_reg(index);
        entry.name = format!("v{index}");
        entry.value = RegValue::Quad {
            hi: (value >> 64) as u64,
            lo: value as u64,
        };
        entry.valid = true;
    }

    fn update_predicate(&self, entry: &mut RegisterEntry, ctx: &dyn ExecutionContext) {
        let index = entry.reg.index;
        if index >= arch::NUM_PREDICATE_REGS {
            panic!("predicate register index {index} out of range");
        }
        entry.name = format!("p{index}");
        entry.value = RegValue::Word(ctx.predicate_reg(index));
        entry.valid = true;
    }
}
