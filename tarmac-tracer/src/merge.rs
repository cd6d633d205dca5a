//! Condition-code reconciliation
//!
//! The trace format carries processor flags as a field of the status
//! register, never as standalone entries. Cores that model flags as
//! separate architectural registers report per-flag writes; this pass
//! collapses them into the single composite entry, synthesizing it when
//! the instruction never wrote the status register explicitly.

use crate::arch::{self, RegClass, RegId};
use crate::context::ExecutionContext;
use crate::entry::RegisterEntry;
use crate::resolver::{build_entry, RegisterResolver};

/// Fold condition-code entries into one composite status entry
///
/// Leaves sequences without flag writes untouched. Otherwise all
/// condition-code entries are dropped, preserving the relative order of
/// the rest; if no explicit status-register entry remains, a fresh one is
/// resolved and appended, so the status change lands after the ordinary
/// register writes the way the format expects.
pub fn merge_cc_entries(
    entries: &mut Vec<RegisterEntry>,
    resolver: &dyn RegisterResolver,
    ctx: &dyn ExecutionContext,
    tick: u64,
) {
    let has_cc = entries
        .iter()
        .any(|entry| entry.reg.class == RegClass::ConditionCode);
    if !has_cc {
        return;
    }

    entries.retain(|entry| entry.reg.class != RegClass::ConditionCode);

    let has_status = entries.iter().any(|entry| {
        entry.reg.class == RegClass::Misc && entry.reg.index == arch::misc::CPSR
    });

    // An explicit status write already carries the folded flags; without
    // one, the folded value is read back out of the context
    if !has_status {
        let reg = RegId::new(RegClass::Misc, arch::misc::CPSR);
        entries.push(build_entry(reg, tick, resolver, ctx));
    }
}
