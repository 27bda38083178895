//! Client-side bookkeeping that has no wire representation of its own: the breakpoint registry
//! and the current step mode, mirroring `d_breakPoints`/`d_mode`/`d_modeReq` on the original.

use std::collections::HashMap;

/// A breakpoint's wire-level key: the method it's in and the IL offset within that method.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BreakpointKey {
    /// The method id the breakpoint is set in.
    pub method_id: u32,
    /// The IL offset within that method.
    pub il_offset: u64,
}

/// Maps breakpoint keys to the debuggee-assigned request id, so repeated `add_breakpoint` calls
/// on the same key are idempotent and `remove_breakpoint` can find the id to clear.
#[derive(Debug, Default)]
pub(super) struct BreakpointRegistry {
    by_key: HashMap<BreakpointKey, u32>,
}

impl BreakpointRegistry {
    /// The stored request id for `key`, if a breakpoint is registered there.
    pub(super) fn get(&self, key: BreakpointKey) -> Option<u32> {
        self.by_key.get(&key).copied()
    }

    /// Registers `key` under `request_id`, overwriting nothing since callers check [`Self::get`]
    /// first to preserve idempotence.
    pub(super) fn insert(&mut self, key: BreakpointKey, request_id: u32) {
        self.by_key.insert(key, request_id);
    }

    /// Removes `key`, returning its request id if present.
    pub(super) fn remove(&mut self, key: BreakpointKey) -> Option<u32> {
        self.by_key.remove(&key)
    }

    /// Drops every entry, mirroring a server-side `clear_all_breakpoints`.
    pub(super) fn clear(&mut self) {
        self.by_key.clear();
    }
}

/// The stepping direction currently armed, or `FreeRun` if no step request is active.
///
/// Identity is depth-only, matching the original's `d_mode`/`RunMode` comparison
/// (`MonoDebugger.cpp`'s `if (d_mode == mode)`, which never looks at step size): two calls that
/// differ only in `StepSize` are the same mode and the second is a no-op resume, not a
/// clear-and-rearm.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepMode {
    /// No STEP event request is active; the debuggee runs freely between other stops.
    FreeRun,
    /// A STEP event request is active with this depth.
    Stepping(super::requests::StepDepth),
}

/// Tracks the single active step request, enforcing that `active_request_id != 0` exactly when
/// `mode != FreeRun`.
#[derive(Debug, Default)]
pub(super) struct StepState {
    mode: Option<super::requests::StepDepth>,
    active_request_id: u32,
}

impl StepState {
    pub(super) fn mode(&self) -> StepMode {
        match self.mode {
            Some(depth) => StepMode::Stepping(depth),
            None => StepMode::FreeRun,
        }
    }

    pub(super) fn active_request_id(&self) -> Option<u32> {
        (self.active_request_id != 0).then_some(self.active_request_id)
    }

    pub(super) fn arm(&mut self, depth: super::requests::StepDepth, request_id: u32) {
        debug_assert_ne!(request_id, 0);
        self.mode = Some(depth);
        self.active_request_id = request_id;
    }

    pub(super) fn clear(&mut self) {
        self.mode = None;
        self.active_request_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::requests::StepDepth;

    #[test]
    fn breakpoint_registry_round_trips_and_is_idempotent_on_removal() {
        let mut reg = BreakpointRegistry::default();
        let key = BreakpointKey {
            method_id: 1,
            il_offset: 10,
        };

        assert_eq!(reg.get(key), None);
        reg.insert(key, 42);
        assert_eq!(reg.get(key), Some(42));

        assert_eq!(reg.remove(key), Some(42));
        assert_eq!(reg.remove(key), None);
    }

    #[test]
    fn step_state_invariant_holds_across_arm_and_clear() {
        let mut step = StepState::default();
        assert_eq!(step.mode(), StepMode::FreeRun);
        assert_eq!(step.active_request_id(), None);

        step.arm(StepDepth::Into, 7);
        assert_eq!(step.mode(), StepMode::Stepping(StepDepth::Into));
        assert_eq!(step.active_request_id(), Some(7));

        step.clear();
        assert_eq!(step.mode(), StepMode::FreeRun);
        assert_eq!(step.active_request_id(), None);
    }

    #[test]
    fn mode_identity_ignores_step_size() {
        let mut step = StepState::default();
        step.arm(StepDepth::Into, 7);
        let mode = step.mode();
        step.clear();
        step.arm(StepDepth::Into, 8);
        assert_eq!(mode, step.mode(), "depth alone should determine mode identity");
    }
}
