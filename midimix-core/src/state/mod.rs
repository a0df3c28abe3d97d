//! Bridge state owned by the mapping engine.
//!
//! Everything here is plain data mutated from the dispatcher thread only:
//! the bank, the per-strip modes, the cached mixer values of all 24 logical
//! strips, the solo knob triggers and the EQ editor session.

mod eq;
mod strip;
mod trigger;

pub use eq::{select_eq_plugins, EqBinding, EqPhase, EqSession};
pub use strip::StripValues;
pub use trigger::EdgeTrigger;

use midimix_types::{
    Bank, LogicalStrip, Mode, PhysicalStrip, LOGICAL_STRIP_COUNT, STRIPS_PER_BANK,
};

#[derive(Debug, Default)]
pub struct BridgeState {
    bank: Bank,
    modes: [Mode; STRIPS_PER_BANK as usize],
    strips: [StripValues; LOGICAL_STRIP_COUNT as usize],
    master_fader: Option<f32>,
    solo_triggers: [EdgeTrigger; LOGICAL_STRIP_COUNT as usize],
    solo_shift_held: bool,
    pub eq: EqSession,
}

impl BridgeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bank(&self) -> Bank {
        self.bank
    }

    /// Move the bank by `delta` pages. Returns whether the page changed.
    pub fn set_bank(&mut self, delta: i8) -> bool {
        let next = self.bank.shifted(delta);
        if next == self.bank {
            return false;
        }
        self.bank = next;
        true
    }

    pub fn mode(&self, strip: PhysicalStrip) -> Mode {
        self.modes[strip.index()]
    }

    pub fn set_mode(&mut self, strip: PhysicalStrip, mode: Mode) {
        self.modes[strip.index()] = mode;
    }

    /// Flip one strip between MIX and EQ, leaving the others alone.
    pub fn toggle_mode(&mut self, strip: PhysicalStrip) -> Mode {
        let next = self.mode(strip).toggled();
        self.set_mode(strip, next);
        next
    }

    pub fn strips_in(&self, mode: Mode) -> impl Iterator<Item = PhysicalStrip> + '_ {
        PhysicalStrip::all().filter(move |s| self.mode(*s) == mode)
    }

    pub fn any_eq(&self) -> bool {
        self.strips_in(Mode::Eq).next().is_some()
    }

    /// Return every EQ strip to MIX. Returns the strips that changed.
    pub fn revert_all_to_mix(&mut self) -> Vec<PhysicalStrip> {
        let reverted: Vec<_> = self.strips_in(Mode::Eq).collect();
        for strip in &reverted {
            self.set_mode(*strip, Mode::Mix);
        }
        reverted
    }

    /// Logical strip a column addresses in MIX mode on the current bank.
    pub fn logical(&self, strip: PhysicalStrip) -> LogicalStrip {
        strip.logical(self.bank)
    }

    /// Column showing `logical` on the current bank, if any.
    pub fn visible(&self, logical: LogicalStrip) -> Option<PhysicalStrip> {
        logical.physical_in(self.bank)
    }

    pub fn strip(&self, logical: LogicalStrip) -> &StripValues {
        &self.strips[logical.index()]
    }

    pub fn strip_mut(&mut self, logical: LogicalStrip) -> &mut StripValues {
        &mut self.strips[logical.index()]
    }

    pub fn master_fader(&self) -> Option<f32> {
        self.master_fader
    }

    /// Returns false when the value is already cached.
    pub fn set_master_fader(&mut self, value: f32) -> bool {
        if self
            .master_fader
            .map_or(false, |old| (old - value).abs() < f32::EPSILON)
        {
            return false;
        }
        self.master_fader = Some(value);
        true
    }

    /// Solo knob trigger of the logical strip the knob currently addresses.
    pub fn solo_trigger_mut(&mut self, strip: LogicalStrip) -> &mut EdgeTrigger {
        &mut self.solo_triggers[strip.index()]
    }

    pub fn solo_shift_held(&self) -> bool {
        self.solo_shift_held
    }

    pub fn set_solo_shift(&mut self, held: bool) {
        self.solo_shift_held = held;
    }

    /// Forget everything learned from feedback, e.g. when the session closes.
    /// Modes, bank and EQ focus are surface state and survive.
    pub fn reset_caches(&mut self) {
        self.strips = Default::default();
        self.master_fader = None;
        self.eq.forget_values();
    }
}
