//! # midimix-types
//!
//! Shared type definitions for the MIDIMIX ↔ OSC bridge.
//! Plain data only: strip addressing, control events, OSC message shapes,
//! surface updates and the EQ parameter table. No I/O lives here.

mod control;
mod eq;
mod message;
mod param;

pub use control::{Button, ControlEvent, KnobRow};
pub use eq::{eq_row, EqParam, EqParamKind, EqRow, EqSection};
pub use message::{InboundMessage, Led, OscArg, OscTarget, OutboundMessage, SurfaceUpdate};
pub use param::{clamp_midi, Curve, ParamRange, MIDI_MAX};

use serde::{Deserialize, Serialize};

/// Physical strips on the surface.
pub const STRIPS_PER_BANK: u8 = 8;

/// Number of bank pages the physical strips can be shifted through.
pub const BANK_COUNT: u8 = 3;

/// Logical mixer strips reachable through all banks.
pub const LOGICAL_STRIP_COUNT: u8 = STRIPS_PER_BANK * BANK_COUNT;

/// Index of a physical strip (column) on the surface, 0..8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysicalStrip(u8);

impl PhysicalStrip {
    pub const FIRST: PhysicalStrip = PhysicalStrip(0);
    pub const LAST: PhysicalStrip = PhysicalStrip(STRIPS_PER_BANK - 1);

    /// Returns None for indices past the last column.
    pub fn new(index: u8) -> Option<Self> {
        (index < STRIPS_PER_BANK).then_some(Self(index))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Logical mixer strip this column addresses in MIX mode.
    pub fn logical(self, bank: Bank) -> LogicalStrip {
        LogicalStrip(self.0 + bank.offset())
    }

    pub fn all() -> impl Iterator<Item = PhysicalStrip> {
        (0..STRIPS_PER_BANK).map(PhysicalStrip)
    }
}

impl std::fmt::Display for PhysicalStrip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Printed 1-based, like the labels on the hardware
        write!(f, "{}", self.0 + 1)
    }
}

/// Index of a DAW mixer strip, 0..24.
///
/// Ardour addresses strips by a 1-based surface strip id (`ssid`);
/// use [`LogicalStrip::ssid`] / [`LogicalStrip::from_ssid`] at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalStrip(u8);

impl LogicalStrip {
    pub fn new(index: u8) -> Option<Self> {
        (index < LOGICAL_STRIP_COUNT).then_some(Self(index))
    }

    pub fn from_ssid(ssid: i32) -> Option<Self> {
        if ssid < 1 {
            return None;
        }
        u8::try_from(ssid - 1).ok().and_then(Self::new)
    }

    pub fn ssid(self) -> i32 {
        self.0 as i32 + 1
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The column showing this strip in the given bank, if it is on that page.
    pub fn physical_in(self, bank: Bank) -> Option<PhysicalStrip> {
        self.0
            .checked_sub(bank.offset())
            .and_then(PhysicalStrip::new)
    }
}

impl std::fmt::Display for LogicalStrip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ssid())
    }
}

/// Bank page, always within 0..BANK_COUNT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bank(u8);

impl Bank {
    /// Clamps out-of-range pages to the last bank.
    pub fn new(page: u8) -> Self {
        Self(page.min(BANK_COUNT - 1))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// First logical strip on this page.
    pub fn offset(self) -> u8 {
        self.0 * STRIPS_PER_BANK
    }

    /// Move by `delta` pages, clamped to the valid range.
    pub fn shifted(self, delta: i8) -> Self {
        let page = (self.0 as i16 + delta as i16).clamp(0, (BANK_COUNT - 1) as i16);
        Self(page as u8)
    }
}

impl std::fmt::Display for Bank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a physical strip's controls drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Mix,
    Eq,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Mix => Mode::Eq,
            Mode::Eq => Mode::Mix,
        }
    }
}

/// Which meaning wins on the strip-8 MUTE button while it is in EQ mode.
///
/// The EQ table assigns it to "Highshelf enable", but the focused strip's MIX
/// mute also needs a home while the surface edits an EQ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossModePolicy {
    /// MUTE 8 is Highshelf enable only; MIX mute moves to REC 8.
    #[default]
    EqWins,
    /// MUTE 8 toggles Highshelf enable and MIX mute together; REC 8 is inert.
    DualPurpose,
}
