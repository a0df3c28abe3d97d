use crate::PhysicalStrip;

/// One of the three knob rows above each fader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnobRow {
    Top,
    Middle,
    Bottom,
}

impl KnobRow {
    /// Row from its 1-based number, counted from the top of the surface.
    pub fn from_number(row: u8) -> Option<Self> {
        match row {
            1 => Some(KnobRow::Top),
            2 => Some(KnobRow::Middle),
            3 => Some(KnobRow::Bottom),
            _ => None,
        }
    }
}

/// Buttons on the surface.
///
/// `Solo(strip)` is what the hardware reports for a strip's MUTE button while
/// the global SOLO button (`SoloShift`) is held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Mute(PhysicalStrip),
    Solo(PhysicalStrip),
    Rec(PhysicalStrip),
    SoloShift,
    BankLeft,
    BankRight,
}

/// A decoded surface gesture. Values are 7-bit MIDI (0..=127).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Fader { strip: PhysicalStrip, value: u8 },
    Knob { strip: PhysicalStrip, row: KnobRow, value: u8 },
    ButtonDown(Button),
    ButtonUp(Button),
    MasterFader { value: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_rows_count_from_the_top() {
        assert_eq!(KnobRow::from_number(1), Some(KnobRow::Top));
        assert_eq!(KnobRow::from_number(2), Some(KnobRow::Middle));
        assert_eq!(KnobRow::from_number(3), Some(KnobRow::Bottom));
        assert_eq!(KnobRow::from_number(0), None);
        assert_eq!(KnobRow::from_number(4), None);
    }
}
