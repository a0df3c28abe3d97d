//! Factory MIDI layout of the AKAI MIDIMIX.
//!
//! ```text
//!            strip:  1   2   3   4   5   6   7   8   master
//! knob row 1 (CC):  16  20  24  28  46  50  54  58
//! knob row 2 (CC):  17  21  25  29  47  51  55  59
//! knob row 3 (CC):  18  22  26  30  48  52  56  60
//! MUTE     (note):   1   4   7  10  13  16  19  22
//! SOLO+MUTE(note):   2   5   8  11  14  17  20  23
//! REC      (note):   3   6   9  12  15  18  21  24
//! fader      (CC):  19  23  27  31  49  53  57  61    62
//! BANK LEFT 25, BANK RIGHT 26, SOLO 27 (notes)
//! ```
//!
//! LEDs sit on the same note numbers as their buttons.

use super::MidiEventKind;
use midimix_types::{clamp_midi, Button, ControlEvent, KnobRow, Led, PhysicalStrip};

pub const FADER_CCS: [u8; 8] = [19, 23, 27, 31, 49, 53, 57, 61];
pub const MASTER_FADER_CC: u8 = 62;
/// First CC of each strip's knob column; rows 2 and 3 follow.
pub const KNOB_BASE_CCS: [u8; 8] = [16, 20, 24, 28, 46, 50, 54, 58];

pub const BANK_LEFT_NOTE: u8 = 25;
pub const BANK_RIGHT_NOTE: u8 = 26;
pub const SOLO_NOTE: u8 = 27;

/// Notes 1..=24 cycle MUTE, SOLO+MUTE, REC per strip.
const STRIP_NOTE_COUNT: u8 = 24;

pub fn mute_note(strip: PhysicalStrip) -> u8 {
    strip.get() * 3 + 1
}

pub fn solo_note(strip: PhysicalStrip) -> u8 {
    strip.get() * 3 + 2
}

pub fn rec_note(strip: PhysicalStrip) -> u8 {
    strip.get() * 3 + 3
}

pub fn led_note(led: Led) -> u8 {
    match led {
        Led::Mute(strip) => mute_note(strip),
        Led::Rec(strip) => rec_note(strip),
        Led::BankLeft => BANK_LEFT_NOTE,
        Led::BankRight => BANK_RIGHT_NOTE,
    }
}

pub fn led_message(led: Led, on: bool) -> [u8; 3] {
    [0x90, led_note(led), if on { 127 } else { 0 }]
}

fn button_for_note(note: u8) -> Option<Button> {
    match note {
        BANK_LEFT_NOTE => Some(Button::BankLeft),
        BANK_RIGHT_NOTE => Some(Button::BankRight),
        SOLO_NOTE => Some(Button::SoloShift),
        1..=STRIP_NOTE_COUNT => {
            let strip = PhysicalStrip::new((note - 1) / 3)?;
            match (note - 1) % 3 {
                0 => Some(Button::Mute(strip)),
                1 => Some(Button::Solo(strip)),
                _ => Some(Button::Rec(strip)),
            }
        }
        _ => None,
    }
}

fn control_for_cc(controller: u8, value: u8) -> Option<ControlEvent> {
    let value = clamp_midi(value);
    if controller == MASTER_FADER_CC {
        return Some(ControlEvent::MasterFader { value });
    }
    if let Some(i) = FADER_CCS.iter().position(|&cc| cc == controller) {
        let strip = PhysicalStrip::new(i as u8)?;
        return Some(ControlEvent::Fader { strip, value });
    }
    KNOB_BASE_CCS.iter().enumerate().find_map(|(i, &base)| {
        let offset = controller.checked_sub(base)?;
        let row = KnobRow::from_number(offset + 1)?;
        let strip = PhysicalStrip::new(i as u8)?;
        Some(ControlEvent::Knob { strip, row, value })
    })
}

/// Translate a raw MIDI message into a surface gesture.
pub fn decode(kind: MidiEventKind) -> Option<ControlEvent> {
    match kind {
        MidiEventKind::NoteOn { note, .. } => button_for_note(note).map(ControlEvent::ButtonDown),
        MidiEventKind::NoteOff { note, .. } => button_for_note(note).map(ControlEvent::ButtonUp),
        MidiEventKind::ControlChange {
            controller, value, ..
        } => control_for_cc(controller, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(i: u8) -> PhysicalStrip {
        PhysicalStrip::new(i).unwrap()
    }

    fn note_on(note: u8) -> MidiEventKind {
        MidiEventKind::NoteOn { channel: 0, note, velocity: 127 }
    }

    fn cc(controller: u8, value: u8) -> MidiEventKind {
        MidiEventKind::ControlChange { channel: 0, controller, value }
    }

    #[test]
    fn strip_buttons_decode() {
        assert_eq!(decode(note_on(1)), Some(ControlEvent::ButtonDown(Button::Mute(strip(0)))));
        assert_eq!(decode(note_on(2)), Some(ControlEvent::ButtonDown(Button::Solo(strip(0)))));
        assert_eq!(decode(note_on(24)), Some(ControlEvent::ButtonDown(Button::Rec(strip(7)))));
        assert_eq!(decode(note_on(22)), Some(ControlEvent::ButtonDown(Button::Mute(strip(7)))));
        assert_eq!(
            decode(MidiEventKind::NoteOff { channel: 0, note: 12 }),
            Some(ControlEvent::ButtonUp(Button::Rec(strip(3))))
        );
    }

    #[test]
    fn global_buttons_decode() {
        assert_eq!(decode(note_on(25)), Some(ControlEvent::ButtonDown(Button::BankLeft)));
        assert_eq!(decode(note_on(26)), Some(ControlEvent::ButtonDown(Button::BankRight)));
        assert_eq!(decode(note_on(27)), Some(ControlEvent::ButtonDown(Button::SoloShift)));
        assert_eq!(decode(note_on(0)), None);
        assert_eq!(decode(note_on(28)), None);
    }

    #[test]
    fn faders_and_knobs_decode() {
        assert_eq!(
            decode(cc(31, 127)),
            Some(ControlEvent::Fader { strip: strip(3), value: 127 })
        );
        assert_eq!(decode(cc(62, 10)), Some(ControlEvent::MasterFader { value: 10 }));
        assert_eq!(
            decode(cc(18, 64)),
            Some(ControlEvent::Knob { strip: strip(0), row: KnobRow::Bottom, value: 64 })
        );
        assert_eq!(
            decode(cc(58, 1)),
            Some(ControlEvent::Knob { strip: strip(7), row: KnobRow::Top, value: 1 })
        );
        assert_eq!(
            decode(cc(47, 5)),
            Some(ControlEvent::Knob { strip: strip(4), row: KnobRow::Middle, value: 5 })
        );
        assert_eq!(decode(cc(1, 5)), None);
        assert_eq!(decode(cc(45, 5)), None);
    }

    #[test]
    fn every_control_cc_is_distinct() {
        let mut seen = std::collections::HashSet::new();
        for cc in FADER_CCS.iter().chain(std::iter::once(&MASTER_FADER_CC)) {
            assert!(seen.insert(*cc));
        }
        for base in KNOB_BASE_CCS {
            for row in 0..3 {
                assert!(seen.insert(base + row));
            }
        }
        assert_eq!(seen.len(), 33);
    }

    #[test]
    fn leds_share_button_notes() {
        assert_eq!(led_message(Led::Mute(strip(0)), true), [0x90, 1, 127]);
        assert_eq!(led_message(Led::Rec(strip(7)), false), [0x90, 24, 0]);
        assert_eq!(led_note(Led::BankRight), 26);
    }
}
