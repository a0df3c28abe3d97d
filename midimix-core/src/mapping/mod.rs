//! Translation between surface gestures and OSC, in both directions.
//!
//! The engine owns the [`BridgeState`] and is pure: every entry point returns
//! the [`Effects`] to apply instead of performing I/O, so the dispatcher decides
//! how sends and LED writes are delivered.

mod eq;
mod feedback;
mod mix;
mod resync;

pub use resync::all_leds_off;

use crate::config::MappingSettings;
use crate::state::BridgeState;
use midimix_types::{
    Button, ControlEvent, Led, Mode, OscArg, OutboundMessage, PhysicalStrip,
    SurfaceUpdate,
};

/// Output of one mapping step.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Effects {
    pub osc: Vec<OutboundMessage>,
    pub surface: Vec<SurfaceUpdate>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.osc.is_empty() && self.surface.is_empty()
    }

    pub fn push_osc(&mut self, msg: OutboundMessage) {
        self.osc.push(msg);
    }

    pub fn push_led(&mut self, led: Led, on: bool) {
        self.surface.push(SurfaceUpdate::Led { led, on });
    }

    pub fn push_fader(&mut self, strip: PhysicalStrip, value: u8) {
        self.surface.push(SurfaceUpdate::Fader { strip, value });
    }

    pub fn merge(&mut self, other: Effects) {
        self.osc.extend(other.osc);
        self.surface.extend(other.surface);
    }
}

pub struct MappingEngine {
    state: BridgeState,
    settings: MappingSettings,
}

impl MappingEngine {
    pub fn new(settings: MappingSettings) -> Self {
        Self {
            state: BridgeState::new(),
            settings,
        }
    }

    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    pub fn handle_control(&mut self, event: ControlEvent) -> Effects {
        match event {
            ControlEvent::ButtonDown(button) => self.button_down(button),
            ControlEvent::ButtonUp(button) => self.button_up(button),
            ControlEvent::Fader { strip, value } => match self.state.mode(strip) {
                Mode::Mix => self.mix_fader(strip, value),
                Mode::Eq => self.eq_fader(strip, value),
            },
            ControlEvent::Knob { strip, row, value } => match self.state.mode(strip) {
                Mode::Mix => self.mix_knob(strip, row, value),
                Mode::Eq => self.eq_knob(strip, row, value),
            },
            ControlEvent::MasterFader { value } => self.master_fader(value),
        }
    }

    fn button_down(&mut self, button: Button) -> Effects {
        match button {
            Button::SoloShift => {
                self.state.set_solo_shift(true);
                return Effects::none();
            }
            Button::Solo(strip) => return self.toggle_mode(strip),
            _ => {}
        }

        if let Some(candidates) = self.state.eq.candidates().map(<[i32]>::to_vec) {
            return match button {
                Button::Rec(strip) if strip.index() < candidates.len() => {
                    self.select_plugin(candidates[strip.index()])
                }
                other => {
                    log::debug!(target: "mapping", "{:?} ignored while selecting an EQ", other);
                    Effects::none()
                }
            };
        }

        match button {
            Button::BankLeft => self.change_bank(-1),
            Button::BankRight => self.change_bank(1),
            Button::Rec(strip) if self.state.solo_shift_held() => {
                log::debug!(target: "mapping", "SOLO + REC {} has no function", strip);
                Effects::none()
            }
            Button::Mute(strip) => match self.state.mode(strip) {
                Mode::Mix => self.mix_mute(strip),
                Mode::Eq => self.eq_mute(strip),
            },
            Button::Rec(strip) => match self.state.mode(strip) {
                Mode::Mix => self.mix_rec(strip),
                Mode::Eq => self.eq_rec_down(strip),
            },
            Button::SoloShift | Button::Solo(_) => Effects::none(),
        }
    }

    fn button_up(&mut self, button: Button) -> Effects {
        match button {
            Button::SoloShift => {
                self.state.set_solo_shift(false);
                Effects::none()
            }
            Button::Rec(strip) if self.state.mode(strip) == Mode::Eq => self.eq_rec_up(strip),
            _ => Effects::none(),
        }
    }

    /// SOLO + MUTE chord: flip one strip between MIX and EQ.
    fn toggle_mode(&mut self, strip: PhysicalStrip) -> Effects {
        let mode = self.state.toggle_mode(strip);
        log::info!(target: "mapping", "strip {} -> {:?}", strip, mode);
        match mode {
            Mode::Eq => self.enter_eq(strip),
            Mode::Mix => {
                if self.state.any_eq() {
                    self.strip_view(strip)
                } else {
                    self.state.eq.clear();
                    self.resync_all()
                }
            }
        }
    }

    fn change_bank(&mut self, delta: i8) -> Effects {
        if !self.state.set_bank(delta) {
            return Effects::none();
        }
        log::info!(target: "mapping", "bank {}", self.state.bank());
        let mut effects = self.resync_all();
        effects.push_osc(OutboundMessage::mixer("/refresh", vec![]));
        effects
    }

    /// The master fader drives the focused strip while an EQ focus exists.
    fn master_fader(&mut self, value: u8) -> Effects {
        let gain = mix::FADER.from_midi(value);
        let mut effects = Effects::none();
        match self.state.eq.focus() {
            Some(focus) => {
                self.state.strip_mut(focus).set_fader(gain);
                effects.push_osc(OutboundMessage::mixer(
                    "/strip/fader",
                    vec![OscArg::Int(focus.ssid()), OscArg::Float(gain)],
                ));
                // The focused strip may also be on screen in MIX mode.
                if let Some(strip) = self.mix_column(focus) {
                    effects.merge(self.fader_view(strip));
                }
            }
            None => {
                self.state.set_master_fader(gain);
                effects.push_osc(OutboundMessage::mixer("/master/fader", vec![OscArg::Float(gain)]));
            }
        }
        effects
    }
}
