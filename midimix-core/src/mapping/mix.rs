//! MIX mode: each column drives its own logical mixer strip.

use super::{Effects, MappingEngine};
use midimix_types::{KnobRow, LogicalStrip, OscArg, OutboundMessage, ParamRange, PhysicalStrip};

pub const TRIM_DB: ParamRange = ParamRange::linear(-20.0, 20.0);
/// The MIDIMIX knob pans left at 127, so the range runs backwards.
pub const PAN: ParamRange = ParamRange::linear(1.0, 0.0);
pub const FADER: ParamRange = ParamRange::linear(0.0, 1.0);

fn strip_message(addr: &str, strip: LogicalStrip, value: OscArg) -> OutboundMessage {
    OutboundMessage::mixer(addr, vec![OscArg::Int(strip.ssid()), value])
}

fn flag(on: bool) -> OscArg {
    OscArg::Int(on as i32)
}

impl MappingEngine {
    pub(super) fn mix_fader(&mut self, strip: PhysicalStrip, value: u8) -> Effects {
        let logical = self.state.logical(strip);
        let gain = FADER.from_midi(value);
        self.state.strip_mut(logical).set_fader(gain);
        let mut effects = Effects::none();
        effects.push_osc(strip_message("/strip/fader", logical, OscArg::Float(gain)));
        effects
    }

    pub(super) fn mix_knob(&mut self, strip: PhysicalStrip, row: KnobRow, value: u8) -> Effects {
        let logical = self.state.logical(strip);
        match row {
            KnobRow::Top => {
                let trim = TRIM_DB.from_midi(value);
                self.state.strip_mut(logical).set_trim_db(trim);
                let mut effects = Effects::none();
                effects.push_osc(strip_message("/strip/trimdB", logical, OscArg::Float(trim)));
                effects
            }
            KnobRow::Middle => self.send_pan(logical, value),
            KnobRow::Bottom => self.solo_knob(logical, value),
        }
    }

    pub(super) fn send_pan(&mut self, logical: LogicalStrip, value: u8) -> Effects {
        let pan = PAN.from_midi(value);
        self.state.strip_mut(logical).set_pan(pan);
        let mut effects = Effects::none();
        effects.push_osc(strip_message(
            "/strip/pan_stereo_position",
            logical,
            OscArg::Float(pan),
        ));
        effects
    }

    /// Knob row 3 as a solo switch. Each logical strip keeps its own trigger.
    pub(super) fn solo_knob(&mut self, logical: LogicalStrip, value: u8) -> Effects {
        let threshold = self.settings.solo_threshold;
        let hysteresis = self.settings.solo_hysteresis;
        let Some(on) = self.state.solo_trigger_mut(logical).update(value, threshold, hysteresis)
        else {
            return Effects::none();
        };
        log::debug!(target: "mapping", "solo strip {} -> {}", logical, on);
        self.state.strip_mut(logical).solo = on;
        let mut effects = Effects::none();
        effects.push_osc(strip_message("/strip/solo", logical, flag(on)));
        effects
    }

    pub(super) fn mix_mute(&mut self, strip: PhysicalStrip) -> Effects {
        let logical = self.state.logical(strip);
        self.toggle_mute(logical)
    }

    /// Flip the cached mute of `logical` and show it wherever it is displayed.
    pub(super) fn toggle_mute(&mut self, logical: LogicalStrip) -> Effects {
        let values = self.state.strip_mut(logical);
        values.mute = !values.mute;
        let on = values.mute;
        let mut effects = Effects::none();
        effects.push_osc(strip_message("/strip/mute", logical, flag(on)));
        effects.merge(self.led_view(&self.mute_leds(logical)));
        effects
    }

    pub(super) fn mix_rec(&mut self, strip: PhysicalStrip) -> Effects {
        let logical = self.state.logical(strip);
        let values = self.state.strip_mut(logical);
        values.rec = !values.rec;
        let on = values.rec;
        let mut effects = Effects::none();
        effects.push_osc(strip_message("/strip/recenable", logical, flag(on)));
        effects.merge(self.led_view(&self.rec_leds(logical)));
        effects
    }
}
