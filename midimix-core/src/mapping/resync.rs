use super::{mix, Effects, MappingEngine};
use midimix_types::{
    eq_row, CrossModePolicy, EqParam, EqParamKind, Led, LogicalStrip, Mode, PhysicalStrip,
};

/// Every LED the bridge drives.
fn all_leds() -> impl Iterator<Item = Led> {
    PhysicalStrip::all()
        .flat_map(|s| [Led::Mute(s), Led::Rec(s)])
        .chain([Led::BankLeft, Led::BankRight])
}

/// Darken the whole surface.
pub fn all_leds_off() -> Effects {
    let mut effects = Effects::none();
    for led in all_leds() {
        effects.push_led(led, false);
    }
    effects
}

impl MappingEngine {
    /// What an LED should show for the current state.
    pub fn led_state(&self, led: Led) -> bool {
        let state = &self.state;
        match led {
            Led::BankLeft => state.bank().get() == 1,
            Led::BankRight => state.bank().get() == 2,
            Led::Mute(strip) => match state.mode(strip) {
                Mode::Mix => state.strip(state.logical(strip)).mute,
                Mode::Eq => state.eq.flag(eq_row(strip).mute),
            },
            Led::Rec(strip) => {
                if let Some(candidates) = state.eq.candidates() {
                    return strip.index() < candidates.len();
                }
                match state.mode(strip) {
                    Mode::Mix => state.strip(state.logical(strip)).rec,
                    Mode::Eq => match eq_row(strip).rec {
                        Some(param) => state.eq.flag(param),
                        None => {
                            self.focus_mute_column() == Some(strip)
                                && state.eq.focus().map_or(false, |f| state.strip(f).mute)
                        }
                    },
                }
            }
        }
    }

    /// Fader position a column should show, if its value is known.
    pub fn fader_state(&self, strip: PhysicalStrip) -> Option<u8> {
        let state = &self.state;
        match state.mode(strip) {
            Mode::Mix => state
                .strip(state.logical(strip))
                .fader
                .map(|v| mix::FADER.to_midi(v)),
            Mode::Eq => {
                let param = eq_row(strip).fader?;
                let value = state.eq.value(param)?;
                match param.kind() {
                    EqParamKind::Continuous(range) => Some(range.to_midi(value)),
                    _ => None,
                }
            }
        }
    }

    pub(super) fn fader_view(&self, strip: PhysicalStrip) -> Effects {
        let mut effects = Effects::none();
        if let Some(value) = self.fader_state(strip) {
            effects.push_fader(strip, value);
        }
        effects
    }

    /// LEDs and fader of one column.
    pub(super) fn strip_view(&self, strip: PhysicalStrip) -> Effects {
        let mut effects = self.led_view(&[Led::Mute(strip), Led::Rec(strip)]);
        effects.merge(self.fader_view(strip));
        effects
    }

    pub fn bank_leds(&self) -> Effects {
        self.led_view(&[Led::BankLeft, Led::BankRight])
    }

    /// Redraw the whole surface from the caches.
    pub fn resync_all(&self) -> Effects {
        let mut effects = Effects::none();
        for strip in PhysicalStrip::all() {
            effects.merge(self.strip_view(strip));
        }
        effects.merge(self.bank_leds());
        effects
    }

    /// Column showing `logical` with its MIX mapping, if any.
    pub(super) fn mix_column(&self, logical: LogicalStrip) -> Option<PhysicalStrip> {
        self.state
            .visible(logical)
            .filter(|s| self.state.mode(*s) == Mode::Mix)
    }

    /// Column whose REC button carries the focused strip's mute under `eq-wins`.
    pub(super) fn focus_mute_column(&self) -> Option<PhysicalStrip> {
        let strip = PhysicalStrip::LAST;
        let active = self.settings.cross_mode == CrossModePolicy::EqWins
            && self.state.mode(strip) == Mode::Eq
            && self.state.eq.focus().is_some()
            && !self.state.eq.is_selecting();
        active.then_some(strip)
    }

    /// LEDs currently showing the mute state of `logical`.
    pub(super) fn mute_leds(&self, logical: LogicalStrip) -> Vec<Led> {
        let mut leds: Vec<Led> = self.mix_column(logical).map(Led::Mute).into_iter().collect();
        if self.state.eq.focus() == Some(logical) {
            leds.extend(self.focus_mute_column().map(Led::Rec));
        }
        leds
    }

    pub(super) fn rec_leds(&self, logical: LogicalStrip) -> Vec<Led> {
        self.mix_column(logical).map(Led::Rec).into_iter().collect()
    }

    /// Surface elements of EQ-mode columns bound to `param`.
    pub(super) fn eq_param_view(&self, param: EqParam) -> Effects {
        let mut effects = Effects::none();
        for strip in self.state.strips_in(Mode::Eq) {
            let row = eq_row(strip);
            if row.mute == param {
                effects.push_led(Led::Mute(strip), self.led_state(Led::Mute(strip)));
            }
            if row.rec == Some(param) && !self.state.eq.is_selecting() {
                effects.push_led(Led::Rec(strip), self.led_state(Led::Rec(strip)));
            }
            if row.fader == Some(param) {
                effects.merge(self.fader_view(strip));
            }
        }
        effects
    }

    /// Push the current value of `leds`.
    pub(super) fn led_view(&self, leds: &[Led]) -> Effects {
        let mut effects = Effects::none();
        for led in leds {
            effects.push_led(*led, self.led_state(*led));
        }
        effects
    }
}
