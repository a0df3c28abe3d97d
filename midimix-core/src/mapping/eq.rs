//! EQ mode: columns edit the x42 EQ of the focused strip, plus discovery of
//! that plugin.

use super::{Effects, MappingEngine};
use crate::error::BridgeError;
use crate::state::{select_eq_plugins, EqBinding, EqPhase};
use midimix_types::{
    eq_row, CrossModePolicy, EqParam, EqParamKind, InboundMessage, KnobRow, Led, LogicalStrip,
    OscArg, OutboundMessage, PhysicalStrip, STRIPS_PER_BANK,
};

impl MappingEngine {
    /// A column just switched to EQ: focus its logical strip and look for the plugin.
    pub(super) fn enter_eq(&mut self, strip: PhysicalStrip) -> Effects {
        let logical = self.state.logical(strip);
        let focus = self.state.eq.focus();
        let waiting = matches!(self.state.eq.phase(), EqPhase::Discovering { .. });
        if focus == Some(logical) && !waiting {
            return self.strip_view(strip);
        }
        if let Some(old) = focus.filter(|f| *f != logical) {
            log::info!(target: "mapping", "EQ focus moves from strip {} to {}", old, logical);
        }
        self.state.eq.begin_discovery(logical);
        let mut effects = self.resync_all();
        effects.push_osc(OutboundMessage::equalizer(
            "/strip/plugin/list",
            vec![OscArg::Int(logical.ssid())],
        ));
        effects
    }

    fn bind_plugin(&mut self, strip: LogicalStrip, plugin: i32) -> Effects {
        log::info!(target: "mapping", "editing EQ {} on strip {}", plugin, strip);
        self.state.eq.bind(EqBinding { strip, plugin });
        let mut effects = self.resync_all();
        effects.push_osc(OutboundMessage::equalizer(
            "/strip/plugin/descriptor",
            vec![OscArg::Int(strip.ssid()), OscArg::Int(plugin)],
        ));
        effects
    }

    /// REC press while choosing between several EQs on the focused strip.
    pub(super) fn select_plugin(&mut self, plugin: i32) -> Effects {
        match self.state.eq.focus() {
            Some(strip) => self.bind_plugin(strip, plugin),
            None => Effects::none(),
        }
    }

    /// Give up on EQ editing: every EQ column returns to MIX.
    fn abandon_eq(&mut self) -> Effects {
        let reverted = self.state.revert_all_to_mix();
        log::info!(target: "mapping", "{} strip(s) back to MIX", reverted.len());
        self.state.eq.clear();
        self.resync_all()
    }

    fn send_param(&mut self, param: EqParam, value: f32) -> Effects {
        let mut effects = Effects::none();
        let Some(binding) = self.state.eq.binding() else {
            log::debug!(target: "mapping", "no EQ bound, {:?} dropped", param);
            return effects;
        };
        self.state.eq.set_value(param, value);
        effects.push_osc(OutboundMessage::equalizer(
            "/strip/plugin/parameter",
            vec![
                OscArg::Int(binding.strip.ssid()),
                OscArg::Int(binding.plugin),
                OscArg::Int(param.index()),
                OscArg::Float(value),
            ],
        ));
        effects
    }

    fn continuous_param(&mut self, param: EqParam, value: u8) -> Effects {
        match param.kind() {
            EqParamKind::Continuous(range) => self.send_param(param, range.from_midi(value)),
            kind => {
                log::debug!(target: "mapping", "{:?} is {:?}, not continuous", param, kind);
                Effects::none()
            }
        }
    }

    fn toggle_param(&mut self, param: EqParam) -> Effects {
        let on = !self.state.eq.flag(param);
        let mut effects = self.send_param(param, if on { 1.0 } else { 0.0 });
        if !effects.is_empty() {
            effects.merge(self.eq_param_view(param));
        }
        effects
    }

    pub(super) fn eq_fader(&mut self, strip: PhysicalStrip, value: u8) -> Effects {
        match eq_row(strip).fader {
            Some(param) => self.continuous_param(param, value),
            None => Effects::none(),
        }
    }

    pub(super) fn eq_knob(&mut self, strip: PhysicalStrip, row: KnobRow, value: u8) -> Effects {
        let eq = eq_row(strip);
        match row {
            KnobRow::Top => self.continuous_param(eq.knob_top, value),
            KnobRow::Middle => self.continuous_param(eq.knob_middle, value),
            KnobRow::Bottom => {
                let Some(focus) = self.state.eq.focus() else {
                    return Effects::none();
                };
                if strip == PhysicalStrip::FIRST {
                    self.send_pan(focus, value)
                } else if strip == PhysicalStrip::LAST {
                    self.solo_knob(focus, value)
                } else {
                    Effects::none()
                }
            }
        }
    }

    pub(super) fn eq_mute(&mut self, strip: PhysicalStrip) -> Effects {
        let mut effects = self.toggle_param(eq_row(strip).mute);
        if strip == PhysicalStrip::LAST && self.settings.cross_mode == CrossModePolicy::DualPurpose
        {
            if let Some(focus) = self.state.eq.focus() {
                effects.merge(self.toggle_mute(focus));
            }
        }
        effects
    }

    pub(super) fn eq_rec_down(&mut self, strip: PhysicalStrip) -> Effects {
        match eq_row(strip).rec {
            Some(param) => match param.kind() {
                EqParamKind::Momentary => {
                    let mut effects = self.send_param(param, 1.0);
                    if !effects.is_empty() {
                        effects.push_led(Led::Rec(strip), true);
                    }
                    effects
                }
                _ => self.toggle_param(param),
            },
            None if self.focus_mute_column() == Some(strip) => match self.state.eq.focus() {
                Some(focus) => self.toggle_mute(focus),
                None => Effects::none(),
            },
            None => Effects::none(),
        }
    }

    pub(super) fn eq_rec_up(&mut self, strip: PhysicalStrip) -> Effects {
        match eq_row(strip).rec {
            Some(param) if param.kind() == EqParamKind::Momentary => {
                let mut effects = self.send_param(param, 0.0);
                if !effects.is_empty() {
                    effects.push_led(Led::Rec(strip), false);
                }
                effects
            }
            _ => Effects::none(),
        }
    }

    /// `/strip/plugin/list ssid (piid name active)*`
    pub(super) fn plugin_list_reply(&mut self, msg: &InboundMessage) -> Result<Effects, BridgeError> {
        let ssid = int_arg(msg, 0, "ssid")?;
        let strip = match self.state.eq.phase() {
            EqPhase::Discovering { strip } if strip.ssid() == ssid => *strip,
            _ => {
                log::debug!(target: "mapping", "unrequested plugin list for strip {}", ssid);
                return Ok(Effects::none());
            }
        };

        let entries = parse_plugin_list(msg)?;
        let found = select_eq_plugins(&entries, &self.settings.eq_plugin_names);
        match found.len() {
            0 => {
                log::warn!(target: "mapping", "no EQ plugin on strip {}, back to MIX", strip);
                Ok(self.abandon_eq())
            }
            1 => Ok(self.bind_plugin(strip, found[0])),
            n if n <= STRIPS_PER_BANK as usize => {
                log::info!(target: "mapping", "{} EQs on strip {}, press REC to choose", n, strip);
                self.state.eq.begin_selection(strip, found);
                Ok(self.resync_all())
            }
            n => {
                log::warn!(target: "mapping", "{} EQs on strip {}, too many to choose from", n, strip);
                Ok(self.abandon_eq())
            }
        }
    }

    /// `/strip/plugin/descriptor ssid piid param name ... value`
    pub(super) fn descriptor_reply(&mut self, msg: &InboundMessage) -> Result<Effects, BridgeError> {
        if msg.args.len() < 5 {
            return Err(BridgeError::malformed(
                &msg.addr,
                format!("expected at least 5 arguments, got {}", msg.args.len()),
            ));
        }
        let ssid = int_arg(msg, 0, "ssid")?;
        let plugin = int_arg(msg, 1, "piid")?;
        let index = int_arg(msg, 2, "parameter id")?;
        let name = msg.args[3]
            .as_str()
            .ok_or_else(|| BridgeError::malformed(&msg.addr, "parameter name is not a string"))?;
        let value = msg.args[msg.args.len() - 1]
            .as_f32()
            .ok_or_else(|| BridgeError::malformed(&msg.addr, "current value is not numeric"))?;

        let bound = self
            .state
            .eq
            .binding()
            .map_or(false, |b| b.strip.ssid() == ssid && b.plugin == plugin);
        if !bound {
            log::debug!(target: "mapping", "descriptor for unbound plugin {}/{}", ssid, plugin);
            return Ok(Effects::none());
        }
        let Some(param) = EqParam::from_index(index).or_else(|| EqParam::from_toggle_name(name))
        else {
            log::trace!(target: "mapping", "unmapped EQ port {} ({})", index, name);
            return Ok(Effects::none());
        };
        if self.state.eq.value(param) == Some(value) {
            return Ok(Effects::none());
        }
        self.state.eq.set_value(param, value);
        Ok(self.eq_param_view(param))
    }
}

pub(super) fn int_arg(msg: &InboundMessage, pos: usize, what: &str) -> Result<i32, BridgeError> {
    msg.args
        .get(pos)
        .and_then(OscArg::as_i32)
        .ok_or_else(|| BridgeError::malformed(&msg.addr, format!("missing {}", what)))
}

fn parse_plugin_list(msg: &InboundMessage) -> Result<Vec<(i32, String)>, BridgeError> {
    let body = &msg.args[1..];
    if body.len() % 3 != 0 {
        return Err(BridgeError::malformed(
            &msg.addr,
            format!("{} arguments after ssid, expected (piid, name, active) triples", body.len()),
        ));
    }
    body.chunks_exact(3)
        .map(|entry| match (&entry[0], &entry[1]) {
            (piid, OscArg::Str(name)) => piid
                .as_i32()
                .map(|piid| (piid, name.clone()))
                .ok_or_else(|| BridgeError::malformed(&msg.addr, "plugin id is not numeric")),
            _ => Err(BridgeError::malformed(&msg.addr, "plugin name is not a string")),
        })
        .collect()
}
