//! State reported back by Ardour.

use super::eq::int_arg;
use super::{Effects, MappingEngine};
use crate::error::BridgeError;
use midimix_types::{InboundMessage, LogicalStrip, OscArg};

impl MappingEngine {
    pub fn handle_feedback(&mut self, msg: &InboundMessage) -> Result<Effects, BridgeError> {
        match msg.addr.as_str() {
            "/strip/mute" => self.strip_feedback(msg, |engine, strip, arg| {
                let on = bool_value(msg, arg)?;
                let values = engine.state.strip_mut(strip);
                if values.mute == on {
                    return Ok(Effects::none());
                }
                values.mute = on;
                Ok(engine.led_view(&engine.mute_leds(strip)))
            }),
            "/strip/recenable" => self.strip_feedback(msg, |engine, strip, arg| {
                let on = bool_value(msg, arg)?;
                let values = engine.state.strip_mut(strip);
                if values.rec == on {
                    return Ok(Effects::none());
                }
                values.rec = on;
                Ok(engine.led_view(&engine.rec_leds(strip)))
            }),
            "/strip/solo" => self.strip_feedback(msg, |engine, strip, arg| {
                engine.state.strip_mut(strip).solo = bool_value(msg, arg)?;
                Ok(Effects::none())
            }),
            "/strip/fader" => self.strip_feedback(msg, |engine, strip, arg| {
                let gain = float_value(msg, arg)?;
                if !engine.state.strip_mut(strip).set_fader(gain) {
                    return Ok(Effects::none());
                }
                Ok(engine
                    .mix_column(strip)
                    .map(|column| engine.fader_view(column))
                    .unwrap_or_default())
            }),
            "/strip/trimdB" => self.strip_feedback(msg, |engine, strip, arg| {
                engine.state.strip_mut(strip).set_trim_db(float_value(msg, arg)?);
                Ok(Effects::none())
            }),
            "/strip/pan_stereo_position" => self.strip_feedback(msg, |engine, strip, arg| {
                engine.state.strip_mut(strip).set_pan(float_value(msg, arg)?);
                Ok(Effects::none())
            }),
            "/master/fader" => {
                let gain = float_value(msg, msg.args.first())?;
                self.state.set_master_fader(gain);
                Ok(Effects::none())
            }
            "/master/name" => self.master_name(msg),
            "/strip/plugin/list" => self.plugin_list_reply(msg),
            "/strip/plugin/descriptor" => self.descriptor_reply(msg),
            other => {
                log::debug!(target: "mapping", "ignoring feedback {}", other);
                Ok(Effects::none())
            }
        }
    }

    /// Common shape of per-strip feedback: `addr ssid value`.
    fn strip_feedback<'m, F>(
        &mut self,
        msg: &'m InboundMessage,
        apply: F,
    ) -> Result<Effects, BridgeError>
    where
        F: FnOnce(&mut Self, LogicalStrip, Option<&'m OscArg>) -> Result<Effects, BridgeError>,
    {
        let ssid = int_arg(msg, 0, "ssid")?;
        let Some(strip) = LogicalStrip::from_ssid(ssid) else {
            log::trace!(target: "mapping", "{} for strip {} outside the banks", msg.addr, ssid);
            return Ok(Effects::none());
        };
        apply(self, strip, msg.args.get(1))
    }

    /// A blank master name means the session was closed or is reloading.
    fn master_name(&mut self, msg: &InboundMessage) -> Result<Effects, BridgeError> {
        let name = match msg.args.first() {
            Some(arg) => arg
                .as_str()
                .ok_or_else(|| BridgeError::malformed(&msg.addr, "name is not a string"))?,
            None => "",
        };
        if !name.trim().is_empty() {
            log::debug!(target: "mapping", "session master is {:?}", name);
            return Ok(Effects::none());
        }
        log::info!(target: "mapping", "session closed, clearing caches");
        self.state.reset_caches();
        Ok(self.resync_all())
    }
}

fn float_value(msg: &InboundMessage, arg: Option<&OscArg>) -> Result<f32, BridgeError> {
    arg.and_then(|a| a.as_f32())
        .filter(|v| v.is_finite())
        .ok_or_else(|| BridgeError::malformed(&msg.addr, "missing numeric value"))
}

fn bool_value(msg: &InboundMessage, arg: Option<&OscArg>) -> Result<bool, BridgeError> {
    arg.and_then(|a| a.as_bool())
        .ok_or_else(|| BridgeError::malformed(&msg.addr, "missing on/off value"))
}
