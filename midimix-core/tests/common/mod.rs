#![allow(dead_code)]
//! Test harness for driving the dispatcher without hardware or a network.

use std::collections::VecDeque;

use midimix_core::midi::Surface;
use midimix_core::osc::OscTransport;
use midimix_core::{BridgeError, BridgeResult, Dispatcher, MappingSettings, SurfaceAnnouncement};
use midimix_types::{
    ControlEvent, InboundMessage, Led, OscArg, OscTarget, OutboundMessage, PhysicalStrip,
    SurfaceUpdate,
};

/// Surface fed from a queue, remembering every update written to it.
#[derive(Default)]
pub struct RecordingSurface {
    pub pending: VecDeque<ControlEvent>,
    pub updates: Vec<SurfaceUpdate>,
    /// Make every LED write fail.
    pub broken: bool,
}

impl Surface for RecordingSurface {
    fn poll(&mut self) -> Vec<ControlEvent> {
        self.pending.drain(..).collect()
    }

    fn set_led(&mut self, led: Led, on: bool) -> BridgeResult {
        if self.broken {
            return Err(BridgeError::TransportSendFailure("surface unplugged".into()));
        }
        self.updates.push(SurfaceUpdate::Led { led, on });
        Ok(())
    }

    fn set_fader(&mut self, strip: PhysicalStrip, value: u8) -> BridgeResult {
        self.updates.push(SurfaceUpdate::Fader { strip, value });
        Ok(())
    }
}

/// OSC transport fed from a queue, remembering every message sent.
#[derive(Default)]
pub struct RecordingTransport {
    pub inbound: VecDeque<InboundMessage>,
    pub sent: Vec<OutboundMessage>,
    /// Addresses whose sends fail.
    pub failing: Vec<String>,
}

impl OscTransport for RecordingTransport {
    fn send(&mut self, target: OscTarget, addr: &str, args: &[OscArg]) -> BridgeResult {
        if self.failing.iter().any(|a| a == addr) {
            return Err(BridgeError::TransportSendFailure(format!("{} refused", addr)));
        }
        self.sent.push(OutboundMessage {
            target,
            addr: addr.to_string(),
            args: args.to_vec(),
        });
        Ok(())
    }

    fn poll(&mut self) -> Vec<InboundMessage> {
        self.inbound.drain(..).collect()
    }
}

pub type TestDispatcher = Dispatcher<RecordingSurface, RecordingTransport>;

pub const DEFAULT_ANNOUNCEMENT: SurfaceAnnouncement = SurfaceAnnouncement {
    bank_size: 24,
    strip_types: 159,
    feedback: 19,
};

pub const MONO_EQ: &str = "x42-eq - Parametric Equalizer Mono";

pub fn make_dispatcher() -> TestDispatcher {
    make_dispatcher_with(MappingSettings::default())
}

pub fn make_dispatcher_with(settings: MappingSettings) -> TestDispatcher {
    Dispatcher::new(
        settings,
        RecordingSurface::default(),
        RecordingTransport::default(),
        DEFAULT_ANNOUNCEMENT,
    )
}

/// Start the dispatcher and forget what startup wrote.
pub fn started() -> TestDispatcher {
    let mut dispatcher = make_dispatcher();
    dispatcher.start();
    clear_logs(&mut dispatcher);
    dispatcher
}

pub fn clear_logs(dispatcher: &mut TestDispatcher) {
    dispatcher.surface_mut().updates.clear();
    dispatcher.transport_mut().sent.clear();
}

pub fn strip(i: u8) -> PhysicalStrip {
    PhysicalStrip::new(i).unwrap()
}

/// Queue surface events and run one loop iteration.
pub fn press(dispatcher: &mut TestDispatcher, events: &[ControlEvent]) {
    dispatcher.surface_mut().pending.extend(events.iter().copied());
    dispatcher.pump();
}

/// Queue feedback and run one loop iteration.
pub fn receive(dispatcher: &mut TestDispatcher, messages: Vec<InboundMessage>) {
    dispatcher.transport_mut().inbound.extend(messages);
    dispatcher.pump();
}

pub fn plugin_list(ssid: i32, names: &[&str]) -> InboundMessage {
    let mut args = vec![OscArg::Int(ssid)];
    for (i, name) in names.iter().enumerate() {
        args.push(OscArg::Int(i as i32 + 1));
        args.push(OscArg::Str(name.to_string()));
        args.push(OscArg::Int(1));
    }
    InboundMessage::new("/strip/plugin/list", args)
}

pub fn sent_addrs(dispatcher: &TestDispatcher) -> Vec<String> {
    dispatcher
        .transport()
        .sent
        .iter()
        .map(|m| m.addr.clone())
        .collect()
}

/// Last value written to an LED, if any.
pub fn last_led(dispatcher: &TestDispatcher, wanted: Led) -> Option<bool> {
    dispatcher
        .surface()
        .updates
        .iter()
        .rev()
        .find_map(|u| match u {
            SurfaceUpdate::Led { led, on } if *led == wanted => Some(*on),
            _ => None,
        })
}
