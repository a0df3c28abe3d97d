//! The bridge loop: drains the surface and the OSC transport, runs every
//! event through the [`MappingEngine`] and applies the resulting effects.
//!
//! Mapping never touches I/O; the dispatcher is the only place where sends
//! and LED writes happen, and the only place that decides what a failed
//! delivery means (it is logged and dropped).

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{MappingSettings, SurfaceAnnouncement};
use crate::mapping::{all_leds_off, Effects, MappingEngine};
use crate::midi::Surface;
use crate::osc::OscTransport;
use midimix_types::{ControlEvent, InboundMessage, OscTarget, SurfaceUpdate};

/// Which traffic to echo at debug level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceFlags {
    pub controls: bool,
    pub osc: bool,
}

pub struct Dispatcher<S: Surface, T: OscTransport> {
    engine: MappingEngine,
    surface: S,
    transport: T,
    announcement: SurfaceAnnouncement,
    trace: TraceFlags,
}

impl<S: Surface, T: OscTransport> Dispatcher<S, T> {
    pub fn new(
        settings: MappingSettings,
        surface: S,
        transport: T,
        announcement: SurfaceAnnouncement,
    ) -> Self {
        Self {
            engine: MappingEngine::new(settings),
            surface,
            transport,
            announcement,
            trace: TraceFlags::default(),
        }
    }

    pub fn with_trace(mut self, trace: TraceFlags) -> Self {
        self.trace = trace;
        self
    }

    pub fn engine(&self) -> &MappingEngine {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Register with Ardour and bring the surface to a known state.
    pub fn start(&mut self) {
        let addr = format!(
            "/set_surface/{}/{}/{}/0/0/0/0/0",
            self.announcement.bank_size, self.announcement.strip_types, self.announcement.feedback
        );
        log::info!(target: "dispatch", "announcing surface: {}", addr);
        if let Err(e) = self.transport.send(OscTarget::Mixer, &addr, &[]) {
            log::warn!(target: "dispatch", "surface announcement failed: {}", e);
        }
        self.apply(all_leds_off());
        let bank_leds = self.engine.bank_leds();
        self.apply(bank_leds);
    }

    /// One loop iteration: surface first, then OSC feedback.
    /// Returns how many events were handled.
    pub fn pump(&mut self) -> usize {
        let controls = self.surface.poll();
        let mut handled = controls.len();
        for event in controls {
            self.handle_control(event);
        }

        let feedback = self.transport.poll();
        handled += feedback.len();
        for msg in &feedback {
            self.handle_feedback(msg);
        }
        handled
    }

    pub fn handle_control(&mut self, event: ControlEvent) {
        if self.trace.controls {
            log::debug!(target: "dispatch", "control {:?}", event);
        }
        let effects = self.engine.handle_control(event);
        self.apply(effects);
    }

    pub fn handle_feedback(&mut self, msg: &InboundMessage) {
        if self.trace.osc {
            log::debug!(target: "dispatch", "osc {} {:?}", msg.addr, msg.args);
        }
        match self.engine.handle_feedback(msg) {
            Ok(effects) => self.apply(effects),
            Err(e) => log::warn!(target: "dispatch", "{}", e),
        }
    }

    /// Deliver effects in order. Failures are logged; the rest still go out.
    pub fn apply(&mut self, effects: Effects) {
        for msg in &effects.osc {
            if self.trace.osc {
                log::debug!(target: "dispatch", "-> {:?} {} {:?}", msg.target, msg.addr, msg.args);
            }
            if let Err(e) = self.transport.send(msg.target, &msg.addr, &msg.args) {
                log::warn!(target: "dispatch", "dropping {}: {}", msg.addr, e);
            }
        }
        for update in effects.surface {
            let result = match update {
                SurfaceUpdate::Led { led, on } => self.surface.set_led(led, on),
                SurfaceUpdate::Fader { strip, value } => self.surface.set_fader(strip, value),
            };
            if let Err(e) = result {
                log::warn!(target: "dispatch", "surface update {:?} failed: {}", update, e);
            }
        }
    }

    /// Darken the surface before the transports are dropped.
    pub fn shutdown(&mut self) {
        log::info!(target: "dispatch", "shutting down");
        self.apply(all_leds_off());
    }

    /// Run until `running` is cleared, then shut down.
    pub fn run(&mut self, running: &AtomicBool) {
        self.start();
        while running.load(Ordering::SeqCst) {
            // The transport poll blocks for at most its read timeout, which paces the loop.
            self.pump();
        }
        self.shutdown();
    }
}
