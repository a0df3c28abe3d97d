//! Surface I/O: raw MIDI in and out of the MIDIMIX via `midir`.

pub mod layout;
mod output;

pub use output::SurfaceOutput;

use midir::{MidiInput, MidiInputConnection, MidiOutput};
use std::sync::mpsc::{self, Receiver};

use crate::error::{BridgeError, BridgeResult};
use midimix_types::{ControlEvent, Led, PhysicalStrip};

/// The channel-voice messages the MIDIMIX sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEventKind {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

/// Contract between the dispatcher and the control surface.
pub trait Surface {
    /// Drain pending control events without blocking.
    fn poll(&mut self) -> Vec<ControlEvent>;

    fn set_led(&mut self, led: Led, on: bool) -> BridgeResult;

    /// Move a motorized fader. No-op on hardware without motors.
    fn set_fader(&mut self, strip: PhysicalStrip, value: u8) -> BridgeResult;
}

/// Information about an available MIDI port
#[derive(Debug, Clone)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

/// Input and output port names, for `--list-ports`.
pub fn list_ports(client_name: &str) -> BridgeResult<(Vec<MidiPortInfo>, Vec<MidiPortInfo>)> {
    let midi_in =
        MidiInput::new(client_name).map_err(|e| BridgeError::TransportUnavailable(e.to_string()))?;
    let midi_out =
        MidiOutput::new(client_name).map_err(|e| BridgeError::TransportUnavailable(e.to_string()))?;

    let inputs = midi_in
        .ports()
        .iter()
        .enumerate()
        .filter_map(|(index, port)| {
            midi_in
                .port_name(port)
                .ok()
                .map(|name| MidiPortInfo { index, name })
        })
        .collect();
    let outputs = midi_out
        .ports()
        .iter()
        .enumerate()
        .filter_map(|(index, port)| {
            midi_out
                .port_name(port)
                .ok()
                .map(|name| MidiPortInfo { index, name })
        })
        .collect();
    Ok((inputs, outputs))
}

/// Connected MIDIMIX: input connection feeding a channel, plus the LED output.
pub struct MidimixSurface {
    connection: Option<MidiInputConnection<()>>,
    event_receiver: Receiver<MidiEventKind>,
    output: SurfaceOutput,
}

impl MidimixSurface {
    /// Open the first input and output ports whose names contain the given substrings.
    pub fn connect(client_name: &str, input_port: &str, output_port: &str) -> BridgeResult<Self> {
        let midi_in =
            MidiInput::new(client_name).map_err(|e| BridgeError::TransportUnavailable(e.to_string()))?;

        let port = midi_in
            .ports()
            .into_iter()
            .find(|port| {
                midi_in
                    .port_name(port)
                    .map(|name| name.contains(input_port))
                    .unwrap_or(false)
            })
            .ok_or_else(|| {
                BridgeError::TransportUnavailable(format!("MIDI input {:?} not found", input_port))
            })?;
        let input_port_name = midi_in
            .port_name(&port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let (tx, rx) = mpsc::channel();
        let connection = midi_in
            .connect(
                &port,
                "midimix-input",
                move |_timestamp, message, _| {
                    if let Some(kind) = parse_midi_message(message) {
                        let _ = tx.send(kind);
                    }
                },
                (),
            )
            .map_err(|e| BridgeError::TransportUnavailable(e.to_string()))?;

        let output = SurfaceOutput::connect(client_name, output_port)?;
        log::info!(target: "midi", "connected to {} / {}", input_port_name, output.port_name());

        Ok(Self {
            connection: Some(connection),
            event_receiver: rx,
            output,
        })
    }

    /// Close the input connection; the output closes on drop.
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
        }
    }
}

impl Surface for MidimixSurface {
    fn poll(&mut self) -> Vec<ControlEvent> {
        let mut events = Vec::new();
        while let Ok(kind) = self.event_receiver.try_recv() {
            match layout::decode(kind) {
                Some(event) => events.push(event),
                None => log::trace!(target: "midi", "unmapped MIDI message {:?}", kind),
            }
        }
        events
    }

    fn set_led(&mut self, led: Led, on: bool) -> BridgeResult {
        self.output.set_led(led, on)
    }

    fn set_fader(&mut self, _strip: PhysicalStrip, _value: u8) -> BridgeResult {
        // MIDIMIX faders are not motorized
        Ok(())
    }
}

impl Drop for MidimixSurface {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Parse a raw MIDI message into a MidiEventKind
pub fn parse_midi_message(data: &[u8]) -> Option<MidiEventKind> {
    if data.len() < 3 {
        return None;
    }

    let status = data[0];
    let channel = status & 0x0F;
    // Data bytes carry 7 bits
    let (d1, d2) = (data[1] & 0x7F, data[2] & 0x7F);

    match status & 0xF0 {
        0x80 => Some(MidiEventKind::NoteOff { channel, note: d1 }),
        0x90 => {
            // Note On (velocity 0 = note off)
            if d2 == 0 {
                Some(MidiEventKind::NoteOff { channel, note: d1 })
            } else {
                Some(MidiEventKind::NoteOn {
                    channel,
                    note: d1,
                    velocity: d2,
                })
            }
        }
        0xB0 => Some(MidiEventKind::ControlChange {
            channel,
            controller: d1,
            value: d2,
        }),
        _ => None,
    }
}
