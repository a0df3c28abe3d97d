use midir::{MidiOutput, MidiOutputConnection};

use super::layout;
use crate::error::{BridgeError, BridgeResult};
use midimix_types::Led;

/// LED side of the surface. LEDs are driven with note-on: velocity 127 lights, 0 clears.
pub struct SurfaceOutput {
    connection: MidiOutputConnection,
    port_name: String,
}

impl SurfaceOutput {
    pub fn connect(client_name: &str, output_port: &str) -> BridgeResult<Self> {
        let midi_out = MidiOutput::new(client_name)
            .map_err(|e| BridgeError::TransportUnavailable(e.to_string()))?;

        let port = midi_out
            .ports()
            .into_iter()
            .find(|port| {
                midi_out
                    .port_name(port)
                    .map(|name| name.contains(output_port))
                    .unwrap_or(false)
            })
            .ok_or_else(|| {
                BridgeError::TransportUnavailable(format!("MIDI output {:?} not found", output_port))
            })?;
        let port_name = midi_out
            .port_name(&port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let connection = midi_out
            .connect(&port, "midimix-output")
            .map_err(|e| BridgeError::TransportUnavailable(e.to_string()))?;

        Ok(Self {
            connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn set_led(&mut self, led: Led, on: bool) -> BridgeResult {
        let message = layout::led_message(led, on);
        self.connection
            .send(&message)
            .map_err(|e| BridgeError::TransportSendFailure(format!("LED {:?}: {}", led, e)))
    }
}
