//! OSC transport to the DAW mixer and the EQ plugin.
//!
//! `OscTransport` captures what the bridge means to send independently of
//! how it travels, so the dispatcher can be driven by a recording transport
//! in tests.

mod client;

pub use client::{decode_packet, OscClient};

use crate::error::BridgeResult;
use midimix_types::{InboundMessage, OscArg, OscTarget};

pub trait OscTransport {
    /// Send one message. Failures are reported, never retried.
    fn send(&mut self, target: OscTarget, addr: &str, args: &[OscArg]) -> BridgeResult;

    /// Collect feedback received since the last poll, waiting at most a
    /// bounded interval for the first message.
    fn poll(&mut self) -> Vec<InboundMessage>;
}
