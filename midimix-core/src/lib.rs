//! # midimix-core
//!
//! Bridges an AKAI MIDIMIX to Ardour's OSC surface and the x42 parametric EQ.
//!
//! - [`midi`]: MIDIMIX input decoding and LED output over `midir`
//! - [`osc`]: UDP OSC transport over `rosc`
//! - [`mapping`]: control ↔ OSC translation, MIX and EQ modes, feedback
//! - [`state`]: bank, per-strip modes and value caches
//! - [`dispatch`]: the polling loop tying them together

pub mod config;
pub mod dispatch;
pub mod error;
pub mod mapping;
pub mod midi;
pub mod osc;
pub mod state;

pub use config::{Config, MappingSettings, SurfaceAnnouncement};
pub use dispatch::{Dispatcher, TraceFlags};
pub use error::{BridgeError, BridgeResult};
pub use mapping::{Effects, MappingEngine};
