use crate::PhysicalStrip;

/// OSC endpoint a message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OscTarget {
    /// The DAW mixer (strip gain/pan/mute/rec/solo, master).
    Mixer,
    /// The EQ plugin parameter space.
    Equalizer,
}

/// A loosely-typed OSC argument, so mapping code doesn't depend on `rosc`.
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    Int(i32),
    Float(f32),
    Str(String),
}

impl OscArg {
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            OscArg::Int(v) => Some(*v),
            OscArg::Float(v) => Some(*v as i32),
            OscArg::Str(_) => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            OscArg::Int(v) => Some(*v as f32),
            OscArg::Float(v) => Some(*v),
            OscArg::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OscArg::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Ardour reports toggles as either ints or floats.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_f32().map(|v| v >= 0.5)
    }
}

/// Message produced by the mapping engine for the OSC transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub target: OscTarget,
    pub addr: String,
    pub args: Vec<OscArg>,
}

impl OutboundMessage {
    pub fn mixer(addr: &str, args: Vec<OscArg>) -> Self {
        Self {
            target: OscTarget::Mixer,
            addr: addr.to_string(),
            args,
        }
    }

    pub fn equalizer(addr: &str, args: Vec<OscArg>) -> Self {
        Self {
            target: OscTarget::Equalizer,
            addr: addr.to_string(),
            args,
        }
    }
}

/// Feedback message received from either OSC endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub addr: String,
    pub args: Vec<OscArg>,
}

impl InboundMessage {
    pub fn new(addr: &str, args: Vec<OscArg>) -> Self {
        Self {
            addr: addr.to_string(),
            args,
        }
    }
}

/// LEDs the surface can light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Led {
    Mute(PhysicalStrip),
    Rec(PhysicalStrip),
    BankLeft,
    BankRight,
}

/// State pushed back onto the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceUpdate {
    Led { led: Led, on: bool },
    /// Motorized fader position; surfaces without motors ignore it.
    Fader { strip: PhysicalStrip, value: u8 },
}
