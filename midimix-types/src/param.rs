/// Largest 7-bit MIDI data value.
pub const MIDI_MAX: u8 = 127;

/// Clamp a data byte into the 7-bit range.
pub fn clamp_midi(value: u8) -> u8 {
    value.min(MIDI_MAX)
}

/// How a 0..127 control position spreads over a parameter's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    /// Equal ratios per step. Only valid for ranges with both ends > 0.
    Log,
}

/// Target range of a continuous OSC parameter.
///
/// `min` may be larger than `max` for controls whose direction is inverted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub curve: Curve,
}

impl ParamRange {
    pub const fn linear(min: f32, max: f32) -> Self {
        Self { min, max, curve: Curve::Linear }
    }

    pub const fn log(min: f32, max: f32) -> Self {
        Self { min, max, curve: Curve::Log }
    }

    /// Map a MIDI position onto the parameter range.
    pub fn from_midi(&self, value: u8) -> f32 {
        let t = clamp_midi(value) as f32 / MIDI_MAX as f32;
        match self.curve {
            Curve::Linear => self.min + (self.max - self.min) * t,
            Curve::Log => self.min * (self.max / self.min).powf(t),
        }
    }

    /// Inverse of [`from_midi`](Self::from_midi), rounded to the nearest step.
    pub fn to_midi(&self, value: f32) -> u8 {
        let t = match self.curve {
            Curve::Linear => (value - self.min) / (self.max - self.min),
            Curve::Log => {
                if value <= 0.0 {
                    return 0;
                }
                (value / self.min).ln() / (self.max / self.min).ln()
            }
        };
        if !t.is_finite() {
            return 0;
        }
        (t.clamp(0.0, 1.0) * MIDI_MAX as f32).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints() {
        let range = ParamRange::linear(-18.0, 18.0);
        assert!((range.from_midi(0) + 18.0).abs() < 1e-5);
        assert!((range.from_midi(127) - 18.0).abs() < 1e-5);
        assert_eq!(range.to_midi(18.0), 127);
        assert_eq!(range.to_midi(-18.0), 0);
    }

    #[test]
    fn inverted_linear_range() {
        let pan = ParamRange::linear(1.0, 0.0);
        assert!((pan.from_midi(0) - 1.0).abs() < 1e-6);
        assert!(pan.from_midi(127).abs() < 1e-6);
        assert_eq!(pan.to_midi(0.0), 127);
    }

    #[test]
    fn log_midpoint_is_geometric_mean() {
        let range = ParamRange::log(20.0, 2000.0);
        assert!((range.from_midi(0) - 20.0).abs() < 1e-3);
        assert!((range.from_midi(127) - 2000.0).abs() < 0.5);
        // 64/127 is just past halfway, so slightly above sqrt(20 * 2000)
        let mid = range.from_midi(64);
        assert!(mid > 200.0 && mid < 210.0, "mid = {mid}");
    }

    #[test]
    fn to_midi_inverts_from_midi() {
        let ranges = [
            ParamRange::linear(0.0, 1.0),
            ParamRange::linear(-20.0, 20.0),
            ParamRange::log(5.0, 1250.0),
            ParamRange::log(0.0625, 4.0),
        ];
        for range in ranges {
            for v in [0u8, 1, 31, 64, 100, 126, 127] {
                assert_eq!(range.to_midi(range.from_midi(v)), v, "{range:?} at {v}");
            }
        }
    }

    #[test]
    fn out_of_range_values_clamp() {
        let range = ParamRange::linear(0.0, 1.0);
        assert_eq!(range.to_midi(3.0), 127);
        assert_eq!(range.to_midi(-1.0), 0);
        assert_eq!(ParamRange::log(20.0, 200.0).to_midi(0.0), 0);
        assert_eq!(clamp_midi(200), 127);
    }
}
