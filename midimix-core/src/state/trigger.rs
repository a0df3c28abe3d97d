use midimix_types::MIDI_MAX;

/// Turns a continuous knob into an on/off switch that only reports changes.
///
/// The switch releases below `threshold` and engages at
/// `threshold + hysteresis` (capped at full scale), so a knob resting near
/// the threshold cannot chatter. A fresh trigger starts released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeTrigger {
    engaged: bool,
}

impl EdgeTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a knob position. Returns the new state when it flips.
    pub fn update(&mut self, value: u8, threshold: u8, hysteresis: u8) -> Option<bool> {
        let engage_at = threshold.saturating_add(hysteresis).min(MIDI_MAX);
        let next = if self.engaged {
            value >= threshold
        } else {
            value >= engage_at
        };
        if next == self.engaged {
            return None;
        }
        self.engaged = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(values: &[u8], threshold: u8, hysteresis: u8) -> Vec<(u8, bool)> {
        let mut trigger = EdgeTrigger::new();
        values
            .iter()
            .filter_map(|&v| trigger.update(v, threshold, hysteresis).map(|on| (v, on)))
            .collect()
    }

    #[test]
    fn sweep_emits_only_on_crossings() {
        let events = run(&[30, 40, 60, 70, 45, 55], 50, 6);
        assert_eq!(events, vec![(60, true), (45, false)]);
    }

    #[test]
    fn without_hysteresis_every_crossing_fires() {
        let events = run(&[30, 40, 60, 70, 45, 55], 50, 0);
        assert_eq!(events, vec![(60, true), (45, false), (55, true)]);
    }

    #[test]
    fn threshold_itself_engages_without_hysteresis() {
        assert_eq!(run(&[49, 50, 50, 49], 50, 0), vec![(50, true), (49, false)]);
    }

    #[test]
    fn jitter_inside_band_is_ignored() {
        let events = run(&[60, 52, 55, 51, 53, 50], 50, 6);
        assert_eq!(events, vec![(60, true)]);
    }

    #[test]
    fn starting_low_emits_nothing() {
        assert!(run(&[0, 10, 20, 49], 50, 6).is_empty());
    }

    #[test]
    fn saturating_engage_point() {
        let mut trigger = EdgeTrigger::new();
        assert_eq!(trigger.update(127, 127, 20), Some(true));
        assert_eq!(trigger.update(127, 127, 20), None);
    }

    #[test]
    fn engage_point_past_full_scale_is_reachable() {
        let sweep: Vec<u8> = (0..=127).collect();
        assert_eq!(run(&sweep, 120, 10), vec![(127, true)]);
        assert_eq!(run(&[127, 119], 120, 10), vec![(127, true), (119, false)]);
    }
}
