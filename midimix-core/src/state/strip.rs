/// Last known mixer values of one logical strip, as reported by feedback or
/// last sent by the surface.
///
/// Continuous values are `None` until something is known; toggles start off.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StripValues {
    pub fader: Option<f32>,
    pub trim_db: Option<f32>,
    pub pan: Option<f32>,
    pub mute: bool,
    pub rec: bool,
    pub solo: bool,
}

impl StripValues {
    /// Record a fader position. Returns false when nothing changed.
    pub fn set_fader(&mut self, value: f32) -> bool {
        replace_continuous(&mut self.fader, value)
    }

    pub fn set_trim_db(&mut self, value: f32) -> bool {
        replace_continuous(&mut self.trim_db, value)
    }

    pub fn set_pan(&mut self, value: f32) -> bool {
        replace_continuous(&mut self.pan, value)
    }
}

fn replace_continuous(slot: &mut Option<f32>, value: f32) -> bool {
    if slot.map_or(false, |old| (old - value).abs() < f32::EPSILON) {
        return false;
    }
    *slot = Some(value);
    true
}
