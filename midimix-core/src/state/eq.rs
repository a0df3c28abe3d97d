use std::collections::HashMap;

use midimix_types::{EqParam, LogicalStrip};

/// The EQ plugin instance being edited: strip plus 1-based plugin position (`piid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EqBinding {
    pub strip: LogicalStrip,
    pub plugin: i32,
}

/// Where the EQ editor is in finding its plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EqPhase {
    /// No strip is in EQ mode.
    #[default]
    Idle,
    /// Waiting for the strip's plugin list.
    Discovering { strip: LogicalStrip },
    /// Several EQs on the strip; REC buttons pick one.
    Selecting { strip: LogicalStrip, candidates: Vec<i32> },
    Bound(EqBinding),
}

/// EQ editor focus plus the last known values of the bound plugin's ports.
#[derive(Debug, Default)]
pub struct EqSession {
    phase: EqPhase,
    values: HashMap<EqParam, f32>,
}

impl EqSession {
    pub fn phase(&self) -> &EqPhase {
        &self.phase
    }

    /// Logical strip whose EQ the surface edits, bound or not yet.
    pub fn focus(&self) -> Option<LogicalStrip> {
        match &self.phase {
            EqPhase::Idle => None,
            EqPhase::Discovering { strip } | EqPhase::Selecting { strip, .. } => Some(*strip),
            EqPhase::Bound(binding) => Some(binding.strip),
        }
    }

    pub fn binding(&self) -> Option<EqBinding> {
        match &self.phase {
            EqPhase::Bound(binding) => Some(*binding),
            _ => None,
        }
    }

    pub fn candidates(&self) -> Option<&[i32]> {
        match &self.phase {
            EqPhase::Selecting { candidates, .. } => Some(candidates),
            _ => None,
        }
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.phase, EqPhase::Selecting { .. })
    }

    /// Start looking for the EQ on `strip`. Cached port values belong to the old plugin.
    pub fn begin_discovery(&mut self, strip: LogicalStrip) {
        self.phase = EqPhase::Discovering { strip };
        self.values.clear();
    }

    pub fn begin_selection(&mut self, strip: LogicalStrip, candidates: Vec<i32>) {
        self.phase = EqPhase::Selecting { strip, candidates };
    }

    pub fn bind(&mut self, binding: EqBinding) {
        self.phase = EqPhase::Bound(binding);
        self.values.clear();
    }

    pub fn clear(&mut self) {
        self.phase = EqPhase::Idle;
        self.values.clear();
    }

    pub fn value(&self, param: EqParam) -> Option<f32> {
        self.values.get(&param).copied()
    }

    pub fn set_value(&mut self, param: EqParam, value: f32) {
        self.values.insert(param, value);
    }

    /// Toggle ports read as on above 0.5.
    pub fn flag(&self, param: EqParam) -> bool {
        self.value(param).map_or(false, |v| v >= 0.5)
    }

    pub fn forget_values(&mut self) {
        self.values.clear();
    }
}

/// Pick the EQ plugins out of an Ardour `/strip/plugin/list` reply body.
///
/// `entries` are `(piid, name)` pairs. The first name in `preferred` that is
/// present wins (mono before stereo), and every instance of it is returned.
pub fn select_eq_plugins(entries: &[(i32, String)], preferred: &[String]) -> Vec<i32> {
    preferred
        .iter()
        .map(|wanted| {
            entries
                .iter()
                .filter(|(_, name)| name == wanted)
                .map(|(piid, _)| *piid)
                .collect::<Vec<_>>()
        })
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}
