use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::BridgeError;
use midimix_types::{CrossModePolicy, MIDI_MAX};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    surface: SurfaceConfig,
    #[serde(default)]
    osc: OscConfig,
    #[serde(default)]
    mapping: MappingConfig,
}

#[derive(Deserialize, Default)]
struct SurfaceConfig {
    input_port: Option<String>,
    output_port: Option<String>,
    client_name: Option<String>,
}

#[derive(Deserialize, Default)]
struct OscConfig {
    mixer_addr: Option<String>,
    eq_addr: Option<String>,
    bind_addr: Option<String>,
    poll_timeout_ms: Option<u64>,
    bank_size: Option<u8>,
    strip_types: Option<u32>,
    feedback: Option<u32>,
}

#[derive(Deserialize, Default)]
struct MappingConfig {
    solo_threshold: Option<u8>,
    solo_hysteresis: Option<u8>,
    cross_mode: Option<CrossModePolicy>,
    eq_plugin_names: Option<Vec<String>>,
}

/// Mapping-engine tunables resolved from the config.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSettings {
    pub solo_threshold: u8,
    pub solo_hysteresis: u8,
    pub cross_mode: CrossModePolicy,
    /// Plugin names accepted as the EQ, most preferred first.
    pub eq_plugin_names: Vec<String>,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            solo_threshold: 50,
            solo_hysteresis: 6,
            cross_mode: CrossModePolicy::EqWins,
            eq_plugin_names: vec![
                "x42-eq - Parametric Equalizer Mono".to_string(),
                "x42-eq - Parametric Equalizer Stereo".to_string(),
            ],
        }
    }
}

/// Arguments of Ardour's `/set_surface` announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceAnnouncement {
    pub bank_size: u8,
    pub strip_types: u32,
    pub feedback: u32,
}

pub struct Config {
    surface: SurfaceConfig,
    osc: OscConfig,
    mapping: MappingConfig,
}

impl Config {
    /// Embedded defaults, overridden by the user config file if one exists.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref())
    }

    /// Embedded defaults, overridden by `path` if it exists.
    pub fn load_from(path: Option<&Path>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(path) = path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_surface(&mut base.surface, user.surface);
                            merge_osc(&mut base.osc, user.osc);
                            merge_mapping(&mut base.mapping, user.mapping);
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            surface: base.surface,
            osc: base.osc,
            mapping: base.mapping,
        }
    }

    pub fn input_port(&self) -> &str {
        self.surface.input_port.as_deref().unwrap_or("MIDI Mix")
    }

    pub fn output_port(&self) -> &str {
        self.surface.output_port.as_deref().unwrap_or("MIDI Mix")
    }

    pub fn client_name(&self) -> &str {
        self.surface.client_name.as_deref().unwrap_or("midimix-bridge")
    }

    pub fn set_input_port(&mut self, name: &str) {
        self.surface.input_port = Some(name.to_string());
    }

    pub fn set_output_port(&mut self, name: &str) {
        self.surface.output_port = Some(name.to_string());
    }

    /// Point both OSC targets at one host, as Ardour serves mixer and plugins together.
    pub fn set_ardour_addr(&mut self, addr: &str) {
        self.osc.mixer_addr = Some(addr.to_string());
        self.osc.eq_addr = Some(addr.to_string());
    }

    pub fn mixer_addr(&self) -> Result<SocketAddr, BridgeError> {
        parse_addr("osc.mixer_addr", self.osc.mixer_addr.as_deref().unwrap_or("127.0.0.1:3819"))
    }

    pub fn eq_addr(&self) -> Result<SocketAddr, BridgeError> {
        parse_addr("osc.eq_addr", self.osc.eq_addr.as_deref().unwrap_or("127.0.0.1:3819"))
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, BridgeError> {
        parse_addr("osc.bind_addr", self.osc.bind_addr.as_deref().unwrap_or("0.0.0.0:0"))
    }

    /// Longest a single OSC poll may block (clamped to 1..100 ms).
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.osc.poll_timeout_ms.unwrap_or(5).clamp(1, 100))
    }

    pub fn announcement(&self) -> SurfaceAnnouncement {
        SurfaceAnnouncement {
            bank_size: self.osc.bank_size.unwrap_or(24),
            strip_types: self.osc.strip_types.unwrap_or(159),
            feedback: self.osc.feedback.unwrap_or(19),
        }
    }

    pub fn mapping(&self) -> MappingSettings {
        let fallback = MappingSettings::default();
        let solo_threshold = self
            .mapping
            .solo_threshold
            .map(|t| t.clamp(1, MIDI_MAX))
            .unwrap_or(fallback.solo_threshold);
        // The engage point must stay reachable by the knob.
        let solo_hysteresis = self
            .mapping
            .solo_hysteresis
            .unwrap_or(fallback.solo_hysteresis)
            .min(MIDI_MAX - solo_threshold);
        MappingSettings {
            solo_threshold,
            solo_hysteresis,
            cross_mode: self.mapping.cross_mode.unwrap_or(fallback.cross_mode),
            eq_plugin_names: self
                .mapping
                .eq_plugin_names
                .clone()
                .filter(|names| !names.is_empty())
                .unwrap_or(fallback.eq_plugin_names),
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("midimix").join("config.toml"))
}

fn parse_addr(key: &str, value: &str) -> Result<SocketAddr, BridgeError> {
    value
        .parse()
        .map_err(|e| BridgeError::Config(format!("{} = {:?}: {}", key, value, e)))
}

fn merge_surface(base: &mut SurfaceConfig, user: SurfaceConfig) {
    if user.input_port.is_some() {
        base.input_port = user.input_port;
    }
    if user.output_port.is_some() {
        base.output_port = user.output_port;
    }
    if user.client_name.is_some() {
        base.client_name = user.client_name;
    }
}

fn merge_osc(base: &mut OscConfig, user: OscConfig) {
    if user.mixer_addr.is_some() {
        base.mixer_addr = user.mixer_addr;
    }
    if user.eq_addr.is_some() {
        base.eq_addr = user.eq_addr;
    }
    if user.bind_addr.is_some() {
        base.bind_addr = user.bind_addr;
    }
    if user.poll_timeout_ms.is_some() {
        base.poll_timeout_ms = user.poll_timeout_ms;
    }
    if user.bank_size.is_some() {
        base.bank_size = user.bank_size;
    }
    if user.strip_types.is_some() {
        base.strip_types = user.strip_types;
    }
    if user.feedback.is_some() {
        base.feedback = user.feedback;
    }
}

fn merge_mapping(base: &mut MappingConfig, user: MappingConfig) {
    if user.solo_threshold.is_some() {
        base.solo_threshold = user.solo_threshold;
    }
    if user.solo_hysteresis.is_some() {
        base.solo_hysteresis = user.solo_hysteresis;
    }
    if user.cross_mode.is_some() {
        base.cross_mode = user.cross_mode;
    }
    if user.eq_plugin_names.is_some() {
        base.eq_plugin_names = user.eq_plugin_names;
    }
}
