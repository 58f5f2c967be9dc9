// config.rs — tunable constants, loaded from JSON with defaults for every field

use crate::easing::Easing;
use glam::Vec3;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "SLIDE_DECK_CONFIG";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Seconds for a full mode handoff.
    pub transition_duration: f32,
    /// Overrides the pose track duration; falls back to `transition_duration`.
    pub pose_duration: Option<f32>,
    /// Overrides the projection track duration; falls back to `transition_duration`.
    pub projection_duration: Option<f32>,
    pub easing: Easing,
    /// Offset along the view direction applied when entering orthographic.
    /// Negative moves the camera backwards.
    pub fly_back_distance: f32,
    pub ortho_zoom: f32,
    pub perspective_fov: f32,
    pub perspective_near: f32,
    pub perspective_far: f32,
    pub ortho_near: f32,
    pub ortho_far: f32,
    pub initial_position: [f32; 3],
    pub initial_target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            transition_duration: 1.0,
            pose_duration: None,
            projection_duration: None,
            easing: Easing::Quadratic,
            fly_back_distance: -900.0,
            ortho_zoom: 50.0,
            perspective_fov: 50.0,
            perspective_near: 0.1,
            perspective_far: 1000.0,
            ortho_near: 0.001,
            ortho_far: 10000.0,
            initial_position: [0.0, 1.0, 8.0],
            initial_target: [0.0, 0.0, 0.0],
        }
    }
}

impl CameraConfig {
    pub fn pose_duration(&self) -> f32 {
        self.pose_duration.unwrap_or(self.transition_duration)
    }

    pub fn projection_duration(&self) -> f32 {
        self.projection_duration.unwrap_or(self.transition_duration)
    }

    pub fn initial_position(&self) -> Vec3 {
        Vec3::from_array(self.initial_position)
    }

    pub fn initial_target(&self) -> Vec3 {
        Vec3::from_array(self.initial_target)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LookConfig {
    /// Radians of yaw at the horizontal edge of the viewport.
    pub sensitivity_x: f32,
    /// Radians of pitch at the vertical edge of the viewport.
    pub sensitivity_y: f32,
    /// Exponential approach rate per second. 6.3/s closes ~10% per frame at 60 Hz.
    pub decay_rate: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity_x: 0.1,
            sensitivity_y: 0.08,
            decay_rate: 6.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrbitConfig {
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// Zoom multiplier per wheel line.
    pub zoom_step: f32,
    /// Wheel lines per pixel of middle-button drag.
    pub zoom_drag_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            zoom_step: 1.1,
            zoom_drag_speed: 0.05,
            min_zoom: 1.0,
            max_zoom: 500.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeckConfig {
    pub camera: CameraConfig,
    pub look: LookConfig,
    pub orbit: OrbitConfig,
    pub window: WindowConfig,
}

fn finite(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{} is not finite", v),
        })
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    finite(field, v)?;
    if v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{} must be > 0", v),
        })
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    finite(field, v)?;
    if v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{} must be >= 0", v),
        })
    }
}

fn near_far(field: &'static str, near: f32, far: f32) -> Result<(), ConfigError> {
    positive(field, near)?;
    finite(field, far)?;
    if near < far {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("near {} must be less than far {}", near, far),
        })
    }
}

impl DeckConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.camera;
        non_negative("camera.transition_duration", c.transition_duration)?;
        non_negative("camera.pose_duration", c.pose_duration())?;
        non_negative("camera.projection_duration", c.projection_duration())?;
        finite("camera.fly_back_distance", c.fly_back_distance)?;
        positive("camera.ortho_zoom", c.ortho_zoom)?;
        positive("camera.perspective_fov", c.perspective_fov)?;
        if c.perspective_fov >= 180.0 {
            return Err(ConfigError::Invalid {
                field: "camera.perspective_fov",
                reason: format!("{} must be < 180", c.perspective_fov),
            });
        }
        near_far("camera.perspective_near", c.perspective_near, c.perspective_far)?;
        near_far("camera.ortho_near", c.ortho_near, c.ortho_far)?;
        if !c.initial_position().is_finite() || !c.initial_target().is_finite() {
            return Err(ConfigError::Invalid {
                field: "camera.initial_position",
                reason: "non-finite coordinates".to_string(),
            });
        }
        if c.initial_position() == c.initial_target() {
            return Err(ConfigError::Invalid {
                field: "camera.initial_target",
                reason: "must differ from initial_position".to_string(),
            });
        }

        let l = &self.look;
        finite("look.sensitivity_x", l.sensitivity_x)?;
        finite("look.sensitivity_y", l.sensitivity_y)?;
        non_negative("look.decay_rate", l.decay_rate)?;

        let o = &self.orbit;
        finite("orbit.rotate_speed", o.rotate_speed)?;
        positive("orbit.zoom_step", o.zoom_step)?;
        finite("orbit.zoom_drag_speed", o.zoom_drag_speed)?;
        positive("orbit.min_zoom", o.min_zoom)?;
        positive("orbit.max_zoom", o.max_zoom)?;
        if o.min_zoom > o.max_zoom {
            return Err(ConfigError::Invalid {
                field: "orbit.min_zoom",
                reason: format!("{} exceeds max_zoom {}", o.min_zoom, o.max_zoom),
            });
        }
        Ok(())
    }

    pub fn from_json_str(s: &str, path: &Path) -> Result<Self, ConfigError> {
        let cfg: DeckConfig = serde_json::from_str(s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&s, path)
    }

    /// Resolves the config path from CLI/env/asset dirs and loads it.
    /// Any failure is logged and replaced by defaults.
    pub fn resolve() -> Self {
        let Some(path) = find_config_file() else {
            log::info!("no config file found, using defaults");
            return Self::default();
        };
        match Self::load(&path) {
            Ok(cfg) => {
                log::info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("{}; falling back to defaults", e);
                Self::default()
            }
        }
    }
}

fn config_path_from_args(args: impl Iterator<Item = String>) -> Option<PathBuf> {
    let mut it = args;
    while let Some(a) = it.next() {
        if a == "--config" {
            return it.next().map(PathBuf::from);
        }
    }
    None
}

fn find_config_file() -> Option<PathBuf> {
    // CLI and env paths are returned even if missing so the error gets reported.
    if let Some(p) = config_path_from_args(std::env::args()) {
        return Some(p);
    }
    if let Ok(v) = std::env::var(CONFIG_ENV) {
        if !v.trim().is_empty() {
            return Some(PathBuf::from(v));
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("assets").join(CONFIG_FILE);
            if p.exists() {
                return Some(p);
            }
        }
    }

    let p = PathBuf::from("assets").join(CONFIG_FILE);
    if p.exists() {
        return Some(p);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<DeckConfig, ConfigError> {
        DeckConfig::from_json_str(s, Path::new("test.json"))
    }

    #[test]
    fn defaults_are_valid() {
        DeckConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = parse(r#"{ "camera": { "transition_duration": 0.8, "easing": "cubic" } }"#).unwrap();
        assert_eq!(cfg.camera.transition_duration, 0.8);
        assert_eq!(cfg.camera.easing, Easing::Cubic);
        assert_eq!(cfg.camera.pose_duration(), 0.8);
        assert_eq!(cfg.camera.ortho_zoom, 50.0);
        assert_eq!(cfg.look, LookConfig::default());
    }

    #[test]
    fn track_durations_can_differ() {
        let cfg = parse(r#"{ "camera": { "pose_duration": 1.5, "projection_duration": 0.5 } }"#).unwrap();
        assert_eq!(cfg.camera.pose_duration(), 1.5);
        assert_eq!(cfg.camera.projection_duration(), 0.5);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = parse(r#"{ "camera": { "ortho_zoom": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera.ortho_zoom", .. }));
        let err = parse(r#"{ "camera": { "perspective_fov": 190 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera.perspective_fov", .. }));
        let err = parse(r#"{ "camera": { "perspective_near": 10, "perspective_far": 1 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        let err = parse(r#"{ "orbit": { "min_zoom": 100, "max_zoom": 10 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "orbit.min_zoom", .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse("{ camera: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("test.json"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DeckConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn config_flag_is_read_from_args() {
        let args = ["deck", "--lang", "en", "--config", "my.json"].map(String::from);
        assert_eq!(
            config_path_from_args(args.into_iter()),
            Some(PathBuf::from("my.json"))
        );
        assert_eq!(config_path_from_args(["deck"].map(String::from).into_iter()), None);
    }
}
