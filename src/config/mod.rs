//! Application configuration
//!
//! Sources, lowest to highest priority:
//! 1. `config/default.toml`
//! 2. `config/user.toml`
//! 3. Environment variables (`QUAD_SECTION__KEY`)

use figment::{Figment, providers::{Env, Format, Toml}};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory searched by [AppConfig::load]
pub const CONFIG_DIRECTORY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config");
/// Default location of the shader sources
pub const SHADER_DIRECTORY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_DIRECTORY)
    }

    /// Loads `default.toml` and `user.toml` from `config_dir` if present, then
    /// applies `QUAD_` environment overrides (`QUAD_WINDOW__TITLE=x` sets `window.title`)
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        figment = figment.merge(Env::prefixed("QUAD_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Inner width in physical pixels
    pub width: u32,
    /// Inner height in physical pixels
    pub height: u32,
    /// Wait for vertical blank when presenting
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "GL Triangle Window".to_string(),
            width: 1000,
            height: 1000,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Background colour [r, g, b, a]
    pub clear_color: [f64; 4],
    pub shader_directory: PathBuf,
    /// Vertex shader file name, relative to `shader_directory`
    pub vertex_shader: String,
    /// Fragment shader file name, relative to `shader_directory`
    pub fragment_shader: String,
}

impl RenderConfig {
    pub fn vertex_shader_path(&self) -> PathBuf {
        self.shader_directory.join(&self.vertex_shader)
    }

    pub fn fragment_shader_path(&self) -> PathBuf {
        self.shader_directory.join(&self.fragment_shader)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            // Dark teal
            clear_color: [0.2, 0.3, 0.3, 1.0],
            shader_directory: PathBuf::from(SHADER_DIRECTORY),
            vertex_shader: "vertex.wgsl".to_string(),
            fragment_shader: "fragment.wgsl".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Movement speed in clip space units per second
    pub speed: f32,
    /// Movement speed while Left Shift is held
    pub boost_speed: f32,
    /// Uniform x/y scale applied while scaling is toggled on
    pub scale: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            boost_speed: 2.0,
            scale: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this crate's messages (error, warn, info, debug, trace, off)
    pub level: String,
}

impl LoggingConfig {
    /// Parsed [Self::level], falling back to `Info` for unknown names
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Configuration error: {message}")]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}
