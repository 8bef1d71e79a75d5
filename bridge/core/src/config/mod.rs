//! TOML Configuration File Support
//!
//! Loads settings for kak-surface from `~/.config/kak-surface/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (see [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Environment Variables
//!
//! | Variable              | Setting            |
//! |-----------------------|--------------------|
//! | `KAK_SURFACE_EDITOR`  | `editor.command`   |
//! | `KAK_SURFACE_SESSION` | `editor.session`   |
//! | `KAK_SURFACE_LOG`     | `log.level`        |
//!
//! # Example Configuration
//!
//! ```toml
//! [editor]
//! command = "kak"
//! args = ["-n"]
//! session = "main"
//! create_session = false
//!
//! [ui]
//! status_on_top = false
//! resize_debounce_ms = 50
//!
//! [faces]
//! default_fg = "white"
//! default_bg = "black"
//! padding_fg = "#999999"
//!
//! [log]
//! level = "debug"
//! file = "/tmp/kak-surface.log"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::Face;
use crate::resize::DEFAULT_DEBOUNCE;
use crate::transport::{EditorCommand, SessionTarget};

/// Upper bound for `ui.resize_debounce_ms`
pub const MAX_RESIZE_DEBOUNCE_MS: u64 = 5000;

/// Environment variable overriding the editor binary
pub const ENV_EDITOR: &str = "KAK_SURFACE_EDITOR";
/// Environment variable naming the session to join
pub const ENV_SESSION: &str = "KAK_SURFACE_SESSION";
/// Environment variable overriding the log level
pub const ENV_LOG: &str = "KAK_SURFACE_LOG";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[editor]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorToml {
    /// Editor binary
    pub command: Option<String>,

    /// Extra arguments, placed before `-ui json`
    pub args: Option<Vec<String>>,

    /// Session to join or create
    pub session: Option<String>,

    /// Create the session (`-s`) instead of joining it (`-c`)
    pub create_session: Option<bool>,
}

/// `[ui]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiToml {
    /// Draw the status bar on the first row
    pub status_on_top: Option<bool>,

    /// Quiet period before a resize reaches the editor
    pub resize_debounce_ms: Option<u64>,
}

/// `[faces]` section: faces used before the editor sends its own
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacesToml {
    /// Default foreground
    pub default_fg: Option<String>,

    /// Default background (also the padding background)
    pub default_bg: Option<String>,

    /// Foreground of the area past the buffer end
    pub padding_fg: Option<String>,
}

/// `[log]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogToml {
    /// Log level or `EnvFilter` directive
    pub level: Option<String>,

    /// Log file path
    pub file: Option<PathBuf>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceToml {
    /// Editor process
    pub editor: EditorToml,

    /// Layout and resize behavior
    pub ui: UiToml,

    /// Startup faces
    pub faces: FacesToml,

    /// Logging
    pub log: LogToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration for one kak-surface run
#[derive(Clone, Debug)]
pub struct SurfaceConfig {
    /// Editor binary
    pub editor_command: String,

    /// Extra editor arguments
    pub editor_args: Vec<String>,

    /// Session to join or create
    pub session: Option<String>,

    /// Create the session instead of joining it
    pub create_session: bool,

    /// Status bar on the first row
    pub status_on_top: bool,

    /// Resize debounce
    pub resize_debounce: Duration,

    /// Default face until the first `draw`
    pub default_face: Face,

    /// Padding face until the first `draw`
    pub padding_face: Face,

    /// Log level or filter directive
    pub log_level: String,

    /// Log file (`None` = [`default_log_path`])
    pub log_file: Option<PathBuf>,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            editor_command: "kak".to_string(),
            editor_args: Vec::new(),
            session: None,
            create_session: false,
            status_on_top: false,
            resize_debounce: DEFAULT_DEBOUNCE,
            default_face: Face::new("white", "black"),
            padding_face: Face::new("#999999", "black"),
            log_level: "info".to_string(),
            log_file: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl SurfaceConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// How to address the editor session
    #[must_use]
    pub fn session_target(&self) -> SessionTarget {
        match (&self.session, self.create_session) {
            (None, _) => SessionTarget::Anonymous,
            (Some(name), false) => SessionTarget::Connect(name.clone()),
            (Some(name), true) => SessionTarget::Create(name.clone()),
        }
    }

    /// The editor command line described by this configuration
    #[must_use]
    pub fn editor(&self) -> EditorCommand {
        EditorCommand::new(&self.editor_command)
            .with_args(self.editor_args.iter().cloned())
            .with_target(self.session_target())
    }

    /// Log file to write to
    #[must_use]
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(default_log_path)
    }

    /// Check values that cannot be expressed in the types
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor_command.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "editor.command must not be empty".to_string(),
            ));
        }
        if self.resize_debounce > Duration::from_millis(MAX_RESIZE_DEBOUNCE_MS) {
            return Err(ConfigError::ValidationError(format!(
                "ui.resize_debounce_ms must be at most {MAX_RESIZE_DEBOUNCE_MS}"
            )));
        }
        if matches!(&self.session, Some(name) if name.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "editor.session must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/kak-surface/config.toml` or
/// `~/.config/kak-surface/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("kak-surface").join("config.toml"))
}

/// Get the default log file path
///
/// The terminal owns stdout, so logs always go to a file.
#[must_use]
pub fn default_log_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|p| p.join("kak-surface").join("kak-surface.log"))
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if a
/// value is out of range. A missing config file is not an error.
pub fn load_config() -> Result<SurfaceConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if a value is out of range.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<SurfaceConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SurfaceConfig, ConfigError> {
    let mut config = SurfaceConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: SurfaceToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut SurfaceConfig, toml: &SurfaceToml) {
    // Editor
    if let Some(ref command) = toml.editor.command {
        config.editor_command.clone_from(command);
    }
    if let Some(ref args) = toml.editor.args {
        config.editor_args.clone_from(args);
    }
    if toml.editor.session.is_some() {
        config.session.clone_from(&toml.editor.session);
    }
    if let Some(create) = toml.editor.create_session {
        config.create_session = create;
    }

    // UI
    if let Some(on_top) = toml.ui.status_on_top {
        config.status_on_top = on_top;
    }
    if let Some(ms) = toml.ui.resize_debounce_ms {
        config.resize_debounce = Duration::from_millis(ms);
    }

    // Faces
    if let Some(ref fg) = toml.faces.default_fg {
        config.default_face.fg = fg.as_str().into();
    }
    if let Some(ref bg) = toml.faces.default_bg {
        config.default_face.bg = bg.as_str().into();
        config.padding_face.bg = bg.as_str().into();
    }
    if let Some(ref fg) = toml.faces.padding_fg {
        config.padding_face.fg = fg.as_str().into();
    }

    // Log
    if let Some(ref level) = toml.log.level {
        config.log_level.clone_from(level);
    }
    if toml.log.file.is_some() {
        config.log_file.clone_from(&toml.log.file);
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut SurfaceConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(command) = env(ENV_EDITOR).filter(|v| !v.is_empty()) {
        config.editor_command = command;
        config.source = ConfigSource::Env;
    }
    if let Some(session) = env(ENV_SESSION).filter(|v| !v.is_empty()) {
        config.session = Some(session);
        config.source = ConfigSource::Env;
    }
    if let Some(level) = env(ENV_LOG).filter(|v| !v.is_empty()) {
        config.log_level = level;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Editor binary override
    pub editor_command: Option<String>,

    /// Session to join (`-c`)
    pub connect: Option<String>,

    /// Session to create (`-s`)
    pub create: Option<String>,

    /// Status bar placement override
    pub status_on_top: Option<bool>,

    /// Log file override
    pub log_file: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set editor binary override
    #[must_use]
    pub fn with_editor_command(mut self, command: String) -> Self {
        self.editor_command = Some(command);
        self
    }

    /// Join an existing session
    #[must_use]
    pub fn with_connect(mut self, session: String) -> Self {
        self.connect = Some(session);
        self
    }

    /// Create a new session
    #[must_use]
    pub fn with_create(mut self, session: String) -> Self {
        self.create = Some(session);
        self
    }

    /// Set status bar placement override
    #[must_use]
    pub fn with_status_on_top(mut self, on_top: bool) -> Self {
        self.status_on_top = Some(on_top);
        self
    }

    /// Set log file override
    #[must_use]
    pub fn with_log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut SurfaceConfig) {
        if self.editor_command.is_some()
            || self.connect.is_some()
            || self.create.is_some()
            || self.status_on_top.is_some()
            || self.log_file.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref command) = self.editor_command {
            config.editor_command.clone_from(command);
        }

        if let Some(ref session) = self.connect {
            config.session = Some(session.clone());
            config.create_session = false;
        }

        // -s wins when both are given
        if let Some(ref session) = self.create {
            config.session = Some(session.clone());
            config.create_session = true;
        }

        if let Some(on_top) = self.status_on_top {
            config.status_on_top = on_top;
        }

        if let Some(ref path) = self.log_file {
            config.log_file = Some(path.clone());
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
