// ABOUTME: Console configuration resolved once from defaults, an optional TOML file and CLI overrides
// The resolved record is immutable; a widget is never built from a partial or invalid config

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Path component of the half-duplex log stream
pub const STREAM_PATH: &str = "/stdoutstream";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Whether the console only displays inbound frames or also composes and sends lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplMode {
    #[default]
    HalfDuplex,
    FullDuplex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub path: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8765,
            protocol: "ws".to_string(),
            path: Some(STREAM_PATH.to_string()),
        }
    }
}

impl EndpointConfig {
    /// `protocol://host:port[/path]`
    pub fn url(&self) -> String {
        let base = format!("{}://{}:{}", self.protocol, self.host, self.port);
        match self.path.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) if path.starts_with('/') => format!("{base}{path}"),
            Some(path) => format!("{base}/{path}"),
            None => base,
        }
    }
}

/// Box model for one pane. Unset properties are left out of the stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxStyle {
    pub margin: Option<String>,
    pub padding: Option<String>,
    pub height: Option<String>,
    pub width: Option<String>,
    pub border_width: Option<String>,
    pub border_color: Option<String>,
    pub border_style: Option<String>,
    pub text_align: Option<String>,
    pub overflow: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub send_color: String,
    pub reply_color: String,
    pub open_background: String,
    pub closed_background: String,
    pub cursor: String,
    pub output: BoxStyle,
    pub input: BoxStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let some = |s: &str| Some(s.to_string());
        Self {
            send_color: "white".to_string(),
            reply_color: "white".to_string(),
            open_background: "#0a0a0a".to_string(),
            closed_background: "#933".to_string(),
            cursor: "$ ".to_string(),
            output: BoxStyle {
                margin: some("0.4em auto 0.4em 0.4em"),
                padding: some("0.4em"),
                height: some("640px"),
                width: some("1000px"),
                border_width: some("0.1em"),
                border_color: some("#000"),
                border_style: some("solid"),
                text_align: some("left"),
                overflow: some("auto"),
            },
            input: BoxStyle {
                margin: some("0px auto auto 0.4em"),
                padding: some("0.2em"),
                height: some("2em"),
                width: some("100%"),
                ..BoxStyle::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    pub mode: ReplMode,
    pub endpoint: EndpointConfig,
    pub experiment_namespace: String,
    pub experiment_id: String,
    /// Maximum retained transcript lines
    pub capacity: usize,
    pub output_element_id: String,
    pub input_element_id: String,
    pub style: StyleConfig,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            mode: ReplMode::HalfDuplex,
            endpoint: EndpointConfig::default(),
            experiment_namespace: String::new(),
            experiment_id: String::new(),
            capacity: 500,
            output_element_id: "output".to_string(),
            input_element_id: "msg".to_string(),
            style: StyleConfig::default(),
        }
    }
}

/// Caller-supplied values merged over whatever the file provided
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub mode: Option<ReplMode>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub protocol: Option<String>,
    pub experiment_namespace: Option<String>,
    pub experiment_id: Option<String>,
    pub capacity: Option<usize>,
}

impl ReplConfig {
    /// Default location: `<config dir>/ws-repl/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ws-repl").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from an explicit file, else the default location if it exists, else defaults.
    /// The result is not validated yet.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => path,
                None => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Defaults <- file <- overrides, then validation
    pub fn resolve(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if let Some(host) = overrides.host {
            self.endpoint.host = host;
        }
        if let Some(port) = overrides.port {
            self.endpoint.port = port;
        }
        if let Some(protocol) = overrides.protocol {
            self.endpoint.protocol = protocol;
        }
        if let Some(namespace) = overrides.experiment_namespace {
            self.experiment_namespace = namespace;
        }
        if let Some(id) = overrides.experiment_id {
            self.experiment_id = id;
        }
        if let Some(capacity) = overrides.capacity {
            self.capacity = capacity;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be at least 1".into()));
        }
        if self.output_element_id.trim().is_empty() {
            return Err(ConfigError::Invalid("output element id is empty".into()));
        }
        if self.mode == ReplMode::FullDuplex && self.input_element_id.trim().is_empty() {
            return Err(ConfigError::Invalid("input element id is empty".into()));
        }
        if self.endpoint.host.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint host is empty".into()));
        }
        if self.endpoint.port == 0 {
            return Err(ConfigError::Invalid("endpoint port must be non-zero".into()));
        }
        if !matches!(self.endpoint.protocol.as_str(), "ws" | "wss") {
            return Err(ConfigError::Invalid(format!(
                "unsupported protocol '{}', expected ws or wss",
                self.endpoint.protocol
            )));
        }
        Ok(())
    }

    /// The endpoint actually dialled: full-duplex consoles connect to the bare host:port
    pub fn effective_endpoint(&self) -> EndpointConfig {
        let mut endpoint = self.endpoint.clone();
        if self.mode == ReplMode::FullDuplex {
            endpoint.path = None;
        }
        endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn default_url_targets_log_stream() {
        let config = ReplConfig::default();
        assert_eq!(config.effective_endpoint().url(), "ws://127.0.0.1:8765/stdoutstream");
    }

    #[test]
    fn full_duplex_drops_path() {
        let config = ReplConfig {
            mode: ReplMode::FullDuplex,
            ..ReplConfig::default()
        };
        assert_eq!(config.effective_endpoint().url(), "ws://127.0.0.1:8765");
    }

    #[test]
    fn path_without_leading_slash_is_joined() {
        let endpoint = EndpointConfig {
            path: Some("logs".into()),
            ..EndpointConfig::default()
        };
        assert_eq!(endpoint.url(), "ws://127.0.0.1:8765/logs");
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
capacity = 50
experiment_namespace = "vision"

[endpoint]
host = "gpu-box"

[style]
reply_color = "#0f0"
"##
        )
        .unwrap();

        let config = ReplConfig::resolve(Some(file.path()), ConfigOverrides::default()).unwrap();
        assert_eq!(config.capacity, 50);
        assert_eq!(config.experiment_namespace, "vision");
        assert_eq!(config.endpoint.host, "gpu-box");
        assert_eq!(config.endpoint.port, 8765);
        assert_eq!(config.style.reply_color, "#0f0");
        assert_eq!(config.style.cursor, "$ ");
    }

    #[test]
    fn overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "capacity = 50").unwrap();

        let overrides = ConfigOverrides {
            capacity: Some(3),
            port: Some(9000),
            ..ConfigOverrides::default()
        };
        let config = ReplConfig::resolve(Some(file.path()), overrides).unwrap();
        assert_eq!(config.capacity, 3);
        assert_eq!(config.endpoint.port, 9000);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = ReplConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_capacity = ReplConfig {
            capacity: 0,
            ..ReplConfig::default()
        };
        assert!(zero_capacity.validate().is_err());

        let mut bad_protocol = ReplConfig::default();
        bad_protocol.endpoint.protocol = "http".into();
        assert!(bad_protocol.validate().is_err());

        let no_target = ReplConfig {
            output_element_id: " ".into(),
            ..ReplConfig::default()
        };
        assert!(matches!(no_target.validate(), Err(ConfigError::Invalid(_))));
    }
}
