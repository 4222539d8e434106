use serde::Deserialize;
use std::path::Path;

/// Player configuration, loaded from an optional YAML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Jitterbuffer latency of the RTSP source in milliseconds
    pub latency: u32,
    /// Element factory used to render video
    pub video_sink: String,
    /// Element factory used to render audio
    pub audio_sink: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            latency: 200,
            video_sink: "autovideosink".to_string(),
            audio_sink: "autoaudiosink".to_string(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::IoError(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.video_sink.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "video_sink must not be empty".to_string(),
            ));
        }
        if self.audio_sink.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "audio_sink must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
