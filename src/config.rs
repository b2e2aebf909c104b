//! Configuration loading and management.

use regex::Regex;
use sdbot_proto::ParseOptions;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bot identity.
    pub bot: BotConfig,
    /// Frame parser settings.
    #[serde(default)]
    pub parser: ParserConfig,
    /// Pattern-triggered replies.
    #[serde(default)]
    pub responders: Vec<ResponderConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Reject values that deserialize but cannot work.
    fn validate(&self) -> Result<(), ConfigError> {
        if sdbot_proto::to_id(&self.bot.name).is_empty() {
            return Err(ConfigError::Invalid(format!(
                "bot.name {:?} has no letters or digits",
                self.bot.name
            )));
        }
        for (index, responder) in self.responders.iter().enumerate() {
            if responder.event.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "responders[{index}].event must not be empty"
                )));
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// The bot's own username. Messages it sent itself are not dispatched.
    pub name: String,
}

/// Frame parser configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    /// Drop frames whose timestamp is not an integer (default: true).
    /// When false the timestamp falls back to zero and the frame is kept.
    #[serde(default = "default_strict_timestamps")]
    pub strict_timestamps: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_timestamps: default_strict_timestamps(),
        }
    }
}

impl ParserConfig {
    /// Parser options for [`sdbot_proto::Message::parse_with`].
    pub fn options(&self) -> ParseOptions {
        ParseOptions {
            strict_timestamps: self.strict_timestamps,
        }
    }
}

fn default_strict_timestamps() -> bool {
    true
}

/// A pattern-triggered reply.
///
/// `reply` may reference capture groups as `$1`..`$N` unless `raw` is set;
/// raw replies are sent verbatim and never expanded, since captured text
/// is user-supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponderConfig {
    /// Event name the responder claims messages under.
    pub event: String,
    /// Pattern matched against the message body. Each block compiles its
    /// own pattern, so it claims messages independently of other blocks.
    #[serde(deserialize_with = "deserialize_regex")]
    pub pattern: Arc<Regex>,
    /// Reply text.
    pub reply: String,
    /// Send without the sender prefix.
    #[serde(default)]
    pub raw: bool,
    /// Only answer private messages.
    #[serde(default)]
    pub private_only: bool,
}

fn deserialize_regex<'de, D>(deserializer: D) -> Result<Arc<Regex>, D::Error>
where
    D: Deserializer<'de>,
{
    let source = String::deserialize(deserializer)?;
    Regex::new(&source)
        .map(Arc::new)
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[bot]
name = "Sd Bot"

[parser]
strict_timestamps = false

[[responders]]
event = "greet"
pattern = "^!hello$"
reply = "hi there"

[[responders]]
event = "roll"
pattern = '^!roll (\d+)$'
reply = "rolling a d$1"
private_only = true
"#;

    #[test]
    fn test_parse_sample() {
        let config: Config = SAMPLE.parse().unwrap();
        assert_eq!(config.bot.name, "Sd Bot");
        assert!(!config.parser.strict_timestamps);
        assert!(!config.parser.options().strict_timestamps);
        assert_eq!(config.responders.len(), 2);
        assert!(config.responders[0].pattern.is_match("!hello"));
        assert!(!config.responders[0].raw);
        assert!(config.responders[1].private_only);
    }

    #[test]
    fn test_defaults() {
        let config: Config = "[bot]\nname = \"bot\"\n".parse().unwrap();
        assert!(config.parser.strict_timestamps);
        assert!(config.responders.is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let toml = r#"
[bot]
name = "bot"

[[responders]]
event = "broken"
pattern = "(unclosed"
reply = "x"
"#;
        let err = toml.parse::<Config>().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_name() {
        let err = "[bot]\nname = \"---\"\n".parse::<Config>().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_empty_event() {
        let toml = "[bot]\nname = \"bot\"\n[[responders]]\nevent = \"\"\npattern = \"x\"\nreply = \"y\"\n";
        let err = toml.parse::<Config>().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.responders[1].event, "roll");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/sdbot.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
