//! Hub configuration at ~/.config/eventhub/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{HubError, HubResult};
use crate::mock::{DEFAULT_LOGIN_LATENCY, DEFAULT_LOGOUT_LATENCY, DEFAULT_PERSIST_LATENCY};
use crate::zone::CalendarZone;

static DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// IANA zone whose calendar days are used for date filtering.
    pub timezone: String,

    #[serde(with = "duration_text")]
    pub login_latency: Duration,

    #[serde(with = "duration_text")]
    pub logout_latency: Duration,

    #[serde(with = "duration_text")]
    pub persist_latency: Duration,

    /// Start with the sample events.
    pub seed_sample_events: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        HubConfig {
            timezone: DEFAULT_TIMEZONE.to_string(),
            login_latency: DEFAULT_LOGIN_LATENCY,
            logout_latency: DEFAULT_LOGOUT_LATENCY,
            persist_latency: DEFAULT_PERSIST_LATENCY,
            seed_sample_events: true,
        }
    }
}

impl HubConfig {
    pub fn config_path() -> HubResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| HubError::Config("Could not determine config directory".into()))?
            .join("eventhub");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, writing a commented-out default first if none exists.
    pub fn load() -> HubResult<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            Self::create_default_config(&path)?;
        }

        Self::load_from(&path)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> HubResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| HubError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| HubError::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> HubResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| HubError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| HubError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn zone(&self) -> HubResult<CalendarZone> {
        CalendarZone::from_name(&self.timezone)
    }

    /// Create a config file with all options commented out.
    pub fn create_default_config(path: &Path) -> HubResult<()> {
        let contents = format!(
            "\
# eventhub configuration

# Timezone whose calendar days are used when filtering events by date:
# timezone = \"{}\"

# Simulated backend latency:
# login_latency = \"{}\"
# logout_latency = \"{}\"
# persist_latency = \"{}\"

# Start with a few sample events:
# seed_sample_events = true
",
            DEFAULT_TIMEZONE,
            humantime::format_duration(DEFAULT_LOGIN_LATENCY),
            humantime::format_duration(DEFAULT_LOGOUT_LATENCY),
            humantime::format_duration(DEFAULT_PERSIST_LATENCY),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                HubError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| HubError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// Durations written as "500ms", "1s", "1m 30s".
mod duration_text {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
