//! User preferences: color theme and which trackers are enabled
//!
//! Preferences are read from TOML. Resolution order:
//!
//! 1. An explicit path (CLI `--prefs`, server config)
//! 2. `~/.local/share/diem/config/preferences.toml`
//! 3. Embedded defaults from `config/preferences.toml`
//!
//! Keys missing from a file keep their default values.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{string_enum, TrackerKind};

const DEFAULT_PREFERENCES: &str = include_str!("../../../config/preferences.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Green,
    Blue,
    Dark,
    Cyberpunk,
}

string_enum!(Theme {
    Green => "green",
    Blue => "blue",
    Dark => "dark",
    Cyberpunk => "cyberpunk",
});

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Self::Green, Self::Blue, Self::Dark, Self::Cyberpunk]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub trackers: BTreeMap<TrackerKind, bool>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            trackers: TrackerKind::all().iter().map(|k| (*k, true)).collect(),
        }
    }
}

/// Default override location for the preferences file
pub fn default_preferences_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("diem").join("config").join("preferences.toml"))
}

#[derive(Debug, Deserialize, Serialize)]
struct RawPreferences {
    appearance: Option<RawAppearance>,
    trackers: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawAppearance {
    theme: Option<String>,
}

impl Preferences {
    /// Load preferences (explicit path first, then the default location)
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = match override_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_preferences_path(),
        };

        match path.filter(|p| p.exists()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading preferences");
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::parse(&content)
            }
            None => Self::parse(DEFAULT_PREFERENCES),
        }
    }

    /// Parse preferences from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawPreferences = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid preferences TOML: {}", e)))?;

        let mut prefs = Preferences::default();

        if let Some(theme) = raw.appearance.and_then(|a| a.theme) {
            prefs.theme = theme.parse().map_err(Error::Config)?;
        }

        if let Some(trackers) = raw.trackers {
            for (name, enabled) in trackers {
                match name.parse::<TrackerKind>() {
                    Ok(kind) => {
                        prefs.trackers.insert(kind, enabled);
                    }
                    Err(_) => tracing::warn!(tracker = %name, "Ignoring unknown tracker in preferences"),
                }
            }
        }

        Ok(prefs)
    }

    pub fn to_toml(&self) -> Result<String> {
        let raw = RawPreferences {
            appearance: Some(RawAppearance {
                theme: Some(self.theme.as_str().to_string()),
            }),
            trackers: Some(
                self.trackers
                    .iter()
                    .map(|(k, v)| (k.as_str().to_string(), *v))
                    .collect(),
            ),
        };
        toml::to_string_pretty(&raw)
            .map_err(|e| Error::Config(format!("Failed to serialize preferences: {}", e)))
    }

    /// Write preferences to `path`, or the default location when `None`
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_preferences_path()
                .ok_or_else(|| Error::Config("No data directory available".to_string()))?,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.to_toml()?)?;
        tracing::info!(path = %path.display(), theme = %self.theme, "Saved preferences");
        Ok(path)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn set_enabled(&mut self, kind: TrackerKind, enabled: bool) {
        self.trackers.insert(kind, enabled);
    }

    /// Trackers absent from the map count as enabled
    pub fn is_enabled(&self, kind: TrackerKind) -> bool {
        self.trackers.get(&kind).copied().unwrap_or(true)
    }

    /// Enabled trackers in display order
    pub fn enabled_trackers(&self) -> Vec<TrackerKind> {
        TrackerKind::all()
            .iter()
            .copied()
            .filter(|k| self.is_enabled(*k))
            .collect()
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled_trackers().len()
    }
}
