use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub tick_interval_ms: u64,
    /// How long a completed action keeps its celebration flag.
    pub celebration_ms: u64,
    /// Delay between the last action being handled and the completion prompt.
    pub completion_prompt_delay_ms: u64,
    pub swipe_animation_ms: u64,
    /// Forward pause/resume timestamps to the backend as they happen.
    pub sync_pauses: bool,
    pub debug: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_secs: 15,
            tick_interval_ms: 1_000,
            celebration_ms: 3_000,
            completion_prompt_delay_ms: 3_500,
            swipe_animation_ms: 300,
            sync_pauses: true,
            debug: false,
        }
    }
}

impl SessionSettings {
    /// Defaults overlaid with `CULTIVATE_API_BASE_URL` and `CULTIVATE_DEBUG`.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("CULTIVATE_API_BASE_URL") {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
        if let Ok(value) = std::env::var("CULTIVATE_DEBUG") {
            self.debug = value == "1" || value.eq_ignore_ascii_case("true");
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            bail!("api_base_url must not be empty");
        }
        if self.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be greater than zero");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn celebration(&self) -> Duration {
        Duration::from_millis(self.celebration_ms)
    }

    pub fn completion_prompt_delay(&self) -> Duration {
        Duration::from_millis(self.completion_prompt_delay_ms)
    }

    pub fn swipe_animation(&self) -> Duration {
        Duration::from_millis(self.swipe_animation_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Settings persisted as pretty JSON, cached in memory.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<SessionSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring unreadable settings at {}: {err}",
                    path.display()
                );
                SessionSettings::default()
            })
        } else {
            SessionSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> SessionSettings {
        self.read().clone()
    }

    pub fn update(&self, settings: SessionSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.write();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: SessionSettings = serde_json::from_str(&contents)?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &SessionSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
