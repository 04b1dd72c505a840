use directories::ProjectDirs;
use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use ts_rs::TS;

use super::error::{AppError, AppResult};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
const KEYRING_SERVICE: &str = "selection-popup";
const KEYRING_ACCOUNT: &str = "gemini_api_key";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "settings.ts")]
pub struct AppSettings {
    pub provider: ProviderSettings,
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "settings.ts")]
pub struct ProviderSettings {
    pub model: String,
    pub base_url: String,
    /// Left empty to fall back to the environment or the OS keyring
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "settings.ts")]
pub struct UserPreferences {
    pub dark_mode: bool,
    pub default_target_lang: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            provider: ProviderSettings {
                model: "gemini-1.5-flash".to_string(),
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                api_key: String::new(),
                timeout_secs: 60,
            },
            preferences: UserPreferences {
                dark_mode: false,
                default_target_lang: "en".to_string(),
            },
        }
    }
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "selection-popup", "selection-popup")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Config("Failed to determine config directory".to_string()))
    }

    pub async fn load() -> AppResult<Self> {
        let path = Self::get_settings_path()?;
        Self::load_from(&path).await
    }

    /// Load settings from `path`, writing the defaults there if it does not exist yet
    pub async fn load_from(path: &Path) -> AppResult<Self> {
        if !fs::try_exists(path).await? {
            info!(path = %path.display(), "settings file missing, writing defaults");
            let settings = Self::default();
            settings.save_to(path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path).await?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))
    }

    pub async fn save(&self) -> AppResult<()> {
        let path = Self::get_settings_path()?;
        self.save_to(&path).await
    }

    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

impl ProviderSettings {
    /// Resolve the provider API key: environment, then settings, then OS keyring
    pub fn resolve_api_key(&self) -> AppResult<String> {
        if let Ok(env_key) = std::env::var(API_KEY_ENV) {
            if !env_key.trim().is_empty() {
                return Ok(env_key);
            }
        }
        if !self.api_key.trim().is_empty() {
            return Ok(self.api_key.clone());
        }

        let entry = Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)?;
        let key = entry.get_password()?;
        if key.trim().is_empty() {
            return Err(AppError::MissingApiKey(format!(
                "set {} or store a key in the keyring",
                API_KEY_ENV
            )));
        }
        Ok(key)
    }
}
