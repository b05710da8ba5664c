// src/settings/mod.rs
pub mod io;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::gateway::client::DEFAULT_API_BASE;

/// Environment variable that overrides the stored API base URL.
pub const API_BASE_ENV: &str = "SHEET_MAILER_API_BASE";

#[derive(Resource, Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub api_base_url: String,
    /// Ask before a Send run, since sending can't be undone.
    pub confirm_before_send: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            confirm_before_send: true,
        }
    }
}

impl AppSettings {
    /// Applies overrides in increasing priority: environment, then CLI flag.
    pub fn with_overrides(mut self, env_base: Option<String>, cli_base: Option<String>) -> Self {
        for candidate in [env_base, cli_base].into_iter().flatten() {
            if !candidate.trim().is_empty() {
                self.api_base_url = candidate.trim().to_string();
            }
        }
        self
    }
}

/// Settings in effect, plus the reason the stored file was not used, if any.
/// Resolution runs before any log subscriber exists, so the caller reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub settings: AppSettings,
    pub load_error: Option<String>,
}

/// Loads stored settings, then layers `.env`/environment and the CLI flag on top.
pub fn resolve_settings(cli_base: Option<String>) -> ResolvedSettings {
    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();
    let (stored, load_error) = stored_or_default(io::load_settings());
    ResolvedSettings {
        settings: stored.with_overrides(std::env::var(API_BASE_ENV).ok(), cli_base),
        load_error,
    }
}

fn stored_or_default(loaded: Result<AppSettings, io::SettingsError>) -> (AppSettings, Option<String>) {
    match loaded {
        Ok(settings) => (settings, None),
        Err(e) => (
            AppSettings::default(),
            Some(format!("Settings file unusable, using defaults: {}", e)),
        ),
    }
}
