// src/settings/io.rs
use bevy::log::{error, info};
use directories_next::ProjectDirs;
use std::fs;
use std::io::{self, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::AppSettings;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "SheetMailer";
const APPLICATION: &str = "SheetMailer";
const CONFIG_FILE: &str = "app_settings.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not determine the config directory for app settings")]
    NoConfigDir,
    #[error("Settings I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Settings file {path:?} is not valid JSON: {message}")]
    Parse { path: PathBuf, message: String },
}

pub fn config_path() -> Result<PathBuf, SettingsError> {
    let proj_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or(SettingsError::NoConfigDir)?;
    Ok(proj_dirs.config_dir().join(CONFIG_FILE))
}

pub fn load_settings() -> Result<AppSettings, SettingsError> {
    load_settings_from(&config_path()?)
}

pub fn save_settings(settings: &AppSettings) -> Result<(), SettingsError> {
    save_settings_to(&config_path()?, settings)
}

/// A missing file yields defaults; an unreadable or malformed one is an error.
pub fn load_settings_from(path: &Path) -> Result<AppSettings, SettingsError> {
    info!("AppSettings: loading from {:?}", path);
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("AppSettings: no settings file at {:?}, using defaults", path);
            return Ok(AppSettings::default());
        }
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        error!("AppSettings: failed to parse {:?}: {}", path, e);
        SettingsError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    let io_err = |source: io::Error| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    info!("AppSettings: saving to {:?}", path);
    let mut writer = BufWriter::new(fs::File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, settings)
        .map_err(|e| io_err(io::Error::new(ErrorKind::Other, e)))?;
    writer.flush().map_err(io_err)
}
