use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Read},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::{Error, Result};

const DEFAULT_API_BASE_URL: &str = match option_env!("FOLIO_API_BASE_URL") {
    Some(url) => url,
    None => "https://photographer-protfolio.vercel.app",
};
const DEFAULT_UPLOAD_URL: &str = "https://api.cloudinary.com/v1_1/dqfum2awz/image/upload";
const DEFAULT_UPLOAD_PRESET: &str = "shivbandhan";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_FILTER: &str = "folio_studio=info,warn";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    pub api_base_url: StrSetting,
    pub upload_url: StrSetting,
    pub upload_preset: StrSetting,
    pub request_timeout: U64Setting,
    pub log_filter: StrSetting,
    pub log_dir: StrSetting,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StrSetting {
    pub name: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct U64Setting {
    pub name: String,
    pub value: u64,
}

impl StrSetting {
    fn new(name: &str, value: impl Into<String>) -> Self {
        StrSetting {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        let log_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("folio-studio")
            .join("logs");
        Settings {
            api_base_url: StrSetting::new("API Base URL", DEFAULT_API_BASE_URL),
            upload_url: StrSetting::new("Image Upload URL", DEFAULT_UPLOAD_URL),
            upload_preset: StrSetting::new("Image Upload Preset", DEFAULT_UPLOAD_PRESET),
            request_timeout: U64Setting {
                name: "Request Timeout (seconds)".to_string(),
                value: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            log_filter: StrSetting::new("Log Filter", DEFAULT_LOG_FILTER),
            log_dir: StrSetting::new("Log Directory", log_dir.to_string_lossy()),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|error| {
            Error::config(format!("cannot open {}: {}", path.display(), error))
        })?;
        let mut buffer = Vec::new();
        BufReader::new(file).read_to_end(&mut buffer)?;
        let settings = serde_json::from_slice::<Settings>(&buffer).map_err(|error| {
            Error::config(format!("invalid settings in {}: {}", path.display(), error))
        })?;
        settings.check()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Defaults when the file is absent; any other failure propagates.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match File::open(path) {
            Ok(_) => Self::load(path),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::info!("No settings at {}, using defaults", path.display());
                Ok(Self::new())
            }
            Err(error) => Err(Error::config(format!(
                "cannot open {}: {}",
                path.display(),
                error
            ))),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.value)
    }

    fn check(&self) -> Result<()> {
        for setting in [&self.api_base_url, &self.upload_url] {
            let value = setting.value.trim();
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(Error::config(format!(
                    "{} must be an http(s) URL, got \"{}\"",
                    setting.name, setting.value
                )));
            }
        }
        if self.request_timeout.value == 0 {
            return Err(Error::config(format!(
                "{} must be greater than zero",
                self.request_timeout.name
            )));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert_eq!(settings.upload_preset.value, "shivbandhan");
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert!(settings.api_base_url.value.starts_with("http"));
        assert!(settings.check().is_ok());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::new();
        settings.api_base_url.value = "http://127.0.0.1:4010".to_string();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, Settings::new());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load_or_default(&path),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::new();
        settings.request_timeout.value = 0;
        settings.save(&path).unwrap();
        let err = Settings::load(&path).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }
}
