//! Settings persisted on the local device between two invocations.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::Error;

/// Session left by the `login` command. It is bound to the login application it was
/// created for; a session of another application is ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub app_id: Option<String>,
    pub user_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avnu_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<StoredSession>,
}

impl Settings {
    pub fn session_for(&self, app_id: Option<&str>) -> Option<&StoredSession> {
        self.session.as_ref().filter(|session| session.app_id.as_deref() == app_id)
    }
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings. A missing file yields the defaults.
    pub fn load(&self) -> Result<Settings, Error> {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| Error::Settings(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(Error::Settings(format!("{}: {}", self.path.display(), e))),
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::Settings(format!("{}: {}", parent.display(), e)))?;
        }

        let content = serde_json::to_string_pretty(settings).map_err(|e| Error::Settings(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| Error::Settings(format!("{}: {}", self.path.display(), e)))
    }

    pub fn update(&self, change: impl FnOnce(&mut Settings)) -> Result<Settings, Error> {
        let mut settings = self.load()?;
        change(&mut settings);
        self.save(&settings)?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::process;

    use super::*;

    fn store(name: &str) -> SettingsStore {
        let path = env::temp_dir().join(format!("gasless-{}-{}", process::id(), name)).join("settings.json");
        let _ = fs::remove_file(&path);

        SettingsStore::new(path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = store("missing");
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn api_key_is_stored_under_its_storage_name() {
        let store = store("api-key");
        store.update(|settings| settings.avnu_api_key = Some("custom".to_string())).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["avnuApiKey"], "custom");
        assert_eq!(store.load().unwrap().avnu_api_key.as_deref(), Some("custom"));
    }

    #[test]
    fn session_of_another_application_is_ignored() {
        let settings = Settings {
            avnu_api_key: None,
            session: Some(StoredSession {
                app_id: Some("app-a".to_string()),
                user_id: "user-123".to_string(),
            }),
        };

        assert!(settings.session_for(Some("app-a")).is_some());
        assert!(settings.session_for(Some("app-b")).is_none());
        assert!(settings.session_for(None).is_none());
    }
}
