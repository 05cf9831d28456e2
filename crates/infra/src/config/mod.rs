//! Setting storage.

use std::collections::HashMap;
use std::sync::RwLock;

use loyalty_points::{ConfigError, ConfigurationStore, PointRateConfig, SettingKey};

/// In-memory settings table: key → raw JSON value.
///
/// Values are stored as the platform stores them (serialized JSON) and parsed
/// on every read, so an update is visible to the next evaluation.
#[derive(Debug, Default)]
pub struct InMemorySettingStore {
    settings: RwLock<HashMap<SettingKey, String>>,
}

impl InMemorySettingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `raw` under `key`, replacing any previous value.
    pub fn put(&self, key: SettingKey, raw: impl Into<String>) -> Result<(), ConfigError> {
        let mut settings = self
            .settings
            .write()
            .map_err(|_| ConfigError::Unavailable("lock poisoned".to_string()))?;
        settings.insert(key, raw.into());
        Ok(())
    }

    pub fn remove(&self, key: SettingKey) -> Result<Option<String>, ConfigError> {
        let mut settings = self
            .settings
            .write()
            .map_err(|_| ConfigError::Unavailable("lock poisoned".to_string()))?;
        Ok(settings.remove(&key))
    }

    pub fn get(&self, key: SettingKey) -> Result<Option<String>, ConfigError> {
        let settings = self
            .settings
            .read()
            .map_err(|_| ConfigError::Unavailable("lock poisoned".to_string()))?;
        Ok(settings.get(&key).cloned())
    }
}

impl ConfigurationStore for InMemorySettingStore {
    fn point_rates(&self) -> Result<PointRateConfig, ConfigError> {
        let raw = self
            .get(SettingKey::PointSetting)?
            .ok_or(ConfigError::ConfigurationMissing)?;
        PointRateConfig::from_setting_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_setting_is_missing() {
        let store = InMemorySettingStore::new();

        assert_eq!(store.point_rates(), Err(ConfigError::ConfigurationMissing));
    }

    #[test]
    fn updates_are_visible_on_next_read() {
        let store = InMemorySettingStore::new();
        store
            .put(SettingKey::PointSetting, r#"{"register":10,"comment":1,"money":1}"#)
            .unwrap();
        assert_eq!(store.point_rates().unwrap().registration_bonus(), 10);

        store
            .put(SettingKey::PointSetting, r#"{"register":20,"comment":1,"money":1}"#)
            .unwrap();
        assert_eq!(store.point_rates().unwrap().registration_bonus(), 20);

        store.remove(SettingKey::PointSetting).unwrap();
        assert_eq!(store.point_rates(), Err(ConfigError::ConfigurationMissing));
    }

    #[test]
    fn malformed_setting_is_invalid_not_defaulted() {
        let store = InMemorySettingStore::new();
        store.put(SettingKey::PointSetting, "{not json").unwrap();

        assert!(matches!(store.point_rates(), Err(ConfigError::Invalid(_))));
    }
}
