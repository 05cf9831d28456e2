//! Point-rate setting and the store that supplies it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use loyalty_core::{DomainError, PointRate};

use crate::error::ConfigError;

/// Keys of platform settings read by this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettingKey {
    PointSetting,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::PointSetting => "POINT_SETTING",
        }
    }
}

/// Immutable snapshot of the point-earning rates.
///
/// Stored by the platform as a JSON setting value:
/// `{"register": 100, "comment": 10, "money": 1}`. Other keys present in the
/// stored setting are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredPointSetting", into = "StoredPointSetting")]
pub struct PointRateConfig {
    registration_bonus: i64,
    review_bonus: i64,
    earn_rate_per_currency_unit: PointRate,
}

impl PointRateConfig {
    pub fn new(
        registration_bonus: i64,
        review_bonus: i64,
        earn_rate_per_currency_unit: PointRate,
    ) -> Result<Self, DomainError> {
        if registration_bonus < 0 {
            return Err(DomainError::validation("registration bonus must not be negative"));
        }
        if review_bonus < 0 {
            return Err(DomainError::validation("review bonus must not be negative"));
        }
        Ok(Self {
            registration_bonus,
            review_bonus,
            earn_rate_per_currency_unit,
        })
    }

    /// Parse a stored setting value.
    pub fn from_setting_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn registration_bonus(&self) -> i64 {
        self.registration_bonus
    }

    pub fn review_bonus(&self) -> i64 {
        self.review_bonus
    }

    pub fn earn_rate_per_currency_unit(&self) -> PointRate {
        self.earn_rate_per_currency_unit
    }
}

/// Wire shape of the stored setting.
#[derive(Serialize, Deserialize)]
struct StoredPointSetting {
    register: i64,
    comment: i64,
    money: PointRate,
}

impl TryFrom<StoredPointSetting> for PointRateConfig {
    type Error = DomainError;

    fn try_from(value: StoredPointSetting) -> Result<Self, Self::Error> {
        PointRateConfig::new(value.register, value.comment, value.money)
    }
}

impl From<PointRateConfig> for StoredPointSetting {
    fn from(value: PointRateConfig) -> Self {
        Self {
            register: value.registration_bonus,
            comment: value.review_bonus,
            money: value.earn_rate_per_currency_unit,
        }
    }
}

/// Supplies the current point rates.
///
/// Implementations may re-read storage on every call; callers must not assume
/// caching. A missing setting is an error, never a silent default.
pub trait ConfigurationStore: Send + Sync {
    fn point_rates(&self) -> Result<PointRateConfig, ConfigError>;
}

/// A snapshot is its own (fixed) store.
impl ConfigurationStore for PointRateConfig {
    fn point_rates(&self) -> Result<PointRateConfig, ConfigError> {
        Ok(self.clone())
    }
}

impl<C> ConfigurationStore for Arc<C>
where
    C: ConfigurationStore + ?Sized,
{
    fn point_rates(&self) -> Result<PointRateConfig, ConfigError> {
        (**self).point_rates()
    }
}
