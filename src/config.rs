use std::path::Path;

use serde::Deserialize;

use crate::types::DeviceIds;
use crate::{Error, Result};

/// Cloud data centers. Projects are bound to one region; requests to any
/// other region fail authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCenter {
    China,
    #[default]
    WesternAmerica,
    EasternAmerica,
    CentralEurope,
    WesternEurope,
    India,
}

impl DataCenter {
    pub fn base_url(&self) -> &'static str {
        match self {
            DataCenter::China => "https://openapi.tuyacn.com",
            DataCenter::WesternAmerica => "https://openapi.tuyaus.com",
            DataCenter::EasternAmerica => "https://openapi-ueaz.tuyaus.com",
            DataCenter::CentralEurope => "https://openapi.tuyaeu.com",
            DataCenter::WesternEurope => "https://openapi-weaz.tuyaeu.com",
            DataCenter::India => "https://openapi.tuyain.com",
        }
    }
}

/// Startup configuration for a hub and the AC behind it.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub access_id: String,
    pub access_secret: String,
    /// IR hub device id.
    #[serde(alias = "remote_id", alias = "ir_remote_device_id")]
    pub hub_id: String,
    /// AC (or remote) device id under the hub.
    #[serde(alias = "ac_id", alias = "thermostat_device_id")]
    pub device_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Entity id of an external temperature sensor.
    #[serde(default)]
    pub sensor: Option<String>,
    #[serde(default)]
    pub data_center: DataCenter,
    /// Takes precedence over `data_center`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("access_id", &self.access_id),
            ("access_secret", &self.access_secret),
            ("hub_id", &self.hub_id),
            ("device_id", &self.device_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn device_ids(&self) -> DeviceIds {
        DeviceIds::new(&self.hub_id, &self.device_id)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.data_center.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "access_id": "id",
        "access_secret": "secret",
        "hub_id": "hub",
        "device_id": "ac"
    }"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_json_str(MINIMAL).unwrap();
        assert_eq!(config.data_center, DataCenter::WesternAmerica);
        assert_eq!(config.base_url(), "https://openapi.tuyaus.com");
        assert_eq!(config.device_ids(), DeviceIds::new("hub", "ac"));
        assert!(config.name.is_none());
    }

    #[test]
    fn accepts_platform_style_keys() {
        let config = Config::from_json_str(
            r#"{
                "access_id": "id",
                "access_secret": "secret",
                "remote_id": "hub",
                "ac_id": "ac",
                "name": "Bedroom AC",
                "sensor": "sensor.bedroom_temperature",
                "data_center": "central_europe"
            }"#,
        )
        .unwrap();
        assert_eq!(config.hub_id, "hub");
        assert_eq!(config.device_id, "ac");
        assert_eq!(config.base_url(), "https://openapi.tuyaeu.com");
        assert_eq!(config.sensor.as_deref(), Some("sensor.bedroom_temperature"));
    }

    #[test]
    fn explicit_base_url_wins() {
        let mut config = Config::from_json_str(MINIMAL).unwrap();
        config.base_url = Some("http://127.0.0.1:8080".into());
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn empty_identifier_rejected() {
        let err = Config::from_json_str(
            r#"{"access_id": "id", "access_secret": "", "hub_id": "hub", "device_id": "ac"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("access_secret")));
    }

    #[test]
    fn missing_field_is_json_error() {
        let err = Config::from_json_str(r#"{"access_id": "id"}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
