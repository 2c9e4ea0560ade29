use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::client::TuyaClient;
use crate::config::Config;
use crate::device::{Device, ServiceCall};
use crate::transport::{HttpTransport, Transport};
use crate::types::*;
use crate::{Error, Result};

pub const MIN_TEMP_C: f64 = 15.0;
pub const MAX_TEMP_C: f64 = 30.0;
pub const TEMPERATURE_UNIT: &str = "\u{00b0}C";

/// Controls a host may offer for the thermostat.
pub const SUPPORTED_FEATURES: &[&str] = &["target_temperature", "fan_mode"];

/// An IR-controlled air conditioner exposed as a thermostat.
///
/// State is the last `ac/status` snapshot; writes go straight to the cloud
/// and are only reflected after the next [`Thermostat::update`].
pub struct Thermostat<T = HttpTransport> {
    client: TuyaClient<T>,
    name: String,
    status: AcStatus,
    sensor: Option<String>,
    sensor_reading: Option<String>,
}

impl Thermostat<HttpTransport> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = TuyaClient::from_config(config)?;
        let name = config
            .name
            .clone()
            .unwrap_or_else(|| "Tuya Thermostat".to_string());
        let mut thermostat = Thermostat::new(client, name);
        thermostat.sensor = config.sensor.clone();
        Ok(thermostat)
    }
}

impl<T: Transport> Thermostat<T> {
    pub fn new(client: TuyaClient<T>, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
            status: AcStatus::default(),
            sensor: None,
            sensor_reading: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> String {
        format!("tuya_thermostat_{}", self.client.device_ids().remote_id)
    }

    pub fn status(&self) -> &AcStatus {
        &self.status
    }

    /// Entity id of the external temperature sensor, if configured.
    pub fn sensor(&self) -> Option<&str> {
        self.sensor.as_deref()
    }

    /// Feeds the latest raw state of the external sensor (e.g. `"21.4"` or
    /// `"unknown"`).
    pub fn set_sensor_reading(&mut self, reading: Option<String>) {
        self.sensor_reading = reading;
    }

    pub fn temperature_unit(&self) -> &'static str {
        TEMPERATURE_UNIT
    }

    pub fn min_temp(&self) -> f64 {
        MIN_TEMP_C
    }

    pub fn max_temp(&self) -> f64 {
        MAX_TEMP_C
    }

    /// External sensor reading when usable, otherwise the setpoint.
    pub fn current_temperature(&self) -> Option<f64> {
        if let Some(ref reading) = self.sensor_reading
            && reading != "unknown"
        {
            match reading.parse() {
                Ok(v) => return Some(v),
                Err(_) => warn!(reading = %reading, "invalid sensor state"),
            }
        }
        self.target_temperature()
    }

    pub fn target_temperature(&self) -> Option<f64> {
        self.status.temp.as_deref().and_then(|t| t.parse().ok())
    }

    pub fn hvac_mode(&self) -> Option<HvacMode> {
        if self.status.is_powered_off() {
            return Some(HvacMode::Off);
        }
        self.status.mode.as_deref().and_then(HvacMode::from_tuya_code)
    }

    pub fn hvac_modes(&self) -> Vec<&'static str> {
        HvacMode::ALL.iter().map(|m| m.label()).collect()
    }

    pub fn fan_mode(&self) -> Option<FanSpeed> {
        self.status.wind.as_deref().and_then(FanSpeed::from_tuya_code)
    }

    pub fn fan_modes(&self) -> Vec<&'static str> {
        FanSpeed::ALL.iter().map(|f| f.label()).collect()
    }

    pub fn supported_features(&self) -> &'static [&'static str] {
        SUPPORTED_FEATURES
    }

    /// Refreshes the cached snapshot. A failed fetch, or a status without any
    /// known field, keeps the old one.
    pub async fn update(&mut self) -> bool {
        info!(name = %self.name, "updating thermostat state");
        match self.client.get_ac_status().await {
            Some(status) if status.is_empty() => {
                warn!(name = %self.name, "empty AC status, keeping previous state");
                false
            }
            Some(status) => {
                debug!(?status, "AC status");
                self.status = status;
                true
            }
            None => false,
        }
    }

    pub async fn set_temperature(&self, celsius: f64) -> Option<Value> {
        info!(temperature = celsius, "setting target temperature");
        self.client
            .send_ac_command("temp", &format_temperature(celsius))
            .await
    }

    pub async fn power_on(&self) -> Option<Value> {
        info!("turning on");
        self.client.send_ac_command("power", "1").await
    }

    pub async fn power_off(&self) -> Option<Value> {
        info!("turning off");
        self.client.send_ac_command("power", "0").await
    }

    /// Off powers the unit down. Any other mode powers it on first if the
    /// cached state says it is off; the two commands are not atomic.
    pub async fn set_mode(&self, mode: HvacMode) -> Option<Value> {
        info!(%mode, "setting HVAC mode");
        if mode == HvacMode::Off {
            return self.power_off().await;
        }
        if self.status.is_powered_off() {
            self.power_on().await;
        }
        self.client.send_ac_command("mode", mode.as_tuya_code()).await
    }

    pub async fn set_hvac_mode(&self, label: &str) -> Result<Option<Value>> {
        match HvacMode::from_label(label) {
            Some(mode) => Ok(self.set_mode(mode).await),
            None => {
                warn!(label, "invalid HVAC mode");
                Err(Error::InvalidMode(label.to_string()))
            }
        }
    }

    pub async fn set_fan_speed(&self, speed: FanSpeed) -> Option<Value> {
        info!(%speed, "setting fan mode");
        self.client.send_ac_command("wind", speed.as_tuya_code()).await
    }

    pub async fn set_fan_mode(&self, label: &str) -> Result<Option<Value>> {
        match FanSpeed::from_label(label) {
            Some(speed) => Ok(self.set_fan_speed(speed).await),
            None => {
                warn!(label, "invalid fan mode");
                Err(Error::InvalidFanMode(label.to_string()))
            }
        }
    }
}

impl<T: Transport> Device for Thermostat<T> {
    fn state_json(&self) -> Value {
        json!({
            "name": self.name,
            "unique_id": self.unique_id(),
            "hvac_mode": self.hvac_mode().map(|m| m.label()),
            "hvac_modes": self.hvac_modes(),
            "fan_mode": self.fan_mode().map(|f| f.label()),
            "fan_modes": self.fan_modes(),
            "current_temperature": self.current_temperature(),
            "target_temperature": self.target_temperature(),
            "min_temp": MIN_TEMP_C,
            "max_temp": MAX_TEMP_C,
            "temperature_unit": TEMPERATURE_UNIT,
            "supported_features": SUPPORTED_FEATURES,
        })
    }

    async fn handle_command(&mut self, call: &ServiceCall) -> Result<Option<Value>> {
        debug!(service = %call.service, "handling thermostat command");
        match call.service.as_str() {
            "update" => Ok(self.update().await.then(|| self.state_json())),
            "set_temperature" => {
                let temperature = call.f64_arg("temperature")?;
                Ok(self.set_temperature(temperature).await)
            }
            "set_hvac_mode" => {
                let mode = call.str_arg("hvac_mode")?;
                self.set_hvac_mode(&mode).await
            }
            "set_fan_mode" => {
                let mode = call.str_arg("fan_mode")?;
                self.set_fan_mode(&mode).await
            }
            "turn_on" => Ok(self.power_on().await),
            "turn_off" => Ok(self.power_off().await),
            other => Err(Error::UnknownService(other.to_string())),
        }
    }
}
