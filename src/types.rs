use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The pair of cloud device ids every request is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIds {
    /// IR hub ("infrared") device id.
    pub hub_id: String,
    /// AC or remote device id registered under the hub.
    pub remote_id: String,
}

impl DeviceIds {
    pub fn new(hub_id: impl Into<String>, remote_id: impl Into<String>) -> Self {
        Self {
            hub_id: hub_id.into(),
            remote_id: remote_id.into(),
        }
    }
}

/// AC operating mode as encoded by the cloud's `mode` field.
///
/// `Off` has no mode code of its own on the wire; it is expressed through
/// `power=0`, but the label table still reserves code `5` for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HvacMode {
    Cool,
    Heat,
    Auto,
    FanOnly,
    Dry,
    Off,
}

impl HvacMode {
    pub const ALL: [HvacMode; 6] = [
        HvacMode::Cool,
        HvacMode::Heat,
        HvacMode::Auto,
        HvacMode::FanOnly,
        HvacMode::Dry,
        HvacMode::Off,
    ];

    pub fn as_tuya_code(&self) -> &'static str {
        match self {
            HvacMode::Cool => "0",
            HvacMode::Heat => "1",
            HvacMode::Auto => "2",
            HvacMode::FanOnly => "3",
            HvacMode::Dry => "4",
            HvacMode::Off => "5",
        }
    }

    pub fn from_tuya_code(s: &str) -> Option<Self> {
        match s {
            "0" => Some(HvacMode::Cool),
            "1" => Some(HvacMode::Heat),
            "2" => Some(HvacMode::Auto),
            "3" => Some(HvacMode::FanOnly),
            "4" => Some(HvacMode::Dry),
            "5" => Some(HvacMode::Off),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HvacMode::Cool => "cool",
            HvacMode::Heat => "heat",
            HvacMode::Auto => "auto",
            HvacMode::FanOnly => "fan_only",
            HvacMode::Dry => "dry",
            HvacMode::Off => "off",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == s)
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fan speed as encoded by the cloud's `wind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanSpeed {
    Automatic,
    Low,
    Medium,
    High,
}

impl FanSpeed {
    pub const ALL: [FanSpeed; 4] = [
        FanSpeed::Low,
        FanSpeed::Medium,
        FanSpeed::High,
        FanSpeed::Automatic,
    ];

    pub fn as_tuya_code(&self) -> &'static str {
        match self {
            FanSpeed::Automatic => "0",
            FanSpeed::Low => "1",
            FanSpeed::Medium => "2",
            FanSpeed::High => "3",
        }
    }

    pub fn from_tuya_code(s: &str) -> Option<Self> {
        match s {
            "0" => Some(FanSpeed::Automatic),
            "1" => Some(FanSpeed::Low),
            "2" => Some(FanSpeed::Medium),
            "3" => Some(FanSpeed::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FanSpeed::Automatic => "Automatic",
            FanSpeed::Low => "Low",
            FanSpeed::Medium => "Medium",
            FanSpeed::High => "High",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == s)
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Last-known AC state as reported by `ac/status`.
///
/// The cloud is inconsistent about sending these as numbers or strings, so
/// both are accepted and kept in string form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AcStatus {
    #[serde(default, deserialize_with = "string_or_number")]
    pub power: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub temp: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub wind: Option<String>,
}

impl Default for AcStatus {
    fn default() -> Self {
        Self {
            power: Some("0".to_string()),
            mode: Some("0".to_string()),
            temp: Some("0".to_string()),
            wind: Some("0".to_string()),
        }
    }
}

impl AcStatus {
    pub fn is_powered_off(&self) -> bool {
        self.power.as_deref() == Some("0")
    }

    /// True when the cloud sent back an object with none of the known fields.
    pub fn is_empty(&self) -> bool {
        self.power.is_none() && self.mode.is_none() && self.temp.is_none() && self.wind.is_none()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if b { "1" } else { "0" }.to_string()),
        _ => None,
    })
}

/// A learned IR code to be stored as a button of a DIY remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnedCode {
    pub category_id: String,
    pub remote_name: String,
    pub code: String,
    pub key: String,
}

/// Formats a setpoint the way the cloud's `temp` command expects it:
/// whole degrees without a fractional part, halves kept.
pub fn format_temperature(celsius: f64) -> String {
    if celsius.fract() == 0.0 {
        format!("{celsius:.0}")
    } else {
        format!("{celsius}")
    }
}
