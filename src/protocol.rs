use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::{DeviceIds, LearnedCode};

pub const API_PREFIX: &str = "/v2.0/infrareds";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// One of the fixed cloud endpoints. Variants carrying a `remote_id` address
/// a remote other than the configured one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    LearningState { state: bool },
    LearnedCode { learning_time: i64 },
    SaveLearnedCode,
    RemoteLearnedCodes { remote_id: &'a str },
    SendLearnedCode { remote_id: &'a str },
    RemoteKeys { remote_id: &'a str },
    Command { remote_id: &'a str },
    RawCommand { remote_id: &'a str },
    AcStatus,
    AcCommand,
}

impl Endpoint<'_> {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::LearningState { .. } => Method::Put,
            Endpoint::LearnedCode { .. }
            | Endpoint::RemoteLearnedCodes { .. }
            | Endpoint::RemoteKeys { .. }
            | Endpoint::AcStatus => Method::Get,
            Endpoint::SaveLearnedCode
            | Endpoint::SendLearnedCode { .. }
            | Endpoint::Command { .. }
            | Endpoint::RawCommand { .. }
            | Endpoint::AcCommand => Method::Post,
        }
    }

    /// Path (with query string, if any) relative to the cloud base URL.
    pub fn path(&self, ids: &DeviceIds) -> String {
        let hub = &ids.hub_id;
        let ac = &ids.remote_id;
        match self {
            Endpoint::LearningState { state } => {
                format!("{API_PREFIX}/{hub}/learning-state?state={state}")
            }
            Endpoint::LearnedCode { learning_time } => {
                format!("{API_PREFIX}/{hub}/learning-codes?learning_time={learning_time}")
            }
            Endpoint::SaveLearnedCode => format!("{API_PREFIX}/{hub}/learning-codes"),
            Endpoint::RemoteLearnedCodes { remote_id } | Endpoint::SendLearnedCode { remote_id } => {
                format!("{API_PREFIX}/{hub}/remotes/{remote_id}/learning-codes")
            }
            Endpoint::RemoteKeys { remote_id } => {
                format!("{API_PREFIX}/{hub}/remotes/{remote_id}/keys")
            }
            Endpoint::Command { remote_id } => {
                format!("{API_PREFIX}/{hub}/remotes/{remote_id}/command")
            }
            Endpoint::RawCommand { remote_id } => {
                format!("{API_PREFIX}/{hub}/remotes/{remote_id}/raw/command")
            }
            Endpoint::AcStatus => format!("{API_PREFIX}/{hub}/remotes/{ac}/ac/status"),
            Endpoint::AcCommand => format!("{API_PREFIX}/{hub}/air-conditioners/{ac}/command"),
        }
    }

    /// Short name used in log lines.
    pub fn action(&self) -> &'static str {
        match self {
            Endpoint::LearningState { .. } => "set_learning_state",
            Endpoint::LearnedCode { .. } => "get_learned_code",
            Endpoint::SaveLearnedCode => "save_learned_code",
            Endpoint::RemoteLearnedCodes { .. } => "get_saved_learned_codes",
            Endpoint::SendLearnedCode { .. } => "send_learned_code",
            Endpoint::RemoteKeys { .. } => "get_remote_keys",
            Endpoint::Command { .. } => "send_standard_command",
            Endpoint::RawCommand { .. } => "send_key_command",
            Endpoint::AcStatus => "get_ac_status",
            Endpoint::AcCommand => "send_ac_command",
        }
    }
}

pub fn learning_state_data(state: bool) -> Value {
    json!({ "state": state })
}

pub fn save_learned_code_data(learned: &LearnedCode) -> Value {
    json!({
        "category_id": learned.category_id,
        "remote_name": learned.remote_name,
        "codes": [{
            "code": learned.code,
            "key": learned.key
        }]
    })
}

pub fn send_learned_code_data(code: &str) -> Value {
    json!({ "code": code })
}

pub fn standard_command_data(category_id: &str, remote_index: &str, key: &str) -> Value {
    json!({
        "category_id": category_id,
        "remote_index": remote_index,
        "key": key
    })
}

pub fn key_command_data(category_id: &str, key_id: &str, key: &str) -> Value {
    json!({
        "category_id": category_id,
        "key_id": key_id,
        "key": key
    })
}

pub fn ac_command_data(code: &str, value: &str) -> Value {
    json!({
        "code": code,
        "value": value
    })
}

/// The uniform `{success, result}` wrapper around every cloud response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub t: Option<i64>,
}

pub fn parse_envelope(body: Value) -> serde_json::Result<Envelope> {
    serde_json::from_value(body)
}
