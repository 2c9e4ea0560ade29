use serde_json::{json, Value};
use tracing::debug;

use crate::client::TuyaClient;
use crate::device::{Device, ServiceCall};
use crate::transport::{HttpTransport, Transport};
use crate::types::LearnedCode;
use crate::{Error, Result};

pub const SERVICES: &[&str] = &[
    "enable_learning_state",
    "get_learned_code",
    "save_learned_code",
    "send_learned_code",
    "get_saved_learned_codes",
    "get_remote_keys",
    "send_standard_command",
    "send_key_command",
    "send_ac_command",
];

/// The IR hub as a device: learning, saving and replaying codes.
pub struct IrRemote<T = HttpTransport> {
    client: TuyaClient<T>,
    learning: bool,
    last_learned_code: Option<Value>,
}

impl<T: Transport> IrRemote<T> {
    pub fn new(client: TuyaClient<T>) -> Self {
        Self {
            client,
            learning: false,
            last_learned_code: None,
        }
    }

    pub fn client(&self) -> &TuyaClient<T> {
        &self.client
    }

    /// Whether the last successful learning-state call enabled learning.
    pub fn is_learning(&self) -> bool {
        self.learning
    }

    pub fn last_learned_code(&self) -> Option<&Value> {
        self.last_learned_code.as_ref()
    }

    async fn dispatch(&mut self, call: &ServiceCall) -> Result<Option<Value>> {
        match call.service.as_str() {
            "enable_learning_state" => {
                let state = call.bool_arg("state")?;
                let result = self.client.enable_learning_state(state).await;
                if result.is_some() {
                    self.learning = state;
                }
                Ok(result)
            }
            "get_learned_code" => {
                let learning_time = call.i64_arg("learning_time")?;
                let result = self.client.get_learned_code(learning_time).await;
                if let Some(ref code) = result {
                    self.last_learned_code = Some(code.clone());
                }
                Ok(result)
            }
            "save_learned_code" => {
                let learned = LearnedCode {
                    category_id: call.str_arg("category_id")?,
                    remote_name: call.str_arg("remote_name")?,
                    code: call.str_arg("code")?,
                    key: call.str_arg("key")?,
                };
                Ok(self.client.save_learned_code(&learned).await)
            }
            "send_learned_code" => {
                let remote_id = call.str_arg("remote_id")?;
                let code = call.str_arg("code")?;
                Ok(self.client.send_learned_code(&remote_id, &code).await)
            }
            "get_saved_learned_codes" => {
                let remote_id = call.str_arg("remote_id")?;
                Ok(self.client.get_saved_learned_codes(&remote_id).await)
            }
            "get_remote_keys" => Ok(self.client.get_remote_keys().await),
            "send_standard_command" => {
                let category_id = call.str_arg("category_id")?;
                let remote_index = call.str_arg("remote_index")?;
                let key = call.str_arg("key")?;
                Ok(self
                    .client
                    .send_standard_command(&category_id, &remote_index, &key)
                    .await)
            }
            "send_key_command" => {
                let category_id = call.str_arg("category_id")?;
                let key_id = call.str_arg("key_id")?;
                let key = call.str_arg("key")?;
                Ok(self.client.send_key_command(&category_id, &key_id, &key).await)
            }
            "send_ac_command" => {
                let code = call.str_arg("code")?;
                let value = call.str_arg("value")?;
                Ok(self.client.send_ac_command(&code, &value).await)
            }
            other => Err(Error::UnknownService(other.to_string())),
        }
    }
}

impl<T: Transport> Device for IrRemote<T> {
    fn state_json(&self) -> Value {
        let ids = self.client.device_ids();
        json!({
            "hub_id": ids.hub_id,
            "remote_id": ids.remote_id,
            "learning": self.learning,
            "last_learned_code": self.last_learned_code,
        })
    }

    async fn handle_command(&mut self, call: &ServiceCall) -> Result<Option<Value>> {
        debug!(service = %call.service, data = ?call.data, "handling service call");
        self.dispatch(call).await
    }
}
