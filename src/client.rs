use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::{Config, DataCenter};
use crate::logger::{MessageLogMode, MessageLogger};
use crate::protocol::{self, parse_envelope, Endpoint};
use crate::transport::{Credentials, HttpTransport, Signer, Transport};
use crate::types::*;
use crate::{Error, Result};

pub struct TuyaClientBuilder {
    ids: DeviceIds,
    base_url: Option<String>,
    credentials: Credentials,
    access_token: Option<String>,
    signer: Option<Box<dyn Signer>>,
    timeout: Option<Duration>,
    log_mode: Option<MessageLogMode>,
    log_path: Option<String>,
}

impl TuyaClientBuilder {
    pub fn new(ids: DeviceIds) -> Self {
        Self {
            ids,
            base_url: None,
            credentials: Credentials::default(),
            access_token: None,
            signer: None,
            timeout: None,
            log_mode: None,
            log_path: None,
        }
    }

    /// Overrides the data center URL, e.g. to point at a proxy or a mock.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn data_center(mut self, dc: DataCenter) -> Self {
        self.base_url = Some(dc.base_url().to_string());
        self
    }

    pub fn credentials(mut self, access_id: impl Into<String>, access_secret: impl Into<String>) -> Self {
        self.credentials = Credentials {
            access_id: access_id.into(),
            access_secret: access_secret.into(),
        };
        self
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn signer(mut self, signer: impl Signer + 'static) -> Self {
        self.signer = Some(Box::new(signer));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn message_log(mut self, mode: MessageLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<TuyaClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DataCenter::default().base_url().to_string());
        let transport = HttpTransport::new(
            base_url,
            self.credentials,
            self.access_token,
            self.signer,
            self.timeout,
        )?;

        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => Some(MessageLogger::new(mode, &path)?),
            _ => None,
        };

        Ok(TuyaClient {
            transport,
            ids: self.ids,
            logger: logger.map(Mutex::new),
        })
    }
}

/// Client for the IR hub endpoints of the cloud API.
///
/// The operation methods are best-effort: any failure, whether reported by
/// the cloud or by the transport, is logged and comes back as `None`. Use
/// [`TuyaClient::request`] to get the error itself.
pub struct TuyaClient<T = HttpTransport> {
    transport: T,
    ids: DeviceIds,
    logger: Option<Mutex<MessageLogger>>,
}

impl TuyaClient<HttpTransport> {
    pub fn builder(ids: DeviceIds) -> TuyaClientBuilder {
        TuyaClientBuilder::new(ids)
    }

    /// Builds a client from a validated [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut builder = TuyaClientBuilder::new(config.device_ids())
            .base_url(config.base_url())
            .credentials(&config.access_id, &config.access_secret);
        if let Some(ref token) = config.access_token {
            builder = builder.access_token(token);
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }
}

impl<T: Transport> TuyaClient<T> {
    pub fn with_transport(ids: DeviceIds, transport: T) -> Self {
        Self {
            transport,
            ids,
            logger: None,
        }
    }

    pub fn device_ids(&self) -> &DeviceIds {
        &self.ids
    }

    /// Sends one request and unwraps the `{success, result}` envelope.
    pub async fn request(&self, endpoint: Endpoint<'_>, body: Option<Value>) -> Result<Value> {
        let method = endpoint.method();
        let path = endpoint.path(&self.ids);
        let action = endpoint.action();

        self.with_logger(|l| l.log_request(method.as_str(), &path, body.as_ref()));

        let raw = match self.transport.send(method, &path, body.as_ref()).await {
            Ok(raw) => raw,
            Err(e) => {
                self.with_logger(|l| l.log_transport_error(action, &path, &e.to_string()));
                return Err(e);
            }
        };
        debug!(action, response = %raw, "full response data");

        let envelope = parse_envelope(raw.clone())?;
        self.with_logger(|l| l.log_response(action, &path, envelope.success, &raw));

        if envelope.success {
            Ok(envelope.result)
        } else {
            Err(Error::Api {
                code: envelope.code,
                msg: envelope.msg.unwrap_or_else(|| raw.to_string()),
            })
        }
    }

    /// Puts the hub into (or out of) learning mode.
    pub async fn enable_learning_state(&self, state: bool) -> Option<Value> {
        info!(hub = %self.ids.hub_id, state, "setting learning state");
        self.relay(
            Endpoint::LearningState { state },
            Some(protocol::learning_state_data(state)),
        )
        .await
    }

    /// Fetches the code captured since `learning_time` (epoch millis).
    pub async fn get_learned_code(&self, learning_time: i64) -> Option<Value> {
        info!(hub = %self.ids.hub_id, learning_time, "fetching learned code");
        self.relay(Endpoint::LearnedCode { learning_time }, None).await
    }

    /// Stores a learned code as a button of a new DIY remote.
    pub async fn save_learned_code(&self, learned: &LearnedCode) -> Option<Value> {
        info!(
            hub = %self.ids.hub_id,
            category_id = %learned.category_id,
            remote_name = %learned.remote_name,
            key = %learned.key,
            "saving learned code"
        );
        self.relay(
            Endpoint::SaveLearnedCode,
            Some(protocol::save_learned_code_data(learned)),
        )
        .await
    }

    pub async fn get_saved_learned_codes(&self, remote_id: &str) -> Option<Value> {
        info!(remote_id, "fetching saved learned codes");
        self.relay(Endpoint::RemoteLearnedCodes { remote_id }, None)
            .await
    }

    /// Replays a learned code through a remote.
    pub async fn send_learned_code(&self, remote_id: &str, code: &str) -> Option<Value> {
        info!(remote_id, "sending learned code");
        self.relay(
            Endpoint::SendLearnedCode { remote_id },
            Some(protocol::send_learned_code_data(code)),
        )
        .await
    }

    /// Lists the keys of the configured remote.
    pub async fn get_remote_keys(&self) -> Option<Value> {
        info!(remote_id = %self.ids.remote_id, "fetching remote keys");
        self.relay(
            Endpoint::RemoteKeys {
                remote_id: &self.ids.remote_id,
            },
            None,
        )
        .await
    }

    pub async fn send_standard_command(
        &self,
        category_id: &str,
        remote_index: &str,
        key: &str,
    ) -> Option<Value> {
        info!(category_id, remote_index, key, "sending standard command");
        self.relay(
            Endpoint::Command {
                remote_id: &self.ids.remote_id,
            },
            Some(protocol::standard_command_data(category_id, remote_index, key)),
        )
        .await
    }

    pub async fn send_key_command(&self, category_id: &str, key_id: &str, key: &str) -> Option<Value> {
        info!(category_id, key_id, key, "sending key command");
        self.relay(
            Endpoint::RawCommand {
                remote_id: &self.ids.remote_id,
            },
            Some(protocol::key_command_data(category_id, key_id, key)),
        )
        .await
    }

    pub async fn get_ac_status(&self) -> Option<AcStatus> {
        let result = self.relay(Endpoint::AcStatus, None).await?;
        match serde_json::from_value(result) {
            Ok(status) => Some(status),
            Err(e) => {
                warn!(error = %e, "unexpected AC status shape");
                None
            }
        }
    }

    /// Sends a single `code=value` command to the AC.
    pub async fn send_ac_command(&self, code: &str, value: &str) -> Option<Value> {
        info!(code, value, "sending AC command");
        self.relay(Endpoint::AcCommand, Some(protocol::ac_command_data(code, value)))
            .await
    }

    async fn relay(&self, endpoint: Endpoint<'_>, body: Option<Value>) -> Option<Value> {
        let action = endpoint.action();
        match self.request(endpoint, body).await {
            Ok(result) => {
                info!(action, result = %result, "request succeeded");
                Some(result)
            }
            Err(e @ Error::Api { .. }) => {
                warn!(action, error = %e, "request failed");
                None
            }
            Err(e) => {
                error!(action, error = %e, "request error");
                None
            }
        }
    }

    fn with_logger(&self, f: impl FnOnce(&mut MessageLogger)) {
        if let Some(ref logger) = self.logger
            && let Ok(mut guard) = logger.lock()
        {
            f(&mut guard);
        }
    }
}
