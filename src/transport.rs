use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::protocol::Method;
use crate::{Error, Result};

/// Raw HTTP capability the client dispatches through. Returns the decoded
/// JSON body without interpreting the envelope.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<Value>> + Send;
}

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub access_id: String,
    pub access_secret: String,
}

/// Everything a signer may need to authenticate one request.
pub struct SignRequest<'a> {
    pub method: Method,
    pub path: &'a str,
    pub body: &'a str,
    pub timestamp_ms: i64,
    pub nonce: &'a str,
    pub credentials: &'a Credentials,
    pub access_token: Option<&'a str>,
}

/// Produces the authentication headers for a request. The cloud's signing
/// scheme lives outside this crate.
pub trait Signer: Send + Sync {
    fn sign(&self, request: &SignRequest<'_>) -> Vec<(String, String)>;
}

impl<F> Signer for F
where
    F: Fn(&SignRequest<'_>) -> Vec<(String, String)> + Send + Sync,
{
    fn sign(&self, request: &SignRequest<'_>) -> Vec<(String, String)> {
        self(request)
    }
}

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    access_token: Option<String>,
    signer: Option<Box<dyn Signer>>,
}

impl HttpTransport {
    pub(crate) fn new(
        base_url: String,
        credentials: Credentials,
        access_token: Option<String>,
        signer: Option<Box<dyn Signer>>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            access_token,
            signer,
        })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let body_str = match body {
            Some(b) => serde_json::to_string(b)?,
            None => String::new(),
        };
        let timestamp_ms = Utc::now().timestamp_millis();
        let nonce = Uuid::new_v4().to_string();

        let mut req = match method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
        };
        req = req
            .header("client_id", &self.credentials.access_id)
            .header("t", timestamp_ms.to_string())
            .header("nonce", &nonce);
        if let Some(ref token) = self.access_token {
            req = req.header("access_token", token);
        }
        if let Some(ref signer) = self.signer {
            let sign_req = SignRequest {
                method,
                path,
                body: &body_str,
                timestamp_ms,
                nonce: &nonce,
                credentials: &self.credentials,
                access_token: self.access_token.as_deref(),
            };
            for (name, value) in signer.sign(&sign_req) {
                req = req.header(name, value);
            }
        }
        if body.is_some() {
            req = req.header(CONTENT_TYPE, "application/json").body(body_str);
        }

        debug!(method = method.as_str(), url = %url, "sending request");
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        trace!(status = status.as_u16(), body = %text, "received response");

        // The cloud wraps errors in the envelope too; only a non-JSON body
        // falls back to the HTTP status.
        serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                Error::Json(e)
            } else {
                Error::Api {
                    code: Some(i64::from(status.as_u16())),
                    msg: format!("HTTP {status}"),
                }
            }
        })
    }
}
