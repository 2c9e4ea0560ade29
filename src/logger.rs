use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

pub enum MessageLogMode {
    /// Every request and every response envelope.
    Full,
    /// Only responses that did not succeed.
    FailuresOnly,
}

pub(crate) struct MessageLogger {
    mode: MessageLogMode,
    file: File,
}

impl MessageLogger {
    pub fn new(mode: MessageLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { mode, file })
    }

    pub fn log_request(&mut self, method: &str, path: &str, body: Option<&Value>) {
        if let MessageLogMode::FailuresOnly = self.mode {
            return;
        }
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "req",
            "method": method,
            "path": path,
            "body": body,
        });
        self.write_line(&entry);
    }

    pub fn log_response(&mut self, action: &str, path: &str, success: bool, body: &Value) {
        if success && matches!(self.mode, MessageLogMode::FailuresOnly) {
            return;
        }
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "resp",
            "action": action,
            "path": path,
            "success": success,
            "body": body,
        });
        self.write_line(&entry);
    }

    pub fn log_transport_error(&mut self, action: &str, path: &str, error: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "err",
            "action": action,
            "path": path,
            "error": error,
        });
        self.write_line(&entry);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}
