use std::future::Future;

use serde_json::{Map, Value};

use crate::{Error, Result};

/// What a host needs from a device: a state snapshot and a way to run
/// named commands against it.
pub trait Device: Send + Sync {
    /// Current state as JSON, for the host's state store.
    fn state_json(&self) -> Value;

    /// Runs one named command. `Ok(None)` means the command was dispatched
    /// but produced no usable result.
    fn handle_command(
        &mut self,
        call: &ServiceCall,
    ) -> impl Future<Output = Result<Option<Value>>> + Send;
}

/// A named command with its caller-supplied parameters.
#[derive(Debug, Clone, Default)]
pub struct ServiceCall {
    pub service: String,
    pub data: Map<String, Value>,
}

impl ServiceCall {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            data: Map::new(),
        }
    }

    /// Builds a call from a JSON object; anything else yields no parameters.
    pub fn with_data(service: impl Into<String>, data: Value) -> Self {
        let data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            service: service.into(),
            data,
        }
    }

    pub fn arg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.data.insert(name.to_string(), value.into());
        self
    }

    fn required(&self, name: &'static str) -> Result<&Value> {
        match self.data.get(name) {
            Some(Value::Null) | None => Err(Error::MissingParameter(name)),
            Some(v) => Ok(v),
        }
    }

    /// String parameter; numbers and booleans are stringified.
    pub fn str_arg(&self, name: &'static str) -> Result<String> {
        match self.required(name)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(Error::InvalidParameter {
                name,
                reason: format!("expected a string, got {other}"),
            }),
        }
    }

    pub fn bool_arg(&self, name: &'static str) -> Result<bool> {
        match self.required(name)? {
            Value::Bool(b) => Ok(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            Value::Number(n) if n.as_i64() == Some(1) => Ok(true),
            Value::Number(n) if n.as_i64() == Some(0) => Ok(false),
            other => Err(Error::InvalidParameter {
                name,
                reason: format!("expected a boolean, got {other}"),
            }),
        }
    }

    pub fn i64_arg(&self, name: &'static str) -> Result<i64> {
        let value = self.required(name)?;
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
            .ok_or_else(|| Error::InvalidParameter {
                name,
                reason: format!("expected an integer, got {value}"),
            })
    }

    pub fn f64_arg(&self, name: &'static str) -> Result<f64> {
        let value = self.required(name)?;
        value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
            .ok_or_else(|| Error::InvalidParameter {
                name,
                reason: format!("expected a number, got {value}"),
            })
    }
}
