use std::fmt;

#[derive(Debug)]
pub enum Error {
    Http(reqwest::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
    /// The cloud answered with `success: false`.
    Api { code: Option<i64>, msg: String },
    MissingParameter(&'static str),
    InvalidParameter { name: &'static str, reason: String },
    UnknownService(String),
    InvalidMode(String),
    InvalidFanMode(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Api { code: Some(code), msg } => write!(f, "API error {code}: {msg}"),
            Error::Api { code: None, msg } => write!(f, "API error: {msg}"),
            Error::MissingParameter(name) => write!(f, "missing parameter: {name}"),
            Error::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter {name}: {reason}")
            }
            Error::UnknownService(name) => write!(f, "unknown service: {name}"),
            Error::InvalidMode(mode) => write!(f, "invalid HVAC mode: {mode}"),
            Error::InvalidFanMode(mode) => write!(f, "invalid fan mode: {mode}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
