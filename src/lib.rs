mod client;
mod config;
mod device;
mod error;
mod logger;
pub mod protocol;
mod service;
mod thermostat;
mod transport;
mod types;

pub use client::{TuyaClient, TuyaClientBuilder};
pub use config::{Config, DataCenter};
pub use device::{Device, ServiceCall};
pub use error::{Error, Result};
pub use logger::MessageLogMode;
pub use service::{IrRemote, SERVICES};
pub use thermostat::{Thermostat, MAX_TEMP_C, MIN_TEMP_C, SUPPORTED_FEATURES, TEMPERATURE_UNIT};
pub use transport::{Credentials, HttpTransport, SignRequest, Signer, Transport};
pub use types::*;
