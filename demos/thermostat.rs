use std::env;
use std::time::Duration;

use tuya_ir::{Config, Device, Thermostat};

#[tokio::main]
async fn main() -> tuya_ir::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let config_path = args
        .get(1)
        .expect("usage: thermostat <config.json> [--mode <label>] [--temp <c>]");
    let mode = args
        .iter()
        .position(|a| a == "--mode")
        .and_then(|i| args.get(i + 1));
    let temp: Option<f64> = args
        .iter()
        .position(|a| a == "--temp")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok());

    let config = Config::from_path(config_path)?;
    let mut thermostat = Thermostat::from_config(&config)?;

    if !thermostat.update().await {
        eprintln!("Initial status fetch failed, using defaults");
    }
    if let Some(mode) = mode {
        thermostat.set_hvac_mode(mode).await?;
    }
    if let Some(temp) = temp {
        thermostat.set_temperature(temp).await;
    }

    loop {
        if thermostat.update().await {
            println!("{}", thermostat.state_json());
        }
        tokio::time::sleep(Duration::from_secs(30)).await;
    }
}
