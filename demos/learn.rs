use std::env;
use std::io::{self, BufRead, Write as _};
use std::time::Duration;

use tuya_ir::{Config, LearnedCode, MessageLogMode, TuyaClient};

#[tokio::main]
async fn main() -> tuya_ir::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let config_path = args
        .get(1)
        .expect("usage: learn <config.json> [--log <path>]");
    let log_path = args
        .iter()
        .position(|a| a == "--log")
        .and_then(|i| args.get(i + 1));

    let config = Config::from_path(config_path)?;
    let mut builder = TuyaClient::builder(config.device_ids())
        .base_url(config.base_url())
        .credentials(&config.access_id, &config.access_secret);
    if let Some(ref token) = config.access_token {
        builder = builder.access_token(token);
    }
    if let Some(path) = log_path {
        println!("Logging all requests/responses to {path}");
        builder = builder.message_log(MessageLogMode::Full, path);
    }
    let client = builder.build()?;

    let learning_time = chrono::Utc::now().timestamp_millis();
    if client.enable_learning_state(true).await.is_none() {
        eprintln!("Could not enable learning mode");
        return Ok(());
    }
    println!("Learning mode on. Point the remote at the hub and press a button.");

    let mut code = None;
    for _ in 0..15 {
        tokio::time::sleep(Duration::from_secs(2)).await;
        if let Some(result) = client.get_learned_code(learning_time).await
            && let Some(c) = result.get("code").and_then(|v| v.as_str())
        {
            code = Some(c.to_string());
            break;
        }
    }
    client.enable_learning_state(false).await;

    let Some(code) = code else {
        eprintln!("No code captured");
        return Ok(());
    };
    println!("Captured: {code}");

    let category_id = prompt("Category id (empty to skip saving): ");
    if category_id.is_empty() {
        return Ok(());
    }
    let learned = LearnedCode {
        category_id,
        remote_name: prompt("Remote name: "),
        code,
        key: prompt("Key name: "),
    };
    match client.save_learned_code(&learned).await {
        Some(result) => println!("Saved: {result}"),
        None => eprintln!("Save failed"),
    }
    Ok(())
}

fn prompt(label: &str) -> String {
    print!("{label}");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok();
    line.trim().to_string()
}
