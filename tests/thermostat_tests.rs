use serde_json::{json, Value};
use tuya_ir::{Device, DeviceIds, Error, FanSpeed, HvacMode, ServiceCall, Thermostat, TuyaClient};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATUS_PATH: &str = "/v2.0/infrareds/hub1/remotes/ac1/ac/status";
const COMMAND_PATH: &str = "/v2.0/infrareds/hub1/air-conditioners/ac1/command";

fn thermostat(server: &MockServer) -> Thermostat {
    let client = TuyaClient::builder(DeviceIds::new("hub1", "ac1"))
        .base_url(server.uri())
        .build()
        .unwrap();
    Thermostat::new(client, "Living Room")
}

async fn mount_status(server: &MockServer, status: Value) {
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": status
        })))
        .mount(server)
        .await;
}

async fn mount_commands(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(COMMAND_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "result": true})),
        )
        .mount(server)
        .await;
}

async fn sent_commands(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == COMMAND_PATH)
        .map(|r| {
            let body: Value = r.body_json().unwrap();
            (
                body["code"].as_str().unwrap().to_string(),
                body["value"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn pair(code: &str, value: &str) -> (String, String) {
    (code.to_string(), value.to_string())
}

#[tokio::test]
async fn initial_state_is_powered_off() {
    let server = MockServer::start().await;
    let t = thermostat(&server);
    assert_eq!(t.hvac_mode(), Some(HvacMode::Off));
    assert_eq!(t.fan_mode(), Some(FanSpeed::Automatic));
    assert_eq!(t.target_temperature(), Some(0.0));
    assert_eq!(t.unique_id(), "tuya_thermostat_ac1");
    assert_eq!(t.name(), "Living Room");
}

#[tokio::test]
async fn update_caches_snapshot() {
    let server = MockServer::start().await;
    mount_status(&server, json!({"power": "1", "mode": "1", "temp": "23", "wind": "3"})).await;

    let mut t = thermostat(&server);
    assert!(t.update().await);
    assert_eq!(t.hvac_mode(), Some(HvacMode::Heat));
    assert_eq!(t.fan_mode(), Some(FanSpeed::High));
    assert_eq!(t.target_temperature(), Some(23.0));
    assert_eq!(t.current_temperature(), Some(23.0));
}

#[tokio::test]
async fn failed_update_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": {"power": "1", "mode": "0", "temp": "20", "wind": "1"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "msg": "device offline"
        })))
        .mount(&server)
        .await;

    let mut t = thermostat(&server);
    assert!(t.update().await);
    assert!(!t.update().await);
    assert_eq!(t.hvac_mode(), Some(HvacMode::Cool));
    assert_eq!(t.fan_mode(), Some(FanSpeed::Low));
    assert_eq!(t.target_temperature(), Some(20.0));
}

#[tokio::test]
async fn empty_status_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": {"power": "1", "mode": "1", "temp": "23", "wind": "2"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_status(&server, json!({})).await;

    let mut t = thermostat(&server);
    assert!(t.update().await);
    assert!(!t.update().await);
    assert_eq!(t.hvac_mode(), Some(HvacMode::Heat));
    assert_eq!(t.fan_mode(), Some(FanSpeed::Medium));
    assert_eq!(t.target_temperature(), Some(23.0));
}

#[tokio::test]
async fn set_mode_while_off_powers_on_first() {
    let server = MockServer::start().await;
    mount_commands(&server).await;

    let t = thermostat(&server);
    t.set_hvac_mode("cool").await.unwrap();

    assert_eq!(
        sent_commands(&server).await,
        vec![pair("power", "1"), pair("mode", "0")]
    );
}

#[tokio::test]
async fn failed_power_on_still_sends_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMMAND_PATH))
        .and(body_json(json!({"code": "power", "value": "1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": false, "msg": "ir busy"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMMAND_PATH))
        .and(body_json(json!({"code": "mode", "value": "1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "result": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let t = thermostat(&server);
    let result = t.set_hvac_mode("heat").await.unwrap();

    assert_eq!(result, Some(json!(true)));
    assert_eq!(
        sent_commands(&server).await,
        vec![pair("power", "1"), pair("mode", "1")]
    );
}

#[tokio::test]
async fn set_mode_while_on_sends_mode_only() {
    let server = MockServer::start().await;
    mount_status(&server, json!({"power": "1", "mode": "0", "temp": "24", "wind": "0"})).await;
    mount_commands(&server).await;

    let mut t = thermostat(&server);
    t.update().await;
    t.set_hvac_mode("dry").await.unwrap();

    assert_eq!(sent_commands(&server).await, vec![pair("mode", "4")]);
}

#[tokio::test]
async fn set_mode_off_powers_down() {
    let server = MockServer::start().await;
    mount_status(&server, json!({"power": "1", "mode": "2", "temp": "24", "wind": "0"})).await;
    mount_commands(&server).await;

    let mut t = thermostat(&server);
    t.update().await;
    assert_eq!(t.hvac_mode(), Some(HvacMode::Auto));
    t.set_hvac_mode("off").await.unwrap();

    assert_eq!(sent_commands(&server).await, vec![pair("power", "0")]);
}

#[tokio::test]
async fn invalid_labels_send_nothing() {
    let server = MockServer::start().await;
    mount_commands(&server).await;

    let t = thermostat(&server);
    let err = t.set_hvac_mode("turbo").await.unwrap_err();
    assert!(matches!(err, Error::InvalidMode(ref m) if m == "turbo"));
    let err = t.set_fan_mode("Hurricane").await.unwrap_err();
    assert!(matches!(err, Error::InvalidFanMode(_)));

    assert!(sent_commands(&server).await.is_empty());
}

#[tokio::test]
async fn fan_and_temperature_writes() {
    let server = MockServer::start().await;
    mount_commands(&server).await;

    let t = thermostat(&server);
    t.set_fan_mode("Medium").await.unwrap();
    t.set_temperature(22.0).await;
    t.set_temperature(22.5).await;
    t.power_on().await;

    assert_eq!(
        sent_commands(&server).await,
        vec![
            pair("wind", "2"),
            pair("temp", "22"),
            pair("temp", "22.5"),
            pair("power", "1"),
        ]
    );
}

#[tokio::test]
async fn sensor_reading_overrides_current_temperature() {
    let server = MockServer::start().await;
    mount_status(&server, json!({"power": "1", "mode": "0", "temp": "24", "wind": "0"})).await;

    let mut t = thermostat(&server);
    t.update().await;

    t.set_sensor_reading(Some("21.4".into()));
    assert_eq!(t.current_temperature(), Some(21.4));

    t.set_sensor_reading(Some("unknown".into()));
    assert_eq!(t.current_temperature(), Some(24.0));

    t.set_sensor_reading(Some("garbage".into()));
    assert_eq!(t.current_temperature(), Some(24.0));
}

#[tokio::test]
async fn handle_command_dispatches() {
    let server = MockServer::start().await;
    mount_status(&server, json!({"power": "1", "mode": "3", "temp": "26", "wind": "1"})).await;
    mount_commands(&server).await;

    let mut t = thermostat(&server);
    let state = t
        .handle_command(&ServiceCall::new("update"))
        .await
        .unwrap()
        .expect("update should return state");
    assert_eq!(state["hvac_mode"], "fan_only");
    assert_eq!(state["fan_mode"], "Low");
    assert_eq!(state["target_temperature"], 26.0);
    assert_eq!(state["min_temp"], 15.0);
    assert_eq!(state["max_temp"], 30.0);
    assert_eq!(state["supported_features"], json!(["target_temperature", "fan_mode"]));
    assert_eq!(t.supported_features(), ["target_temperature", "fan_mode"]);

    t.handle_command(&ServiceCall::new("set_temperature").arg("temperature", 19))
        .await
        .unwrap();
    t.handle_command(&ServiceCall::new("set_fan_mode").arg("fan_mode", "Automatic"))
        .await
        .unwrap();

    let err = t
        .handle_command(&ServiceCall::new("set_hvac_mode"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingParameter("hvac_mode")));

    let err = t
        .handle_command(&ServiceCall::new("self_destruct"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownService(_)));

    assert_eq!(
        sent_commands(&server).await,
        vec![pair("temp", "19"), pair("wind", "0")]
    );
}
