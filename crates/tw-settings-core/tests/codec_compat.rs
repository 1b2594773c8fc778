//! Integration tests for settings compatibility across firmware versions.
//!
//! These exercise the public codec API with whole artifacts as they would
//! appear on flash: written by this firmware, by an older release, or by a
//! newer one that knows fields this build does not.

use serde_json::{json, Value};
use tw_settings_core::{
    decode, encode, Config, SettingKey, SettingValue, CURRENT_SCHEMA_VERSION,
};

/// An artifact as written by the first firmware release.
const V1_ARTIFACT: &str = r#"{
    "ver": 1,
    "first_time": false,
    "wifi_start": true,
    "wifi_ssid": "Home",
    "wifi_pass": "hunter2",
    "wifi_options": [
        { "wifi_ssid": "Home", "wifi_pass": "hunter2", "channel": 6 },
        { "wifi_ssid": "Phone", "wifi_pass": "hotspot", "channel": 1 }
    ],
    "mdns_name": "my-watch",
    "country": "AU",
    "city": "Perth",
    "utc_offset": 8,
    "bl_period_vbus": [100, 100, 100],
    "bl_level_vbat": [80, 40, 10],
    "time_24hour": true,
    "haptics": { "enabled": false, "trigger_on_boot": false },
    "open_weather": { "enabled": true, "api_key": "abc", "poll_frequency": 60, "units_metric": false }
}"#;

#[test]
fn test_v1_artifact_decodes_with_all_values_intact() {
    let cfg = decode(V1_ARTIFACT).expect("v1 artifact must decode");

    assert_eq!(cfg.schema_version, CURRENT_SCHEMA_VERSION);
    assert!(!cfg.first_time);
    assert!(cfg.wifi_start);
    assert_eq!(cfg.wifi_options.len(), 2);
    assert_eq!(cfg.wifi_options[1].ssid, "Phone");
    assert_eq!(cfg.wifi_options[1].channel, 1);
    assert_eq!(cfg.mdns_name, "my-watch");
    assert_eq!(cfg.utc_offset, 8);
    assert_eq!(cfg.bl_period_vbus, [100, 100, 100]);
    assert_eq!(cfg.bl_level_vbat, [80, 40, 10]);
    assert!(!cfg.haptics.enabled);
    // Haptics fields missing from the artifact keep their defaults.
    assert!(cfg.haptics.trigger_on_alarm);
    assert_eq!(cfg.open_weather.poll_frequency, 60);
    assert!(cfg.has_network_credentials());
    assert!(cfg.has_locality_set());
}

#[test]
fn test_v1_artifact_is_rewritten_in_current_layout() {
    let cfg = decode(V1_ARTIFACT).expect("decode");
    let tree: Value = serde_json::from_str(&encode(&cfg).expect("encode")).expect("json");

    assert_eq!(tree["schema_version"], json!(CURRENT_SCHEMA_VERSION));
    assert!(tree.get("ver").is_none());
    assert_eq!(tree["wifi_options"][0]["ssid"], json!("Home"));
    assert!(tree["wifi_options"][0].get("wifi_ssid").is_none());
}

#[test]
fn test_newer_firmware_fields_survive_an_older_round_trip() {
    // Arrange: a v3 artifact with a field and a whole sub-tree this build lacks
    let text = json!({
        "schema_version": 3,
        "first_time": false,
        "country": "DE",
        "step_goal": 12000,
        "sleep": { "tracking": true, "window": [22, 7] },
        "haptics": { "enabled": true, "pattern": "double" }
    })
    .to_string();

    // Act: decode, change something through the binding table, encode again
    let mut cfg = decode(&text).expect("decode");
    cfg.set_setting(SettingKey::AudioUi, SettingValue::Bool(false))
        .expect("set");
    let tree: Value = serde_json::from_str(&encode(&cfg).expect("encode")).expect("json");

    // Assert
    assert_eq!(tree["step_goal"], json!(12000));
    assert_eq!(tree["sleep"], json!({ "tracking": true, "window": [22, 7] }));
    assert_eq!(tree["haptics"]["pattern"], json!("double"));
    assert_eq!(tree["audio_ui"], json!(false));
    assert_eq!(tree["country"], json!("DE"));
}

#[test]
fn test_empty_object_decodes_to_defaults() {
    let cfg = decode("{}").expect("decode");
    assert_eq!(cfg, Config::default());
}

#[test]
fn test_default_config_round_trips() {
    let cfg = Config::default();
    let restored = decode(&encode(&cfg).expect("encode")).expect("decode");
    assert_eq!(cfg, restored);
}
