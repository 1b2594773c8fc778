//! Text encoding of the settings tree.
//!
//! The persisted artifact is pretty-printed JSON: one object per
//! [`Config`] node, nested sub-configs as nested objects.
//!
//! Decoding is deliberately forgiving.  Only text that is not JSON at all, or
//! whose root is not an object, is a [`DecodeError`]; everything below the
//! root degrades per field (see [`reader`]).  Migrations in [`migrate`] run
//! on the parsed tree before the typed fields are pulled out, and the result
//! is always stamped with [`CURRENT_SCHEMA_VERSION`].

pub mod migrate;
mod reader;
mod sections;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::domain::schema::{Config, CURRENT_SCHEMA_VERSION};

use reader::{FieldReader, Section};

/// Error type for [`decode`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The text is not parseable JSON (empty, truncated, or garbage).
    #[error("settings text is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The text parsed, but the root is not an object.
    #[error("settings root must be an object, found {0}")]
    NotAnObject(&'static str),
}

/// Error type for [`encode`].
#[derive(Debug, Error)]
#[error("failed to encode settings: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// Renders `config` as the persisted text form.
///
/// # Errors
///
/// Returns [`EncodeError`] if serialization fails, which only happens if an
/// `extra` map was filled with something JSON cannot represent.
pub fn encode(config: &Config) -> Result<String, EncodeError> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Parses persisted text back into a [`Config`].
///
/// # Errors
///
/// Returns [`DecodeError`] only when the text as a whole is unusable.
pub fn decode(text: &str) -> Result<Config, DecodeError> {
    let root: Value = serde_json::from_str(text)?;
    let mut fields = match root {
        Value::Object(fields) => fields,
        other => return Err(DecodeError::NotAnObject(reader::kind_of(&other))),
    };

    let written_with = migrate::upgrade(&mut fields);
    let mut config = Config::read(&mut FieldReader::new("", &fields));
    config.schema_version = CURRENT_SCHEMA_VERSION;

    debug!(written_with, "decoded settings");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::WifiStation;
    use serde_json::json;

    fn sample_config() -> Config {
        let mut cfg = Config::default();
        cfg.first_time = false;
        cfg.update_network_credentials("Home", "secret");
        cfg.wifi_options.push(WifiStation {
            channel: 11,
            ..WifiStation::new("Office", "corp")
        });
        cfg.country = "NZ".to_string();
        cfg.city = "Wellington".to_string();
        cfg.utc_offset = 12;
        cfg.bl_level_vbat = [90, 50, 20];
        cfg.haptics.trigger_on_hour = true;
        cfg.mqtt.broker_ip = "192.168.1.5".to_string();
        cfg.compass.hard_iron_offsets = [-12, 40, 7];
        cfg
    }

    #[test]
    fn test_encode_decode_round_trip_preserves_config() {
        // Arrange
        let cfg = sample_config();

        // Act
        let text = encode(&cfg).expect("encode");
        let restored = decode(&text).expect("decode");

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_encode_nests_sub_configs() {
        let text = encode(&Config::default()).expect("encode");
        let tree: Value = serde_json::from_str(&text).expect("json");
        assert!(tree["mqtt"].is_object());
        assert!(tree["haptics"]["enabled"].is_boolean());
        assert_eq!(tree["bl_period_vbus"], json!([120, 120, 120]));
    }

    #[test]
    fn test_decode_missing_field_uses_default_and_keeps_others() {
        // Arrange: a full artifact with one field removed
        let cfg = sample_config();
        let mut tree: Value = serde_json::from_str(&encode(&cfg).unwrap()).unwrap();
        tree.as_object_mut().unwrap().remove("city");

        // Act
        let restored = decode(&tree.to_string()).expect("decode");

        // Assert
        assert_eq!(restored.city, Config::default().city);
        let expected = Config {
            city: Config::default().city,
            ..cfg
        };
        assert_eq!(restored, expected);
    }

    #[test]
    fn test_decode_wrong_shape_field_falls_back_to_default() {
        let text = json!({
            "schema_version": 2,
            "first_time": false,
            "utc_offset": "plus ten",
            "bl_level_vbus": [1, 2],
            "haptics": "loud"
        })
        .to_string();

        let cfg = decode(&text).expect("decode");

        assert!(!cfg.first_time);
        assert_eq!(cfg.utc_offset, Config::default().utc_offset);
        assert_eq!(cfg.bl_level_vbus, Config::default().bl_level_vbus);
        assert_eq!(cfg.haptics, Config::default().haptics);
    }

    #[test]
    fn test_unknown_keys_survive_decode_encode_at_every_level() {
        // Arrange
        let text = json!({
            "schema_version": 2,
            "future_top": { "nested": [1, 2, 3] },
            "mqtt": { "enabled": true, "tls": true },
            "wifi_options": [ { "ssid": "A", "pass": "b", "channel": 1, "bssid": "aa:bb" } ]
        })
        .to_string();

        // Act
        let cfg = decode(&text).expect("decode");
        let reencoded: Value = serde_json::from_str(&encode(&cfg).unwrap()).unwrap();

        // Assert
        assert_eq!(reencoded["future_top"], json!({ "nested": [1, 2, 3] }));
        assert_eq!(reencoded["mqtt"]["tls"], json!(true));
        assert_eq!(reencoded["mqtt"]["enabled"], json!(true));
        assert_eq!(reencoded["wifi_options"][0]["bssid"], json!("aa:bb"));
    }

    #[test]
    fn test_decode_v1_artifact_migrates_stations_and_stamps_version() {
        let text = json!({
            "ver": 1,
            "first_time": false,
            "wifi_ssid": "Home",
            "wifi_options": [ { "wifi_ssid": "Home", "wifi_pass": "pw", "channel": 3 } ]
        })
        .to_string();

        let cfg = decode(&text).expect("decode");

        assert_eq!(cfg.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(cfg.wifi_options.len(), 1);
        assert_eq!(cfg.wifi_options[0].ssid, "Home");
        assert_eq!(cfg.wifi_options[0].pass, "pw");
        assert_eq!(cfg.wifi_options[0].channel, 3);
        assert!(cfg.extra.is_empty(), "legacy tag must not leak into extras");
    }

    #[test]
    fn test_decode_rejects_invalid_text() {
        assert!(matches!(decode("{ \"first_time\": tr"), Err(DecodeError::Syntax(_))));
        assert!(matches!(decode(""), Err(DecodeError::Syntax(_))));
    }

    #[test]
    fn test_decode_rejects_non_object_root() {
        assert!(matches!(decode("[1, 2]"), Err(DecodeError::NotAnObject("array"))));
    }
}
