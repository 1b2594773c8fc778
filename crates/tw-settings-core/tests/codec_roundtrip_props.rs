//! Generated round-trip tests for the settings codec.
//!
//! Every field of every node is drawn at random: empty and non-ASCII
//! strings, the full range of each integer, up to [`MAX_WIFI_STATIONS`]
//! alternates, and unknown keys whose values nest objects and arrays.
//! Whatever [`encode`] writes, [`decode`] must read back unchanged.

use proptest::prelude::*;
use serde_json::Value;
use tw_settings_core::{
    decode, encode, BatteryWidgetConfig, CompassAppConfig, Config, CustomBinaryConfig,
    ExtraFields, HapticsConfig, MicrophoneAppConfig, MqttConfig, OpenWeatherConfig, WifiStation,
    CURRENT_SCHEMA_VERSION, MAX_WIFI_STATIONS,
};

// Floats are left out: a JSON number may not come back bit-identical.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<String>().prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(any::<String>(), inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Unknown keys never collide with a named field.
fn arb_extra() -> impl Strategy<Value = ExtraFields> {
    prop::collection::btree_map("x_[a-z0-9_]{1,10}", arb_json(), 0..4)
        .prop_map(|m| m.into_iter().collect())
}

prop_compose! {
    fn arb_station()(
        ssid in any::<String>(),
        pass in any::<String>(),
        channel in any::<u8>(),
        extra in arb_extra(),
    ) -> WifiStation {
        WifiStation { ssid, pass, channel, extra }
    }
}

prop_compose! {
    fn arb_mqtt()(
        enabled in any::<bool>(),
        broker_ip in any::<String>(),
        broker_port in any::<u16>(),
        username in any::<String>(),
        password in any::<String>(),
        device_name in any::<String>(),
        topic_listen in any::<String>(),
        extra in arb_extra(),
    ) -> MqttConfig {
        MqttConfig { enabled, broker_ip, broker_port, username, password, device_name, topic_listen, extra }
    }
}

prop_compose! {
    fn arb_haptics()(flags in any::<[bool; 7]>(), extra in arb_extra()) -> HapticsConfig {
        let [enabled, trigger_on_boot, trigger_on_wake, trigger_on_alarm, trigger_on_hour, trigger_on_event, trigger_on_longpress] = flags;
        HapticsConfig {
            enabled,
            trigger_on_boot,
            trigger_on_wake,
            trigger_on_alarm,
            trigger_on_hour,
            trigger_on_event,
            trigger_on_longpress,
            extra,
        }
    }
}

prop_compose! {
    fn arb_custom_binary()(
        binary_clockcolour in 0u8..=2,
        binary_clockstyle in any::<bool>(),
        extra in arb_extra(),
    ) -> CustomBinaryConfig {
        CustomBinaryConfig { binary_clockcolour, binary_clockstyle, extra }
    }
}

prop_compose! {
    fn arb_battery()(
        low_perc in any::<u8>(),
        low_volt_warn_mv in any::<u16>(),
        low_volt_cutoff_mv in any::<u16>(),
        extra in arb_extra(),
    ) -> BatteryWidgetConfig {
        BatteryWidgetConfig { low_perc, low_volt_warn_mv, low_volt_cutoff_mv, extra }
    }
}

prop_compose! {
    fn arb_open_weather()(
        enabled in any::<bool>(),
        api_key in any::<String>(),
        poll_frequency in any::<u16>(),
        units_metric in any::<bool>(),
        extra in arb_extra(),
    ) -> OpenWeatherConfig {
        OpenWeatherConfig { enabled, api_key, poll_frequency, units_metric, extra }
    }
}

prop_compose! {
    fn arb_microphone()(
        sensitivity in any::<u8>(),
        record_seconds in any::<u16>(),
        extra in arb_extra(),
    ) -> MicrophoneAppConfig {
        MicrophoneAppConfig { sensitivity, record_seconds, extra }
    }
}

prop_compose! {
    fn arb_compass()(
        calibrated in any::<bool>(),
        hard_iron_offsets in any::<[i32; 3]>(),
        extra in arb_extra(),
    ) -> CompassAppConfig {
        CompassAppConfig { calibrated, hard_iron_offsets, extra }
    }
}

prop_compose! {
    fn arb_config()(
        strings in any::<[String; 5]>(),
        stations in prop::collection::vec(arb_station(), 0..=MAX_WIFI_STATIONS),
        utc_offset in any::<i16>(),
        periods in any::<[[u16; 3]; 2]>(),
        levels in any::<[[u8; 3]; 2]>(),
        flags in any::<[bool; 14]>(),
        clock_face_index in any::<u8>(),
        sections in (arb_mqtt(), arb_haptics(), arb_custom_binary(), arb_battery()),
        apps in (arb_open_weather(), arb_microphone(), arb_compass()),
        extra in arb_extra(),
    ) -> Config {
        let [wifi_ssid, wifi_pass, mdns_name, country, city] = strings;
        let (mqtt, haptics, custom_binary, battery) = sections;
        let (open_weather, app_microphone, compass) = apps;
        Config {
            schema_version: CURRENT_SCHEMA_VERSION,
            first_time: flags[0],
            wifi_start: flags[1],
            wifi_ssid,
            wifi_pass,
            wifi_options: stations,
            mdns_name,
            website_darkmode: flags[2],
            country,
            city,
            utc_offset,
            bl_period_vbus: periods[0],
            bl_period_vbat: periods[1],
            bl_level_vbus: levels[0],
            bl_level_vbat: levels[1],
            time_24hour: flags[3],
            time_dateformat: flags[4],
            clock_face_index,
            left_handed: flags[5],
            flipped: flags[6],
            show_nav_arrows: flags[7],
            audio_ui: flags[8],
            audio_alarm: flags[9],
            audio_on_hour: flags[10],
            audio_test: flags[11],
            imu_process_steps: flags[12],
            imu_process_wrist: flags[13],
            mqtt,
            haptics,
            custom_binary,
            battery,
            open_weather,
            app_microphone,
            compass,
            extra,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_decode_restores_every_encoded_config(config in arb_config()) {
        let text = encode(&config).expect("encode");
        let restored = decode(&text).expect("decode");
        prop_assert_eq!(restored, config);
    }

    #[test]
    fn test_reencoding_a_decoded_config_is_stable(config in arb_config()) {
        let text = encode(&config).expect("encode");
        let again = encode(&decode(&text).expect("decode")).expect("encode");
        prop_assert_eq!(again, text);
    }

    #[test]
    fn test_unicode_station_credentials_survive(ssid in "\\PC*", pass in "\\PC*") {
        let mut config = Config::default();
        config.update_network_credentials(&ssid, &pass);

        let restored = decode(&encode(&config).expect("encode")).expect("decode");

        prop_assert_eq!(restored.wifi_ssid, ssid);
        prop_assert_eq!(restored.wifi_pass, pass);
        prop_assert_eq!(restored.wifi_options, config.wifi_options);
    }
}
