//! Field-by-field decoders for every node of the settings tree.
//!
//! Each impl starts from the node's compiled-in default and overrides only
//! what the reader finds.  `extra` is always read last so it only holds keys
//! none of the named fields claimed.

use crate::domain::schema::{
    BatteryWidgetConfig, CompassAppConfig, Config, CustomBinaryConfig, HapticsConfig,
    MicrophoneAppConfig, MqttConfig, OpenWeatherConfig, WifiStation,
};

use super::reader::{FieldReader, Section};

impl Section for WifiStation {
    fn read(r: &mut FieldReader<'_>) -> Self {
        let d = Self::default();
        Self {
            ssid: r.value("ssid", d.ssid),
            pass: r.value("pass", d.pass),
            channel: r.value("channel", d.channel),
            extra: r.unknown(),
        }
    }
}

impl Section for MqttConfig {
    fn read(r: &mut FieldReader<'_>) -> Self {
        let d = Self::default();
        Self {
            enabled: r.value("enabled", d.enabled),
            broker_ip: r.value("broker_ip", d.broker_ip),
            broker_port: r.value("broker_port", d.broker_port),
            username: r.value("username", d.username),
            password: r.value("password", d.password),
            device_name: r.value("device_name", d.device_name),
            topic_listen: r.value("topic_listen", d.topic_listen),
            extra: r.unknown(),
        }
    }
}

impl Section for HapticsConfig {
    fn read(r: &mut FieldReader<'_>) -> Self {
        let d = Self::default();
        Self {
            enabled: r.value("enabled", d.enabled),
            trigger_on_boot: r.value("trigger_on_boot", d.trigger_on_boot),
            trigger_on_wake: r.value("trigger_on_wake", d.trigger_on_wake),
            trigger_on_alarm: r.value("trigger_on_alarm", d.trigger_on_alarm),
            trigger_on_hour: r.value("trigger_on_hour", d.trigger_on_hour),
            trigger_on_event: r.value("trigger_on_event", d.trigger_on_event),
            trigger_on_longpress: r.value("trigger_on_longpress", d.trigger_on_longpress),
            extra: r.unknown(),
        }
    }
}

impl Section for CustomBinaryConfig {
    fn read(r: &mut FieldReader<'_>) -> Self {
        let d = Self::default();
        let mut colour = r.value("binary_clockcolour", d.binary_clockcolour);
        // The face indexes a three-entry colour table.
        if colour > 2 {
            tracing::warn!(colour, "binary_clockcolour out of range, using default");
            colour = d.binary_clockcolour;
        }
        Self {
            binary_clockcolour: colour,
            binary_clockstyle: r.value("binary_clockstyle", d.binary_clockstyle),
            extra: r.unknown(),
        }
    }
}

impl Section for BatteryWidgetConfig {
    fn read(r: &mut FieldReader<'_>) -> Self {
        let d = Self::default();
        Self {
            low_perc: r.value("low_perc", d.low_perc),
            low_volt_warn_mv: r.value("low_volt_warn_mv", d.low_volt_warn_mv),
            low_volt_cutoff_mv: r.value("low_volt_cutoff_mv", d.low_volt_cutoff_mv),
            extra: r.unknown(),
        }
    }
}

impl Section for OpenWeatherConfig {
    fn read(r: &mut FieldReader<'_>) -> Self {
        let d = Self::default();
        Self {
            enabled: r.value("enabled", d.enabled),
            api_key: r.value("api_key", d.api_key),
            poll_frequency: r.value("poll_frequency", d.poll_frequency),
            units_metric: r.value("units_metric", d.units_metric),
            extra: r.unknown(),
        }
    }
}

impl Section for MicrophoneAppConfig {
    fn read(r: &mut FieldReader<'_>) -> Self {
        let d = Self::default();
        Self {
            sensitivity: r.value("sensitivity", d.sensitivity),
            record_seconds: r.value("record_seconds", d.record_seconds),
            extra: r.unknown(),
        }
    }
}

impl Section for CompassAppConfig {
    fn read(r: &mut FieldReader<'_>) -> Self {
        let d = Self::default();
        Self {
            calibrated: r.value("calibrated", d.calibrated),
            hard_iron_offsets: r.value("hard_iron_offsets", d.hard_iron_offsets),
            extra: r.unknown(),
        }
    }
}

impl Section for Config {
    fn read(r: &mut FieldReader<'_>) -> Self {
        let d = Self::default();
        Self {
            schema_version: r.value("schema_version", d.schema_version),
            first_time: r.value("first_time", d.first_time),
            wifi_start: r.value("wifi_start", d.wifi_start),
            wifi_ssid: r.value("wifi_ssid", d.wifi_ssid),
            wifi_pass: r.value("wifi_pass", d.wifi_pass),
            wifi_options: r.list("wifi_options"),
            mdns_name: r.value("mdns_name", d.mdns_name),
            website_darkmode: r.value("website_darkmode", d.website_darkmode),
            country: r.value("country", d.country),
            city: r.value("city", d.city),
            utc_offset: r.value("utc_offset", d.utc_offset),
            bl_period_vbus: r.value("bl_period_vbus", d.bl_period_vbus),
            bl_period_vbat: r.value("bl_period_vbat", d.bl_period_vbat),
            bl_level_vbus: r.value("bl_level_vbus", d.bl_level_vbus),
            bl_level_vbat: r.value("bl_level_vbat", d.bl_level_vbat),
            time_24hour: r.value("time_24hour", d.time_24hour),
            time_dateformat: r.value("time_dateformat", d.time_dateformat),
            clock_face_index: r.value("clock_face_index", d.clock_face_index),
            left_handed: r.value("left_handed", d.left_handed),
            flipped: r.value("flipped", d.flipped),
            show_nav_arrows: r.value("show_nav_arrows", d.show_nav_arrows),
            audio_ui: r.value("audio_ui", d.audio_ui),
            audio_alarm: r.value("audio_alarm", d.audio_alarm),
            audio_on_hour: r.value("audio_on_hour", d.audio_on_hour),
            audio_test: r.value("audio_test", d.audio_test),
            imu_process_steps: r.value("imu_process_steps", d.imu_process_steps),
            imu_process_wrist: r.value("imu_process_wrist", d.imu_process_wrist),
            mqtt: r.section("mqtt"),
            haptics: r.section("haptics"),
            custom_binary: r.section("custom_binary"),
            battery: r.section("battery"),
            open_weather: r.section("open_weather"),
            app_microphone: r.section("app_microphone"),
            compass: r.section("compass"),
            extra: r.unknown(),
        }
    }
}
