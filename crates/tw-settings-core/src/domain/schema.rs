//! The settings aggregate persisted on the watch.
//!
//! [`Config`] is the single in-memory copy of every user preference.  It is
//! built once with compiled-in defaults, then either replaced wholesale by a
//! decoded artifact or left at defaults on a fresh device.
//!
//! # Sub-trees
//!
//! Feature-specific settings (MQTT, haptics, widgets, apps) live in their own
//! structs and are serialized as nested objects rather than flattened into the
//! top level.  Adding a field to [`HapticsConfig`] therefore never touches the
//! layout of [`MqttConfig`] or of the top-level keys.
//!
//! # Unknown keys
//!
//! Every object node carries an `extra` map.  The codec puts any key it does
//! not recognise there, and writes it back untouched on the next save, so a
//! downgrade to older firmware does not erase data a newer release added.

use serde::Serialize;
use serde_json::{Map, Value};

/// Schema version written by this firmware.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Maximum number of remembered alternate Wi-Fi stations.
pub const MAX_WIFI_STATIONS: usize = 5;

/// `utc_offset` value meaning "the user never picked a timezone".
pub const UTC_OFFSET_UNSET: i16 = 999;

/// Keys a node did not recognise, kept verbatim for the next write.
pub type ExtraFields = Map<String, Value>;

/// One remembered Wi-Fi network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WifiStation {
    pub ssid: String,
    pub pass: String,
    pub channel: u8,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl WifiStation {
    pub fn new(ssid: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            pass: pass.into(),
            ..Self::default()
        }
    }
}

impl Default for WifiStation {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            pass: String::new(),
            channel: 9,
            extra: ExtraFields::new(),
        }
    }
}

/// Outcome of [`Config::update_network_credentials`].
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialUpdate {
    /// An alternate with the same SSID existed; its password was replaced.
    Updated,
    /// A new alternate was appended.
    Added,
    /// A new alternate was appended and the oldest one was dropped to stay
    /// within [`MAX_WIFI_STATIONS`].
    AddedEvicted(WifiStation),
}

/// MQTT messaging transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MqttConfig {
    pub enabled: bool,
    pub broker_ip: String,
    pub broker_port: u16,
    pub username: String,
    pub password: String,
    pub device_name: String,
    pub topic_listen: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            broker_ip: String::new(),
            broker_port: 1883,
            username: String::new(),
            password: String::new(),
            device_name: "tinywatch".to_string(),
            topic_listen: "tinywatch/listen".to_string(),
            extra: ExtraFields::new(),
        }
    }
}

/// Which events fire the haptic motor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HapticsConfig {
    pub enabled: bool,
    pub trigger_on_boot: bool,
    pub trigger_on_wake: bool,
    pub trigger_on_alarm: bool,
    pub trigger_on_hour: bool,
    pub trigger_on_event: bool,
    pub trigger_on_longpress: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_on_boot: true,
            trigger_on_wake: false,
            trigger_on_alarm: true,
            trigger_on_hour: false,
            trigger_on_event: true,
            trigger_on_longpress: true,
            extra: ExtraFields::new(),
        }
    }
}

/// Binary clock face style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomBinaryConfig {
    /// Index into the face's colour table (0..=2).
    pub binary_clockcolour: u8,
    pub binary_clockstyle: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for CustomBinaryConfig {
    fn default() -> Self {
        Self {
            binary_clockcolour: 0,
            binary_clockstyle: false,
            extra: ExtraFields::new(),
        }
    }
}

/// Battery / fuel-gauge widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryWidgetConfig {
    pub low_perc: u8,
    pub low_volt_warn_mv: u16,
    pub low_volt_cutoff_mv: u16,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for BatteryWidgetConfig {
    fn default() -> Self {
        Self {
            low_perc: 20,
            low_volt_warn_mv: 3500,
            low_volt_cutoff_mv: 3200,
            extra: ExtraFields::new(),
        }
    }
}

/// Open Weather widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenWeatherConfig {
    pub enabled: bool,
    pub api_key: String,
    /// Minutes between polls.
    pub poll_frequency: u16,
    pub units_metric: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            poll_frequency: 30,
            units_metric: true,
            extra: ExtraFields::new(),
        }
    }
}

/// Microphone app.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MicrophoneAppConfig {
    pub sensitivity: u8,
    pub record_seconds: u16,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for MicrophoneAppConfig {
    fn default() -> Self {
        Self {
            sensitivity: 50,
            record_seconds: 10,
            extra: ExtraFields::new(),
        }
    }
}

/// Compass app.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompassAppConfig {
    pub calibrated: bool,
    pub hard_iron_offsets: [i32; 3],
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for CompassAppConfig {
    fn default() -> Self {
        Self {
            calibrated: false,
            hard_iron_offsets: [0, 0, 0],
            extra: ExtraFields::new(),
        }
    }
}

/// Every persisted setting on the device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub schema_version: u32,
    pub first_time: bool,

    // Network
    pub wifi_start: bool,
    pub wifi_ssid: String,
    pub wifi_pass: String,
    pub wifi_options: Vec<WifiStation>,
    pub mdns_name: String,
    pub website_darkmode: bool,

    // Locality; country is needed by weather widgets.
    pub country: String,
    pub city: String,
    pub utc_offset: i16,

    // Display: three backlight steps per power source.
    /// Seconds at each step while on USB power.
    pub bl_period_vbus: [u16; 3],
    /// Seconds at each step while on battery.
    pub bl_period_vbat: [u16; 3],
    /// Brightness percentage at each step while on USB power.
    pub bl_level_vbus: [u8; 3],
    /// Brightness percentage at each step while on battery.
    pub bl_level_vbat: [u8; 3],

    // Time
    pub time_24hour: bool,
    /// `false` is DMY, `true` is MDY.
    pub time_dateformat: bool,
    pub clock_face_index: u8,

    // Watch
    pub left_handed: bool,
    pub flipped: bool,
    pub show_nav_arrows: bool,

    // Sound
    pub audio_ui: bool,
    pub audio_alarm: bool,
    pub audio_on_hour: bool,
    pub audio_test: bool,

    // IMU
    pub imu_process_steps: bool,
    pub imu_process_wrist: bool,

    pub mqtt: MqttConfig,
    pub haptics: HapticsConfig,
    pub custom_binary: CustomBinaryConfig,

    // Widgets
    pub battery: BatteryWidgetConfig,
    pub open_weather: OpenWeatherConfig,

    // Apps
    pub app_microphone: MicrophoneAppConfig,
    pub compass: CompassAppConfig,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            first_time: true,
            wifi_start: false,
            wifi_ssid: String::new(),
            wifi_pass: String::new(),
            wifi_options: Vec::new(),
            mdns_name: "tinywatch".to_string(),
            website_darkmode: true,
            country: String::new(),
            city: String::new(),
            utc_offset: UTC_OFFSET_UNSET,
            bl_period_vbus: [120, 120, 120],
            bl_period_vbat: [30, 45, 60],
            bl_level_vbus: [100, 80, 60],
            bl_level_vbat: [100, 60, 30],
            time_24hour: false,
            time_dateformat: false,
            clock_face_index: 0,
            left_handed: true,
            flipped: false,
            show_nav_arrows: true,
            audio_ui: true,
            audio_alarm: true,
            audio_on_hour: false,
            audio_test: false,
            imu_process_steps: true,
            imu_process_wrist: false,
            mqtt: MqttConfig::default(),
            haptics: HapticsConfig::default(),
            custom_binary: CustomBinaryConfig::default(),
            battery: BatteryWidgetConfig::default(),
            open_weather: OpenWeatherConfig::default(),
            app_microphone: MicrophoneAppConfig::default(),
            compass: CompassAppConfig::default(),
            extra: ExtraFields::new(),
        }
    }
}

impl Config {
    /// Returns `true` if there is any network the watch could try to join.
    pub fn has_network_credentials(&self) -> bool {
        !self.wifi_ssid.is_empty() || !self.wifi_options.is_empty()
    }

    /// Returns `true` once the user has picked a country.
    pub fn has_locality_set(&self) -> bool {
        !self.country.is_empty()
    }

    /// Returns `true` once the user has picked a timezone offset.
    pub fn has_utc_offset(&self) -> bool {
        self.utc_offset != UTC_OFFSET_UNSET
    }

    /// Makes `ssid`/`pass` the primary network and remembers it as an
    /// alternate station.
    ///
    /// An alternate with the same SSID has its password replaced in place.
    /// Otherwise a new alternate is appended; when that pushes the list past
    /// [`MAX_WIFI_STATIONS`], the oldest entry is evicted and returned.
    pub fn update_network_credentials(&mut self, ssid: &str, pass: &str) -> CredentialUpdate {
        self.wifi_ssid = ssid.to_string();
        self.wifi_pass = pass.to_string();

        if let Some(station) = self.wifi_options.iter_mut().find(|s| s.ssid == ssid) {
            station.pass = pass.to_string();
            return CredentialUpdate::Updated;
        }

        self.wifi_options.push(WifiStation::new(ssid, pass));
        if self.wifi_options.len() > MAX_WIFI_STATIONS {
            let evicted = self.wifi_options.remove(0);
            tracing::debug!(ssid = %evicted.ssid, "evicted oldest wifi station");
            return CredentialUpdate::AddedEvicted(evicted);
        }
        CredentialUpdate::Added
    }
}
