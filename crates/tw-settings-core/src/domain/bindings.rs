//! Setting bindings: a keyed accessor table for settings UIs.
//!
//! A settings screen (on-watch controls or the web portal) needs to list,
//! read, and change individual fields without holding references into
//! [`Config`].  Every bindable field gets a stable [`SettingKey`] whose string
//! id matches its path in the persisted tree (`"haptics.enabled"`), plus a
//! [`SettingSpec`] describing its group, label, and the value range a UI may
//! offer.
//!
//! [`Config::set_setting`] validates the value against its [`SettingSpec`] before
//! touching the schema, so a rejected write leaves the config unchanged.

use std::fmt;

use thiserror::Error;

use super::schema::Config;

/// Error type for setting reads and writes.
#[derive(Debug, Error, PartialEq)]
pub enum BindingError {
    #[error("unknown setting id: {0}")]
    UnknownSetting(String),
    #[error("setting {id} expects {expected}, got {got}")]
    WrongKind {
        id: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    #[error("setting {id}: {value} is outside {min}..={max}")]
    OutOfRange {
        id: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("setting {id} expects {expected} values, got {got}")]
    WrongLength {
        id: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("setting {id}: cannot parse {input:?}")]
    Unparseable { id: &'static str, input: String },
}

/// Whether a group configures the watch itself or an optional feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Control,
    Widget,
    Mqtt,
}

/// A titled section of the settings UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingGroup {
    General,
    Audio,
    Haptics,
    Display,
    OpenWeather,
    Mqtt,
}

impl SettingGroup {
    pub const ALL: [SettingGroup; 6] = [
        SettingGroup::General,
        SettingGroup::Audio,
        SettingGroup::Haptics,
        SettingGroup::Display,
        SettingGroup::OpenWeather,
        SettingGroup::Mqtt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SettingGroup::General => "General Watch Settings",
            SettingGroup::Audio => "Audio Settings",
            SettingGroup::Haptics => "Haptics Settings",
            SettingGroup::Display => "Display Settings",
            SettingGroup::OpenWeather => "Open Weather Settings",
            SettingGroup::Mqtt => "MQTT Settings",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SettingGroup::Haptics => {
                "Haptics are only available in TinyWATCH revision P7 and later."
            }
            SettingGroup::Display => {
                "Your watch has 3 steps of brightness, based on the duration at each step. \
                 Step 1 is the brightest and step 3 is the lowest. At each duration interval \
                 the brightness drops to the next step. Touching the screen returns to step 1."
            }
            SettingGroup::OpenWeather => {
                "Add your Open Weather API key here to see current weather on your watch face."
            }
            _ => "",
        }
    }

    pub fn kind(self) -> GroupKind {
        match self {
            SettingGroup::OpenWeather => GroupKind::Widget,
            SettingGroup::Mqtt => GroupKind::Mqtt,
            _ => GroupKind::Control,
        }
    }

    /// Keys belonging to this group, in display order.
    pub fn keys(self) -> impl Iterator<Item = SettingKey> {
        SettingKey::ALL
            .iter()
            .copied()
            .filter(move |k| k.spec().group == self)
    }
}

/// Value shape and UI range of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Toggle {
        off: &'static str,
        on: &'static str,
    },
    Int {
        min: i64,
        max: i64,
        step: i64,
    },
    Text,
    IntList {
        min: i64,
        max: i64,
        step: i64,
        len: usize,
    },
}

/// Static description of one bindable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingSpec {
    pub key: SettingKey,
    pub group: SettingGroup,
    pub label: &'static str,
    pub kind: SettingKind,
}

/// A setting value moving between the schema and a UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
    IntList(Vec<i64>),
}

impl SettingValue {
    fn kind_name(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "a toggle",
            SettingValue::Int(_) => "an integer",
            SettingValue::Text(_) => "text",
            SettingValue::IntList(_) => "an integer list",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Int(i) => write!(f, "{i}"),
            SettingValue::Text(s) => write!(f, "{s}"),
            SettingValue::IntList(list) => {
                let parts: Vec<String> = list.iter().map(i64::to_string).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

macro_rules! setting_keys {
    ($($variant:ident => $id:literal),+ $(,)?) => {
        /// Stable identifier of a bindable setting.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SettingKey {
            $($variant),+
        }

        impl SettingKey {
            pub const ALL: &'static [SettingKey] = &[$(SettingKey::$variant),+];

            /// Dotted path of the field in the persisted tree.
            pub fn id(self) -> &'static str {
                match self {
                    $(SettingKey::$variant => $id),+
                }
            }
        }
    };
}

setting_keys! {
    WifiStart => "wifi_start",
    Time24Hour => "time_24hour",
    TimeDateFormat => "time_dateformat",
    LeftHanded => "left_handed",
    Flipped => "flipped",
    NavArrows => "show_nav_arrows",
    AudioUi => "audio_ui",
    AudioAlarm => "audio_alarm",
    AudioOnHour => "audio_on_hour",
    HapticsEnabled => "haptics.enabled",
    HapticsOnBoot => "haptics.trigger_on_boot",
    HapticsOnWake => "haptics.trigger_on_wake",
    HapticsOnAlarm => "haptics.trigger_on_alarm",
    HapticsOnHour => "haptics.trigger_on_hour",
    HapticsOnEvent => "haptics.trigger_on_event",
    HapticsOnLongPress => "haptics.trigger_on_longpress",
    BacklightLevelVbus => "bl_level_vbus",
    BacklightLevelVbat => "bl_level_vbat",
    BacklightPeriodVbus => "bl_period_vbus",
    BacklightPeriodVbat => "bl_period_vbat",
    WeatherEnabled => "open_weather.enabled",
    WeatherApiKey => "open_weather.api_key",
    WeatherPollInterval => "open_weather.poll_frequency",
    WeatherUnits => "open_weather.units_metric",
    MqttEnabled => "mqtt.enabled",
    MqttBrokerIp => "mqtt.broker_ip",
    MqttBrokerPort => "mqtt.broker_port",
    MqttUsername => "mqtt.username",
    MqttPassword => "mqtt.password",
    MqttDeviceName => "mqtt.device_name",
    MqttTopicListen => "mqtt.topic_listen",
}

const NO_YES: SettingKind = SettingKind::Toggle { off: "NO", on: "YES" };
const LEVELS: SettingKind = SettingKind::IntList {
    min: 0,
    max: 100,
    step: 10,
    len: 3,
};
const PERIODS: SettingKind = SettingKind::IntList {
    min: 0,
    max: 600,
    step: 1,
    len: 3,
};

impl SettingKey {
    /// Looks a key up by its dotted id.
    pub fn from_id(id: &str) -> Result<SettingKey, BindingError> {
        SettingKey::ALL
            .iter()
            .copied()
            .find(|k| k.id() == id)
            .ok_or_else(|| BindingError::UnknownSetting(id.to_string()))
    }

    pub fn spec(self) -> SettingSpec {
        use SettingGroup as G;
        use SettingKey as K;

        let (group, label, kind) = match self {
            K::WifiStart => (G::General, "Auto WiFi", NO_YES),
            K::Time24Hour => (G::General, "Time Mode", SettingKind::Toggle { off: "12H", on: "24H" }),
            K::TimeDateFormat => (G::General, "Date FMT", SettingKind::Toggle { off: "DMY", on: "MDY" }),
            K::LeftHanded => (G::General, "Handed", SettingKind::Toggle { off: "LEFT", on: "RIGHT" }),
            K::Flipped => (G::General, "Flipped", NO_YES),
            K::NavArrows => (G::General, "Nav Arrows", SettingKind::Toggle { off: "HIDE", on: "SHOW" }),
            K::AudioUi => (G::Audio, "UI Sound", NO_YES),
            K::AudioAlarm => (G::Audio, "Alarm Sound", NO_YES),
            K::AudioOnHour => (G::Audio, "Beep Hour", NO_YES),
            K::HapticsEnabled => (G::Haptics, "Enabled", NO_YES),
            K::HapticsOnBoot => (G::Haptics, "On Boot", NO_YES),
            K::HapticsOnWake => (G::Haptics, "On Wake", NO_YES),
            K::HapticsOnAlarm => (G::Haptics, "On Alarm", NO_YES),
            K::HapticsOnHour => (G::Haptics, "On Hour", NO_YES),
            K::HapticsOnEvent => (G::Haptics, "On Event", NO_YES),
            K::HapticsOnLongPress => (G::Haptics, "LongPress", NO_YES),
            K::BacklightLevelVbus => (G::Display, "Backlight brightness on USB (%)", LEVELS),
            K::BacklightLevelVbat => (G::Display, "Backlight brightness on Battery (%)", LEVELS),
            K::BacklightPeriodVbus => (G::Display, "Backlight duration on USB (Sec)", PERIODS),
            K::BacklightPeriodVbat => (G::Display, "Backlight duration on Battery (Sec)", PERIODS),
            K::WeatherEnabled => (G::OpenWeather, "Enabled", NO_YES),
            K::WeatherApiKey => (G::OpenWeather, "API KEY", SettingKind::Text),
            K::WeatherPollInterval => (
                G::OpenWeather,
                "Poll Interval (Min)",
                SettingKind::Int { min: 10, max: 300, step: 10 },
            ),
            K::WeatherUnits => (
                G::OpenWeather,
                "Temperature Units",
                SettingKind::Toggle { off: "Fahrenheit", on: "Celsius" },
            ),
            K::MqttEnabled => (G::Mqtt, "Enabled", NO_YES),
            K::MqttBrokerIp => (G::Mqtt, "Broker IP", SettingKind::Text),
            K::MqttBrokerPort => (G::Mqtt, "Broker Port", SettingKind::Int { min: 1, max: 65535, step: 1 }),
            K::MqttUsername => (G::Mqtt, "Username", SettingKind::Text),
            K::MqttPassword => (G::Mqtt, "Password", SettingKind::Text),
            K::MqttDeviceName => (G::Mqtt, "Device Name", SettingKind::Text),
            K::MqttTopicListen => (G::Mqtt, "Listen Topic", SettingKind::Text),
        };

        SettingSpec {
            key: self,
            group,
            label,
            kind,
        }
    }
}

impl SettingSpec {
    /// Parses user input (CLI argument, form field) into a value of this kind.
    ///
    /// Toggles accept `true/false`, `yes/no`, `on/off`, `1/0`, or either of
    /// the toggle's own labels.  Lists are comma separated.
    pub fn parse(&self, input: &str) -> Result<SettingValue, BindingError> {
        let id = self.key.id();
        let unparseable = || BindingError::Unparseable {
            id,
            input: input.to_string(),
        };
        let trimmed = input.trim();

        match self.kind {
            SettingKind::Toggle { off, on } => {
                let lower = trimmed.to_ascii_lowercase();
                if lower == on.to_ascii_lowercase() {
                    return Ok(SettingValue::Bool(true));
                }
                if lower == off.to_ascii_lowercase() {
                    return Ok(SettingValue::Bool(false));
                }
                match lower.as_str() {
                    "true" | "yes" | "on" | "1" => Ok(SettingValue::Bool(true)),
                    "false" | "no" | "off" | "0" => Ok(SettingValue::Bool(false)),
                    _ => Err(unparseable()),
                }
            }
            SettingKind::Int { .. } => trimmed
                .parse::<i64>()
                .map(SettingValue::Int)
                .map_err(|_| unparseable()),
            SettingKind::Text => Ok(SettingValue::Text(input.to_string())),
            SettingKind::IntList { .. } => trimmed
                .split(',')
                .map(|part| part.trim().parse::<i64>())
                .collect::<Result<Vec<_>, _>>()
                .map(SettingValue::IntList)
                .map_err(|_| unparseable()),
        }
    }

    /// Renders a value the way a UI control would show it.
    pub fn display(&self, value: &SettingValue) -> String {
        match (self.kind, value) {
            (SettingKind::Toggle { off, on }, SettingValue::Bool(b)) => {
                let label = if *b { on } else { off };
                label.to_string()
            }
            _ => value.to_string(),
        }
    }

    fn check_int(&self, value: i64, min: i64, max: i64) -> Result<i64, BindingError> {
        if value < min || value > max {
            return Err(BindingError::OutOfRange {
                id: self.key.id(),
                value,
                min,
                max,
            });
        }
        Ok(value)
    }

    /// Checks `value` against this spec's kind and range.
    pub fn validate(&self, value: &SettingValue) -> Result<(), BindingError> {
        let wrong_kind = |expected| BindingError::WrongKind {
            id: self.key.id(),
            expected,
            got: value.kind_name(),
        };

        match (self.kind, value) {
            (SettingKind::Toggle { .. }, SettingValue::Bool(_)) => Ok(()),
            (SettingKind::Toggle { .. }, _) => Err(wrong_kind("a toggle")),
            (SettingKind::Int { min, max, .. }, SettingValue::Int(v)) => {
                self.check_int(*v, min, max).map(|_| ())
            }
            (SettingKind::Int { .. }, _) => Err(wrong_kind("an integer")),
            (SettingKind::Text, SettingValue::Text(_)) => Ok(()),
            (SettingKind::Text, _) => Err(wrong_kind("text")),
            (SettingKind::IntList { min, max, len, .. }, SettingValue::IntList(list)) => {
                if list.len() != len {
                    return Err(BindingError::WrongLength {
                        id: self.key.id(),
                        expected: len,
                        got: list.len(),
                    });
                }
                for v in list {
                    self.check_int(*v, min, max)?;
                }
                Ok(())
            }
            (SettingKind::IntList { .. }, _) => Err(wrong_kind("an integer list")),
        }
    }
}

fn narrow<T: TryFrom<i64>>(id: &'static str, value: i64) -> Result<T, BindingError> {
    T::try_from(value).map_err(|_| BindingError::Unparseable {
        id,
        input: value.to_string(),
    })
}

fn narrow_list<T: TryFrom<i64> + Copy + Default>(
    id: &'static str,
    list: &[i64],
) -> Result<[T; 3], BindingError> {
    let mut out = [T::default(); 3];
    for (slot, v) in out.iter_mut().zip(list) {
        *slot = narrow(id, *v)?;
    }
    Ok(out)
}

impl Config {
    fn toggle(&self, key: SettingKey) -> Option<bool> {
        use SettingKey as K;
        Some(match key {
            K::WifiStart => self.wifi_start,
            K::Time24Hour => self.time_24hour,
            K::TimeDateFormat => self.time_dateformat,
            K::LeftHanded => self.left_handed,
            K::Flipped => self.flipped,
            K::NavArrows => self.show_nav_arrows,
            K::AudioUi => self.audio_ui,
            K::AudioAlarm => self.audio_alarm,
            K::AudioOnHour => self.audio_on_hour,
            K::HapticsEnabled => self.haptics.enabled,
            K::HapticsOnBoot => self.haptics.trigger_on_boot,
            K::HapticsOnWake => self.haptics.trigger_on_wake,
            K::HapticsOnAlarm => self.haptics.trigger_on_alarm,
            K::HapticsOnHour => self.haptics.trigger_on_hour,
            K::HapticsOnEvent => self.haptics.trigger_on_event,
            K::HapticsOnLongPress => self.haptics.trigger_on_longpress,
            K::WeatherEnabled => self.open_weather.enabled,
            K::WeatherUnits => self.open_weather.units_metric,
            K::MqttEnabled => self.mqtt.enabled,
            _ => return None,
        })
    }

    fn toggle_mut(&mut self, key: SettingKey) -> Option<&mut bool> {
        use SettingKey as K;
        Some(match key {
            K::WifiStart => &mut self.wifi_start,
            K::Time24Hour => &mut self.time_24hour,
            K::TimeDateFormat => &mut self.time_dateformat,
            K::LeftHanded => &mut self.left_handed,
            K::Flipped => &mut self.flipped,
            K::NavArrows => &mut self.show_nav_arrows,
            K::AudioUi => &mut self.audio_ui,
            K::AudioAlarm => &mut self.audio_alarm,
            K::AudioOnHour => &mut self.audio_on_hour,
            K::HapticsEnabled => &mut self.haptics.enabled,
            K::HapticsOnBoot => &mut self.haptics.trigger_on_boot,
            K::HapticsOnWake => &mut self.haptics.trigger_on_wake,
            K::HapticsOnAlarm => &mut self.haptics.trigger_on_alarm,
            K::HapticsOnHour => &mut self.haptics.trigger_on_hour,
            K::HapticsOnEvent => &mut self.haptics.trigger_on_event,
            K::HapticsOnLongPress => &mut self.haptics.trigger_on_longpress,
            K::WeatherEnabled => &mut self.open_weather.enabled,
            K::WeatherUnits => &mut self.open_weather.units_metric,
            K::MqttEnabled => &mut self.mqtt.enabled,
            _ => return None,
        })
    }

    fn text(&self, key: SettingKey) -> Option<&str> {
        use SettingKey as K;
        Some(match key {
            K::WeatherApiKey => &self.open_weather.api_key,
            K::MqttBrokerIp => &self.mqtt.broker_ip,
            K::MqttUsername => &self.mqtt.username,
            K::MqttPassword => &self.mqtt.password,
            K::MqttDeviceName => &self.mqtt.device_name,
            K::MqttTopicListen => &self.mqtt.topic_listen,
            _ => return None,
        })
    }

    fn text_mut(&mut self, key: SettingKey) -> Option<&mut String> {
        use SettingKey as K;
        Some(match key {
            K::WeatherApiKey => &mut self.open_weather.api_key,
            K::MqttBrokerIp => &mut self.mqtt.broker_ip,
            K::MqttUsername => &mut self.mqtt.username,
            K::MqttPassword => &mut self.mqtt.password,
            K::MqttDeviceName => &mut self.mqtt.device_name,
            K::MqttTopicListen => &mut self.mqtt.topic_listen,
            _ => return None,
        })
    }

    /// Reads the current value of a bindable setting.
    pub fn get_setting(&self, key: SettingKey) -> SettingValue {
        use SettingKey as K;

        if let Some(flag) = self.toggle(key) {
            return SettingValue::Bool(flag);
        }
        if let Some(text) = self.text(key) {
            return SettingValue::Text(text.to_string());
        }

        fn widen<T: Copy + Into<i64>>(arr: &[T; 3]) -> SettingValue {
            SettingValue::IntList(arr.iter().map(|v| (*v).into()).collect())
        }
        match key {
            K::BacklightLevelVbus => widen(&self.bl_level_vbus),
            K::BacklightLevelVbat => widen(&self.bl_level_vbat),
            K::BacklightPeriodVbus => widen(&self.bl_period_vbus),
            K::BacklightPeriodVbat => widen(&self.bl_period_vbat),
            K::WeatherPollInterval => SettingValue::Int(i64::from(self.open_weather.poll_frequency)),
            K::MqttBrokerPort => SettingValue::Int(i64::from(self.mqtt.broker_port)),
            // Toggles and text fields were answered above.
            _ => SettingValue::Text(String::new()),
        }
    }

    /// Writes a bindable setting after validating it against its spec.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] if the value has the wrong kind, length, or
    /// range.  The config is not modified in that case.
    pub fn set_setting(&mut self, key: SettingKey, value: SettingValue) -> Result<(), BindingError> {
        use SettingKey as K;

        let spec = key.spec();
        spec.validate(&value)?;
        let id = key.id();

        match value {
            SettingValue::Bool(b) => {
                if let Some(flag) = self.toggle_mut(key) {
                    *flag = b;
                }
            }
            SettingValue::Text(s) => {
                if let Some(text) = self.text_mut(key) {
                    *text = s;
                }
            }
            SettingValue::Int(v) => match key {
                K::WeatherPollInterval => self.open_weather.poll_frequency = narrow(id, v)?,
                K::MqttBrokerPort => self.mqtt.broker_port = narrow(id, v)?,
                _ => {}
            },
            SettingValue::IntList(list) => match key {
                K::BacklightLevelVbus => self.bl_level_vbus = narrow_list(id, &list)?,
                K::BacklightLevelVbat => self.bl_level_vbat = narrow_list(id, &list)?,
                K::BacklightPeriodVbus => self.bl_period_vbus = narrow_list(id, &list)?,
                K::BacklightPeriodVbat => self.bl_period_vbat = narrow_list(id, &list)?,
                _ => {}
            },
        }
        tracing::debug!(setting = id, "setting updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_round_trips_through_its_id() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::from_id(key.id()), Ok(*key));
        }
    }

    #[test]
    fn test_from_id_rejects_unknown_id() {
        assert_eq!(
            SettingKey::from_id("mqtt.nope"),
            Err(BindingError::UnknownSetting("mqtt.nope".to_string()))
        );
    }

    #[test]
    fn test_every_group_has_at_least_one_key() {
        for group in SettingGroup::ALL {
            assert!(group.keys().next().is_some(), "{} is empty", group.name());
        }
    }

    #[test]
    fn test_get_setting_reads_current_value_for_every_key_kind() {
        // Arrange
        let mut cfg = Config::default();
        cfg.haptics.trigger_on_wake = true;
        cfg.mqtt.broker_ip = "10.0.0.2".to_string();

        // Act / Assert
        assert_eq!(cfg.get_setting(SettingKey::HapticsOnWake), SettingValue::Bool(true));
        assert_eq!(
            cfg.get_setting(SettingKey::MqttBrokerIp),
            SettingValue::Text("10.0.0.2".to_string())
        );
        assert_eq!(cfg.get_setting(SettingKey::MqttBrokerPort), SettingValue::Int(1883));
        assert_eq!(
            cfg.get_setting(SettingKey::BacklightPeriodVbat),
            SettingValue::IntList(vec![30, 45, 60])
        );
    }

    #[test]
    fn test_set_setting_updates_nested_toggle() {
        let mut cfg = Config::default();
        cfg.set_setting(SettingKey::HapticsEnabled, SettingValue::Bool(false))
            .unwrap();
        assert!(!cfg.haptics.enabled);
    }

    #[test]
    fn test_set_setting_updates_backlight_list() {
        let mut cfg = Config::default();
        cfg.set_setting(
            SettingKey::BacklightLevelVbat,
            SettingValue::IntList(vec![90, 50, 10]),
        )
        .unwrap();
        assert_eq!(cfg.bl_level_vbat, [90, 50, 10]);
    }

    #[test]
    fn test_set_setting_out_of_range_leaves_config_unchanged() {
        // Arrange
        let mut cfg = Config::default();
        let before = cfg.clone();

        // Act
        let result = cfg.set_setting(SettingKey::WeatherPollInterval, SettingValue::Int(5));

        // Assert
        assert!(matches!(result, Err(BindingError::OutOfRange { value: 5, .. })));
        assert_eq!(cfg, before);
    }

    #[test]
    fn test_set_setting_wrong_length_list_is_rejected() {
        let mut cfg = Config::default();
        let result = cfg.set_setting(
            SettingKey::BacklightPeriodVbus,
            SettingValue::IntList(vec![10, 20]),
        );
        assert!(matches!(
            result,
            Err(BindingError::WrongLength { expected: 3, got: 2, .. })
        ));
    }

    #[test]
    fn test_set_setting_wrong_kind_is_rejected() {
        let mut cfg = Config::default();
        let result = cfg.set_setting(SettingKey::AudioUi, SettingValue::Int(1));
        assert!(matches!(result, Err(BindingError::WrongKind { .. })));
    }

    #[test]
    fn test_parse_toggle_accepts_labels_and_common_words() {
        let spec = SettingKey::Time24Hour.spec();
        assert_eq!(spec.parse("24h"), Ok(SettingValue::Bool(true)));
        assert_eq!(spec.parse("12H"), Ok(SettingValue::Bool(false)));
        assert_eq!(spec.parse("yes"), Ok(SettingValue::Bool(true)));
        assert!(spec.parse("maybe").is_err());
    }

    #[test]
    fn test_parse_int_list_splits_on_commas() {
        let spec = SettingKey::BacklightLevelVbus.spec();
        assert_eq!(
            spec.parse("100, 70,40"),
            Ok(SettingValue::IntList(vec![100, 70, 40]))
        );
    }

    #[test]
    fn test_display_uses_toggle_labels() {
        let spec = SettingKey::LeftHanded.spec();
        assert_eq!(spec.display(&SettingValue::Bool(false)), "LEFT");
        assert_eq!(spec.display(&SettingValue::Bool(true)), "RIGHT");
    }
}
