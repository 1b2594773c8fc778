//! # tw-settings-core
//!
//! Shared library for the TinyWATCH settings store containing the settings
//! schema, the keyed setting bindings used by settings UIs, and the tolerant
//! JSON codec that reads and writes the persisted artifact.
//!
//! It has no filesystem access; durability lives in `tw-settings-store`.
//!
//! - **`domain`** – the [`Config`] aggregate and its sub-configs, credential
//!   rules, and the [`SettingKey`] accessor table.
//! - **`codec`** – [`encode`]/[`decode`] between a [`Config`] and text,
//!   including unknown-key preservation and schema migrations.

pub mod codec;
pub mod domain;

pub use codec::{decode, encode, DecodeError, EncodeError};
pub use domain::bindings::{
    BindingError, GroupKind, SettingGroup, SettingKey, SettingKind, SettingSpec, SettingValue,
};
pub use domain::schema::{
    BatteryWidgetConfig, CompassAppConfig, Config, CredentialUpdate, CustomBinaryConfig,
    ExtraFields, HapticsConfig, MicrophoneAppConfig, MqttConfig, OpenWeatherConfig, WifiStation,
    CURRENT_SCHEMA_VERSION, MAX_WIFI_STATIONS, UTC_OFFSET_UNSET,
};
