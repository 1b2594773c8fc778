//! Infrastructure layer: adapters to storage, time, and diagnostic sinks.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `tw_settings_core`, but MUST NOT be imported by the `application` layer.

pub mod clock;
pub mod diagnostics;
pub mod storage;
