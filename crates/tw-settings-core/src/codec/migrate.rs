//! Schema migrations applied to the parsed tree before typed extraction.
//!
//! Each step rewrites one older layout into the next one.  Steps only rename
//! or reshape keys they recognise and never fail: a node a step cannot make
//! sense of is left as is, and its fields then fall back to defaults during
//! extraction.
//!
//! | From | Change |
//! |------|--------|
//! | 1    | version tag `ver` becomes `schema_version`; station keys `wifi_ssid`/`wifi_pass` become `ssid`/`pass` |

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::schema::CURRENT_SCHEMA_VERSION;

/// Version assumed for artifacts that carry no version tag at all.
pub const UNTAGGED_SCHEMA_VERSION: u32 = 1;

/// Reads the version tag of a parsed artifact.
pub fn detect_version(root: &Map<String, Value>) -> u32 {
    let tag = root
        .get("schema_version")
        .or_else(|| root.get("ver"))
        .and_then(Value::as_u64);
    match tag {
        Some(v) => u32::try_from(v).unwrap_or(u32::MAX),
        None => UNTAGGED_SCHEMA_VERSION,
    }
}

/// Upgrades `root` in place to [`CURRENT_SCHEMA_VERSION`] and returns the
/// version it was written with.
///
/// Artifacts from newer firmware are left untouched; the tolerant decoder
/// keeps whatever keys it does not know.
pub fn upgrade(root: &mut Map<String, Value>) -> u32 {
    let from = detect_version(root);
    if from > CURRENT_SCHEMA_VERSION {
        warn!(
            from,
            current = CURRENT_SCHEMA_VERSION,
            "settings written by newer firmware, decoding without migration"
        );
        return from;
    }

    for step in from..CURRENT_SCHEMA_VERSION {
        match step {
            1 => v1_to_v2(root),
            _ => debug!(step, "no migration registered"),
        }
    }
    if from < CURRENT_SCHEMA_VERSION {
        info!(from, to = CURRENT_SCHEMA_VERSION, "migrated settings schema");
    }
    from
}

fn rename_key(map: &mut Map<String, Value>, from: &str, to: &str) {
    if map.contains_key(to) {
        return;
    }
    if let Some(v) = map.remove(from) {
        map.insert(to.to_string(), v);
    }
}

fn v1_to_v2(root: &mut Map<String, Value>) {
    if let Some(ver) = root.remove("ver") {
        root.entry("schema_version").or_insert(ver);
    }

    if let Some(Value::Array(stations)) = root.get_mut("wifi_options") {
        for station in stations.iter_mut() {
            if let Value::Object(fields) = station {
                rename_key(fields, "wifi_ssid", "ssid");
                rename_key(fields, "wifi_pass", "pass");
            }
        }
    }
}
