//! # Extended Signal Snapshot
//!
//! One reading of the extended signal-quality metrics a modem reports for a
//! single access technology. Each metric is independently optional: a modem
//! on LTE has no RSCP, a 3G modem has no RSRP, and many report only a subset.
//!
//! | Metric      | Key          | Unit |
//! |-------------|--------------|------|
//! | RSSI        | `rssi`       | dBm  |
//! | RSCP        | `rscp`       | dBm  |
//! | Ec/Io       | `ecio`       | dB   |
//! | SINR        | `sinr`       | dB   |
//! | Io          | `io`         | dBm  |
//! | RSRP        | `rsrp`       | dBm  |
//! | RSRQ        | `rsrq`       | dB   |
//! | SNR         | `snr`        | dB   |
//! | Error rate  | `error-rate` | %    |
//!
//! Values are stored as given; no range checks or unit conversion happen here.
//!
//! ## Dictionary form
//!
//! [`encode`] emits one `d` entry per known metric, in the order of the table
//! above. Unknown metrics are omitted: absence of a key means unknown.
//! [`decode`] is all-or-nothing: the first unrecognised key or mistyped value
//! rejects the whole dictionary.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::variant::{DICT_TYPE, Variant, VariantDict};

/// Flat sentinel for "no measurement", for callers that need a plain `f64`.
///
/// Never a legitimate reading in any of the metric units. Passing it to a
/// setter clears the field.
pub const UNKNOWN: f64 = f64::MIN;

const WHAT: &str = "signal";

// ── Metric ──────────────────────────────────────────────────────────

/// The nine metrics of a snapshot, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Rssi,
    Rscp,
    Ecio,
    Sinr,
    Io,
    Rsrp,
    Rsrq,
    Snr,
    ErrorRate,
}

impl Metric {
    /// All metrics in the order they are encoded.
    pub const ALL: [Metric; 9] = [
        Metric::Rssi,
        Metric::Rscp,
        Metric::Ecio,
        Metric::Sinr,
        Metric::Io,
        Metric::Rsrp,
        Metric::Rsrq,
        Metric::Snr,
        Metric::ErrorRate,
    ];

    /// Dictionary key for this metric.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Rssi => "rssi",
            Metric::Rscp => "rscp",
            Metric::Ecio => "ecio",
            Metric::Sinr => "sinr",
            Metric::Io => "io",
            Metric::Rsrp => "rsrp",
            Metric::Rsrq => "rsrq",
            Metric::Snr => "snr",
            Metric::ErrorRate => "error-rate",
        }
    }

    /// Exact, case-sensitive key lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "rssi" => Some(Metric::Rssi),
            "rscp" => Some(Metric::Rscp),
            "ecio" => Some(Metric::Ecio),
            "sinr" => Some(Metric::Sinr),
            "io" => Some(Metric::Io),
            "rsrp" => Some(Metric::Rsrp),
            "rsrq" => Some(Metric::Rsrq),
            "snr" => Some(Metric::Snr),
            "error-rate" => Some(Metric::ErrorRate),
            _ => None,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Metric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::from_key(s).ok_or_else(|| CoreError::UnexpectedKey {
            what: WHAT,
            key: s.to_string(),
        })
    }
}

// ── Signal ──────────────────────────────────────────────────────────

/// Extended signal snapshot for one access technology.
///
/// Two snapshots are equal when all nine fields are equal. The JSON form is
/// flat (`{"rssi": -75.0, "error-rate": 0.5}`) with unknown metrics omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Signal {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "reading")]
    rssi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "reading")]
    rscp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "reading")]
    ecio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "reading")]
    sinr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "reading")]
    io: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "reading")]
    rsrp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "reading")]
    rsrq: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "reading")]
    snr: Option<f64>,
    #[serde(
        rename = "error-rate",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "reading"
    )]
    error_rate: Option<f64>,
}

/// Flat JSON field, with the same [`UNKNOWN`] rule as [`Signal::set`].
fn reading<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| *v != UNKNOWN))
}

impl Signal {
    /// Empty snapshot: every metric unknown.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, metric: Metric) -> &Option<f64> {
        match metric {
            Metric::Rssi => &self.rssi,
            Metric::Rscp => &self.rscp,
            Metric::Ecio => &self.ecio,
            Metric::Sinr => &self.sinr,
            Metric::Io => &self.io,
            Metric::Rsrp => &self.rsrp,
            Metric::Rsrq => &self.rsrq,
            Metric::Snr => &self.snr,
            Metric::ErrorRate => &self.error_rate,
        }
    }

    fn slot_mut(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::Rssi => &mut self.rssi,
            Metric::Rscp => &mut self.rscp,
            Metric::Ecio => &mut self.ecio,
            Metric::Sinr => &mut self.sinr,
            Metric::Io => &mut self.io,
            Metric::Rsrp => &mut self.rsrp,
            Metric::Rsrq => &mut self.rsrq,
            Metric::Snr => &mut self.snr,
            Metric::ErrorRate => &mut self.error_rate,
        }
    }

    /// Stored value, `None` when unknown.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        *self.slot(metric)
    }

    /// Stored value, or [`UNKNOWN`] when the metric was never set.
    pub fn get_or_unknown(&self, metric: Metric) -> f64 {
        self.get(metric).unwrap_or(UNKNOWN)
    }

    /// Overwrite one metric. [`UNKNOWN`] clears it; any other value,
    /// including NaN, is stored as-is.
    pub fn set(&mut self, metric: Metric, value: f64) {
        *self.slot_mut(metric) = if value == UNKNOWN { None } else { Some(value) };
    }

    /// Mark one metric unknown.
    pub fn clear(&mut self, metric: Metric) {
        *self.slot_mut(metric) = None;
    }

    /// Whether every metric is unknown.
    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|m| self.get(*m).is_none())
    }

    /// Known metrics in canonical order.
    pub fn known(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .into_iter()
            .filter_map(|m| self.get(m).map(|v| (m, v)))
    }

    pub fn rssi(&self) -> Option<f64> {
        self.rssi
    }

    pub fn set_rssi(&mut self, value: f64) {
        self.set(Metric::Rssi, value);
    }

    pub fn rscp(&self) -> Option<f64> {
        self.rscp
    }

    pub fn set_rscp(&mut self, value: f64) {
        self.set(Metric::Rscp, value);
    }

    pub fn ecio(&self) -> Option<f64> {
        self.ecio
    }

    pub fn set_ecio(&mut self, value: f64) {
        self.set(Metric::Ecio, value);
    }

    pub fn sinr(&self) -> Option<f64> {
        self.sinr
    }

    pub fn set_sinr(&mut self, value: f64) {
        self.set(Metric::Sinr, value);
    }

    pub fn io(&self) -> Option<f64> {
        self.io
    }

    pub fn set_io(&mut self, value: f64) {
        self.set(Metric::Io, value);
    }

    pub fn rsrp(&self) -> Option<f64> {
        self.rsrp
    }

    pub fn set_rsrp(&mut self, value: f64) {
        self.set(Metric::Rsrp, value);
    }

    pub fn rsrq(&self) -> Option<f64> {
        self.rsrq
    }

    pub fn set_rsrq(&mut self, value: f64) {
        self.set(Metric::Rsrq, value);
    }

    pub fn snr(&self) -> Option<f64> {
        self.snr
    }

    pub fn set_snr(&mut self, value: f64) {
        self.set(Metric::Snr, value);
    }

    pub fn error_rate(&self) -> Option<f64> {
        self.error_rate
    }

    pub fn set_error_rate(&mut self, value: f64) {
        self.set(Metric::ErrorRate, value);
    }

    /// Dictionary form: one `d` entry per known metric, canonical order.
    pub fn dictionary(&self) -> VariantDict {
        self.known().map(|(m, v)| (m.key(), v)).collect()
    }

    /// Build a snapshot from an already-typed dictionary.
    ///
    /// Returns `Ok(None)` for an empty dictionary: there is nothing to build
    /// a snapshot from, which is not the same as a snapshot with every metric
    /// unknown.
    pub fn from_dictionary(dict: &VariantDict) -> Result<Option<Self>, CoreError> {
        let mut signal: Option<Signal> = None;

        for (key, value) in dict.iter() {
            let signal = signal.get_or_insert_with(Signal::new);

            let Some(metric) = Metric::from_key(key) else {
                tracing::debug!(key, "rejecting signal dictionary: unexpected key");
                return Err(CoreError::UnexpectedKey {
                    what: WHAT,
                    key: key.to_string(),
                });
            };
            let Some(value) = value.as_f64() else {
                tracing::debug!(
                    key,
                    found = value.type_code(),
                    "rejecting signal dictionary: value is not a double"
                );
                return Err(CoreError::InvalidValue {
                    what: WHAT,
                    key: key.to_string(),
                    expected: "d",
                    found: value.type_code(),
                });
            };

            // Duplicate keys: last write wins.
            signal.set(metric, value);
        }

        Ok(signal)
    }
}

// ── Codec ───────────────────────────────────────────────────────────

/// Encode a possibly-absent snapshot.
///
/// No snapshot means no dictionary; callers that never collected signal data
/// can pass `None` straight through.
pub fn encode(signal: Option<&Signal>) -> Option<VariantDict> {
    signal.map(Signal::dictionary)
}

/// Decode a snapshot from a possibly-absent variant.
///
/// - `None` input fails with [`CoreError::EmptyDictionary`]
/// - a variant that is not an `a{sv}` fails with [`CoreError::InvalidType`]
/// - an empty dictionary yields `Ok(None)`
/// - otherwise see [`Signal::from_dictionary`]
pub fn decode(dictionary: Option<&Variant>) -> Result<Option<Signal>, CoreError> {
    let Some(dictionary) = dictionary else {
        return Err(CoreError::EmptyDictionary { what: WHAT });
    };
    let Variant::Dict(dict) = dictionary else {
        return Err(CoreError::InvalidType {
            what: WHAT,
            expected: DICT_TYPE,
            found: dictionary.type_code(),
        });
    };
    Signal::from_dictionary(dict)
}
