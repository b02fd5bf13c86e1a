//! Per-technology signal report.
//!
//! A modem exposes one extended [`Signal`] per access technology it can
//! measure. The dictionary form nests each snapshot under its technology key:
//!
//! ```text
//! { "lte":  { "rssi": -75.0, "rsrp": -101.0, "rsrq": -11.0, "snr": 12.5 },
//!   "nr5g": { "rsrp": -95.0, "sinr": 18.0 } }
//! ```

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::signal::Signal;
use crate::variant::{DICT_TYPE, Variant, VariantDict};

const WHAT: &str = "signal report";

/// Radio access technology a snapshot was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Technology {
    Cdma,
    Evdo,
    Gsm,
    Umts,
    Lte,
    Nr5g,
}

impl Technology {
    pub const ALL: [Technology; 6] = [
        Technology::Cdma,
        Technology::Evdo,
        Technology::Gsm,
        Technology::Umts,
        Technology::Lte,
        Technology::Nr5g,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Technology::Cdma => "cdma",
            Technology::Evdo => "evdo",
            Technology::Gsm => "gsm",
            Technology::Umts => "umts",
            Technology::Lte => "lte",
            Technology::Nr5g => "nr5g",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "cdma" => Some(Technology::Cdma),
            "evdo" => Some(Technology::Evdo),
            "gsm" => Some(Technology::Gsm),
            "umts" => Some(Technology::Umts),
            "lte" => Some(Technology::Lte),
            "nr5g" => Some(Technology::Nr5g),
            _ => None,
        }
    }
}

impl std::fmt::Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Technology {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Technology::from_key(s).ok_or_else(|| CoreError::UnexpectedKey {
            what: WHAT,
            key: s.to_string(),
        })
    }
}

/// At most one snapshot per technology. Empty snapshots are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalReport {
    signals: BTreeMap<Technology, Signal>,
}

impl SignalReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tech: Technology) -> Option<&Signal> {
        self.signals.get(&tech)
    }

    /// Store `signal` for `tech`. An empty snapshot removes the entry, since
    /// it has no dictionary form to carry.
    pub fn set(&mut self, tech: Technology, signal: Signal) {
        if signal.is_empty() {
            self.signals.remove(&tech);
        } else {
            self.signals.insert(tech, signal);
        }
    }

    pub fn remove(&mut self, tech: Technology) -> Option<Signal> {
        self.signals.remove(&tech)
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Reported technologies in [`Technology::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Technology, &Signal)> {
        self.signals.iter().map(|(t, s)| (*t, s))
    }

    pub fn dictionary(&self) -> VariantDict {
        self.iter()
            .map(|(tech, signal)| (tech.key(), signal.dictionary()))
            .collect()
    }

    /// Decode a report. Unlike a bare snapshot, an empty dictionary is a
    /// valid, empty report.
    pub fn decode(dictionary: Option<&Variant>) -> Result<Self, CoreError> {
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

        let mut report = SignalReport::new();
        for (key, value) in dict.iter() {
            let Some(tech) = Technology::from_key(key) else {
                tracing::debug!(key, "rejecting signal report: unexpected technology");
                return Err(CoreError::UnexpectedKey {
                    what: WHAT,
                    key: key.to_string(),
                });
            };
            let Some(inner) = value.as_dict() else {
                return Err(CoreError::InvalidValue {
                    what: WHAT,
                    key: key.to_string(),
                    expected: DICT_TYPE,
                    found: value.type_code(),
                });
            };
            match Signal::from_dictionary(inner)? {
                Some(signal) => report.set(tech, signal),
                // A repeated key with an empty dict still overrides.
                None => {
                    report.remove(tech);
                }
            }
        }
        Ok(report)
    }
}
