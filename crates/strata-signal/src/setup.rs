//! Signal refresh rate and reporting thresholds.
//!
//! Read from the agent's TOML config:
//!
//! ```toml
//! version = 1
//! rate_s = 5
//!
//! [thresholds]
//! rssi_db = 3
//! error_rate = true
//! ```
//!
//! Thresholds are also exchanged as an `a{sv}` dictionary with the modem
//! manager (`rssi-threshold: u`, `error-rate-threshold: b`).

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::error::CoreError;
use crate::variant::{DICT_TYPE, Variant, VariantDict};

pub const SETUP_VERSION: u32 = 1;

const WHAT: &str = "signal setup";
const THRESHOLDS_WHAT: &str = "signal thresholds";

const KEY_RSSI_THRESHOLD: &str = "rssi-threshold";
const KEY_ERROR_RATE_THRESHOLD: &str = "error-rate-threshold";

// ── Thresholds ──────────────────────────────────────────────────────

/// Report-on-change thresholds. Zero / `false` disables each one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thresholds {
    /// Minimum RSSI change in dB that triggers a new report.
    pub rssi_db: u32,
    /// Report whenever the error rate changes.
    pub error_rate: bool,
}

impl Thresholds {
    pub fn is_enabled(&self) -> bool {
        self.rssi_db > 0 || self.error_rate
    }

    pub fn dictionary(&self) -> VariantDict {
        let mut dict = VariantDict::new();
        dict.push(KEY_RSSI_THRESHOLD, self.rssi_db);
        dict.push(KEY_ERROR_RATE_THRESHOLD, self.error_rate);
        dict
    }

    /// Missing keys keep their defaults; unknown keys and mistyped values
    /// reject the whole dictionary.
    pub fn decode(dictionary: Option<&Variant>) -> Result<Self, CoreError> {
        let Some(dictionary) = dictionary else {
            return Err(CoreError::EmptyDictionary {
                what: THRESHOLDS_WHAT,
            });
        };
        let Variant::Dict(dict) = dictionary else {
            return Err(CoreError::InvalidType {
                what: THRESHOLDS_WHAT,
                expected: DICT_TYPE,
                found: dictionary.type_code(),
            });
        };

        let mut out = Thresholds::default();
        for (key, value) in dict.iter() {
            match key {
                KEY_RSSI_THRESHOLD => {
                    out.rssi_db = value
                        .as_u32()
                        .ok_or_else(|| invalid_value(key, "u", value))?;
                }
                KEY_ERROR_RATE_THRESHOLD => {
                    out.error_rate = value
                        .as_bool()
                        .ok_or_else(|| invalid_value(key, "b", value))?;
                }
                _ => {
                    return Err(CoreError::UnexpectedKey {
                        what: THRESHOLDS_WHAT,
                        key: key.to_string(),
                    });
                }
            }
        }
        Ok(out)
    }
}

fn invalid_value(key: &str, expected: &'static str, found: &Variant) -> CoreError {
    CoreError::InvalidValue {
        what: THRESHOLDS_WHAT,
        key: key.to_string(),
        expected,
        found: found.type_code(),
    }
}

// ── Setup ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignalSetupInput {
    pub version: u32,
    pub rate_s: Option<u64>,
    pub thresholds: ThresholdsInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdsInput {
    pub rssi_db: Option<u32>,
    pub error_rate: Option<bool>,
}

/// Resolved signal polling setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSetup {
    pub version: u32,
    /// Polling interval; zero disables periodic refresh.
    pub rate: Duration,
    pub thresholds: Thresholds,
}

impl Default for SignalSetup {
    fn default() -> Self {
        Self {
            version: SETUP_VERSION,
            rate: Duration::ZERO,
            thresholds: Thresholds::default(),
        }
    }
}

impl SignalSetupInput {
    pub fn resolve(self) -> Result<SignalSetup, CoreError> {
        let version = if self.version == 0 {
            SETUP_VERSION
        } else {
            self.version
        };
        if version != SETUP_VERSION {
            return Err(CoreError::UnsupportedVersion {
                what: WHAT,
                version,
            });
        }

        let defaults = Thresholds::default();
        Ok(SignalSetup {
            version,
            rate: Duration::from_secs(self.rate_s.unwrap_or(0)),
            thresholds: Thresholds {
                rssi_db: self.thresholds.rssi_db.unwrap_or(defaults.rssi_db),
                error_rate: self.thresholds.error_rate.unwrap_or(defaults.error_rate),
            },
        })
    }
}

impl SignalSetup {
    pub fn is_polling_enabled(&self) -> bool {
        !self.rate.is_zero()
    }

    pub fn from_toml_str(input: &str) -> Result<Self, CoreError> {
        if input.trim().is_empty() {
            return Ok(SignalSetup::default());
        }
        let parsed: SignalSetupInput =
            toml::from_str(input).map_err(|e| CoreError::InvalidConfig {
                what: WHAT,
                reason: e.to_string(),
            })?;
        parsed.resolve()
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("reading signal setup {}", path.display()))?;
        let setup = Self::from_toml_str(&input)
            .with_context(|| format!("parsing signal setup {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            rate_s = setup.rate.as_secs(),
            rssi_threshold_db = setup.thresholds.rssi_db,
            error_rate_threshold = setup.thresholds.error_rate,
            "loaded signal setup"
        );
        Ok(setup)
    }
}
