//! Extended cellular signal quality for the Strata platform.
//!
//! This crate contains:
//! - **Signal snapshots** — RSSI, RSCP, Ec/Io, SINR, Io, RSRP, RSRQ, SNR and error rate
//!   for one access technology, with every metric independently optional
//! - **Signal reports** — one snapshot per access technology (CDMA … 5G NR)
//! - **Variant dictionaries** — the string-keyed `a{sv}` payload these types travel in
//!   across the agent/modem-manager process boundary
//! - **Setup** — refresh rate and threshold configuration, from TOML or a dictionary

pub mod error;
pub mod report;
pub mod setup;
pub mod signal;
pub mod variant;

pub use error::{CoreError, CoreErrorCode};
pub use report::{SignalReport, Technology};
pub use setup::{SignalSetup, Thresholds};
pub use signal::{Metric, Signal, UNKNOWN};
pub use variant::{Variant, VariantDict};
