//! End-to-end dictionary scenarios: snapshots crossing the process boundary
//! as JSON-encoded `a{sv}` payloads.

use strata_signal::signal::{decode, encode};
use strata_signal::{
    CoreError, CoreErrorCode, Metric, Signal, SignalReport, Technology, Variant, VariantDict,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Serialize to JSON text and back, as the agent transport does.
fn over_the_wire(dict: &VariantDict) -> Variant {
    let text = serde_json::to_string(dict).unwrap();
    Variant::Dict(serde_json::from_str(&text).unwrap())
}

#[test]
fn lte_snapshot_survives_transport() {
    init_tracing();
    let mut s = Signal::new();
    s.set_rssi(-75.0);
    s.set_rsrp(-101.0);
    s.set_rsrq(-11.0);
    s.set_snr(12.5);

    let dict = encode(Some(&s)).unwrap();
    let back = decode(Some(&over_the_wire(&dict))).unwrap().unwrap();
    assert_eq!(back, s);
    assert_eq!(back.rscp(), None);
    assert_eq!(back.ecio(), None);
}

#[test]
fn snapshot_without_data_is_not_sent() {
    assert!(encode(None).is_none());
}

#[test]
fn empty_payload_decodes_to_nothing() {
    let wire = over_the_wire(&VariantDict::new());
    assert_eq!(decode(Some(&wire)), Ok(None));
}

#[test]
fn payload_from_json_text() {
    init_tracing();
    let json = r#"{
        "rssi": { "type": "d", "value": -75.0 },
        "snr":  { "type": "d", "value": 12.5 }
    }"#;
    let dict: VariantDict = serde_json::from_str(json).unwrap();
    let s = decode(Some(&Variant::Dict(dict))).unwrap().unwrap();
    assert_eq!(s.rssi(), Some(-75.0));
    assert_eq!(s.snr(), Some(12.5));
    assert_eq!(s.known().count(), 2);
}

#[test]
fn bogus_key_rejects_whole_payload() {
    init_tracing();
    let json = r#"{
        "rssi":      { "type": "d", "value": -75.0 },
        "bogus-key": { "type": "d", "value": 1.0 }
    }"#;
    let dict: VariantDict = serde_json::from_str(json).unwrap();
    let err = decode(Some(&Variant::Dict(dict))).unwrap_err();
    assert_eq!(err.code(), CoreErrorCode::InvalidArgument);
    assert_eq!(
        err.to_string(),
        "invalid signal dictionary, unexpected key 'bogus-key'"
    );
}

#[test]
fn integer_payload_is_wrong_shape() {
    let json = r#"{ "rssi": { "type": "i", "value": -75 } }"#;
    let dict: VariantDict = serde_json::from_str(json).unwrap();
    let err = decode(Some(&Variant::Dict(dict))).unwrap_err();
    assert!(matches!(err, CoreError::InvalidValue { .. }));
    assert_eq!(err.code(), CoreErrorCode::InvalidArgument);
}

#[test]
fn string_payload_is_wrong_shape() {
    let wire = Variant::String("rssi=-75".into());
    let err = decode(Some(&wire)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot create signal from dictionary: invalid variant type received \
         (expected a{sv}, found s)"
    );
}

#[test]
fn full_snapshot_encodes_nine_entries() {
    let mut s = Signal::new();
    for (i, m) in Metric::ALL.into_iter().enumerate() {
        s.set(m, -(i as f64) - 1.5);
    }
    let dict = s.dictionary();
    assert_eq!(dict.len(), 9);
    for (i, (key, value)) in dict.iter().enumerate() {
        assert_eq!(key, Metric::ALL[i].key());
        assert_eq!(value.as_f64(), Some(-(i as f64) - 1.5));
    }
}

#[test]
fn report_survives_transport() {
    init_tracing();
    let mut umts = Signal::new();
    umts.set_rscp(-95.0);
    umts.set_ecio(-6.5);
    let mut lte = Signal::new();
    lte.set_rsrp(-101.0);
    lte.set_error_rate(0.25);

    let mut report = SignalReport::new();
    report.set(Technology::Umts, umts);
    report.set(Technology::Lte, lte);

    let back = SignalReport::decode(Some(&over_the_wire(&report.dictionary()))).unwrap();
    assert_eq!(back, report);
    let techs: Vec<Technology> = back.iter().map(|(t, _)| t).collect();
    assert_eq!(techs, [Technology::Umts, Technology::Lte]);
}
