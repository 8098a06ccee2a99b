use super::*;

#[test]
fn empty_json_yields_defaults() {
    let t = Tuning::from_json_str("{}").unwrap();
    assert_eq!(t, Tuning::default());
}

#[test]
fn partial_json_overrides_named_fields() {
    let t = Tuning::from_json_str(r#"{"minGapPct": 4, "reverseVisionOpacity": 0.9}"#).unwrap();
    assert_eq!(t.min_gap_pct, 4.0);
    assert_eq!(t.key_step_pct, 1.0);
    assert_eq!(t.reverse_vision_opacity_clamped(), REVERSE_VISION_MAX_OPACITY);
}

#[test]
fn reverse_vision_opacity_never_negative() {
    let t = Tuning {
        reverse_vision_opacity: -1.0,
        ..Tuning::default()
    };
    assert_eq!(t.reverse_vision_opacity_clamped(), 0.0);
}

#[test]
fn white_boost_ramps_below_knee() {
    let t = Tuning::default();
    assert_eq!(t.white_boost_alpha(6.0), 0.0);
    assert_eq!(t.white_boost_alpha(12.0), 0.0);
    assert!((t.white_boost_alpha(3.0) - 0.11).abs() < 1e-12);
    assert!((t.white_boost_alpha(0.0) - 0.22).abs() < 1e-12);
}

#[test]
fn rejects_degenerate_gap() {
    let t = Tuning {
        min_gap_pct: 50.0,
        ..Tuning::default()
    };
    assert!(t.validate().is_err());
    assert!(Tuning::from_json_str(r#"{"referenceM": 0}"#).is_err());
}

#[test]
fn zero_gap_is_rejected() {
    let err = Tuning::from_json_str(r#"{"minGapPct": 0}"#).unwrap_err();
    assert!(matches!(err, PerfError::Validation(_)), "{err}");
    assert!(Tuning::from_json_str(r#"{"minGapPct": 0.5}"#).is_ok());
}
