use super::*;

#[test]
fn defaults_validate() {
    let cfg = SceneConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.tick_rate().unwrap().per_second, 60);
    assert_eq!(cfg.start_phase().unwrap(), Phase::Start);
}

#[test]
fn empty_json_object_uses_defaults() {
    let cfg = SceneConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, SceneConfig::default());
}

#[test]
fn json_round_trip_preserves_fields() {
    let cfg = SceneConfig {
        seed: 77,
        values: Some(vec![3, 12, 12, 27, 41, 55, 61, 70, 88, 96]),
        needle: Some(55),
        start_phase: "SPIT_OUT_10".to_string(),
        ..SceneConfig::default()
    };
    let text = cfg.to_json_pretty().unwrap();
    assert_eq!(SceneConfig::from_json_str(&text).unwrap(), cfg);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = SceneConfig::from_json_str(r#"{"tick_rat": 30}"#).unwrap_err();
    assert!(matches!(err, ReelError::Serde(_)));
}

#[test]
fn bad_values_are_rejected() {
    let cases = [
        r#"{"tick_rate": 0}"#,
        r#"{"values": [1, 2, 3]}"#,
        r#"{"value_ceiling": 0}"#,
        r#"{"needle_present_probability": 1.5}"#,
        r#"{"spawn_interval_ticks": 0}"#,
        r#"{"container_fade_step": 0}"#,
        r#"{"glide_rate": 0.0}"#,
        r#"{"gather_rate": 2.0}"#,
        r#"{"fade_step": -0.02}"#,
        r#"{"square_size": 0.0}"#,
        r#"{"canvas": {"width": 0, "height": 10}}"#,
    ];
    for case in cases {
        let err = SceneConfig::from_json_str(case).unwrap_err();
        assert!(matches!(err, ReelError::Validation(_)), "{case}: {err}");
    }
}

#[test]
fn start_phase_must_be_known_and_an_entry_point() {
    let err = SceneConfig::from_json_str(r#"{"start_phase": "WARP"}"#).unwrap_err();
    assert!(matches!(err, ReelError::UnknownPhase(ref t) if t == "WARP"));

    let err = SceneConfig::from_json_str(r#"{"start_phase": "ADJUST_MID"}"#).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));

    SceneConfig::from_json_str(r#"{"start_phase": "BS_HIGH_LOW_MID_CALC"}"#).unwrap();
}

#[test]
fn slot_positions_step_horizontally() {
    let cfg = SceneConfig::default();
    assert_eq!(cfg.slot_position(0), Point::new(-350.0, 100.0));
    assert_eq!(cfg.slot_position(9), Point::new(280.0, 100.0));
}

#[test]
fn dataset_pins_are_honoured() {
    let mut rng = Rng64::new(1);
    let values = vec![3, 12, 12, 27, 41, 55, 61, 70, 88, 96];

    let cfg = SceneConfig {
        values: Some(values.clone()),
        needle: Some(54),
        ..SceneConfig::default()
    };
    let d = cfg.build_dataset(&mut rng).unwrap();
    assert_eq!(d.values(), values.as_slice());
    assert_eq!(d.needle(), 54);

    let cfg = SceneConfig {
        needle: Some(7),
        ..SceneConfig::default()
    };
    assert_eq!(cfg.build_dataset(&mut rng).unwrap().needle(), 7);

    let cfg = SceneConfig {
        values: Some(values.clone()),
        needle_present_probability: 1.0,
        ..SceneConfig::default()
    };
    let d = cfg.build_dataset(&mut rng).unwrap();
    assert!(values.contains(&d.needle()));
}

#[test]
fn from_path_reads_json_file() {
    let dir = std::path::PathBuf::from("target").join("scene_config_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scene.json");
    std::fs::write(&path, r#"{"seed": 9, "needle": 4}"#).unwrap();
    let cfg = SceneConfig::from_path(&path).unwrap();
    assert_eq!(cfg.seed, 9);
    assert_eq!(cfg.needle, Some(4));

    assert!(SceneConfig::from_path(&dir.join("missing.json")).is_err());
}

#[test]
fn non_finite_positions_are_rejected() {
    let cfg = SceneConfig {
        container_anchor: Point::new(f64::NAN, 10.0),
        ..SceneConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ReelError::Validation(_))));

    let cfg = SceneConfig {
        slot_origin: Point::new(-350.0, f64::INFINITY),
        ..SceneConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ReelError::Validation(_))));

    let cfg = SceneConfig {
        container_anchor: Point::new(0.005, 10.0),
        ..SceneConfig::default()
    };
    cfg.validate().unwrap();
}
