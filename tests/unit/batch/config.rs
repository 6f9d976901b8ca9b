use super::*;
use crate::card::fields::TextWrap;

#[test]
fn empty_object_is_default() {
    let cfg = BatchConfig::from_json_str("{}").unwrap();
    assert!(cfg.download_dir.is_none());
    assert_eq!(cfg.default_frame, "Artifact Frame");
    assert_eq!(cfg.art_policy, ArtPolicy::Fallback);
    assert_eq!(cfg.artist, "Dalle");
    assert_eq!(cfg.catalog_timeout_ms, 10_000);
    assert_eq!(cfg.first_card_settle_ms, 1_000);
    assert_eq!(cfg.layered_frame_settle_ms, 500);
    assert_eq!(cfg.half_masks.left.src, "img/frames/maskLeftHalf.png");
}

#[test]
fn preset_selects_rules_columns() {
    let cfg = BatchConfig::from_json_str(r#"{"rules_preset":"flavour"}"#).unwrap();
    let cols = cfg.rules();
    assert_eq!(
        cols[0],
        RulesColumn::new("Std Ability", TextWrap::Bold).keep_quotes()
    );
    assert_eq!(cols.last().unwrap().column, "Flavour Text");
}

#[test]
fn explicit_columns_override_preset() {
    let cfg = BatchConfig::from_json_str(
        r#"{"rules_preset":"flavour","rules_columns":[{"column":"Lore","wrap":"italic"},{"column":"Text"}]}"#,
    )
    .unwrap();
    assert_eq!(
        cfg.field_mapping().rules,
        vec![
            RulesColumn::new("Lore", TextWrap::Italic),
            RulesColumn::new("Text", TextWrap::Plain),
        ]
    );
}

#[test]
fn derived_options_carry_timings() {
    let cfg = BatchConfig::from_json_str(
        r#"{"art_policy":"strict","layered_frame_settle_ms":0,"blank_art":"img/none.png"}"#,
    )
    .unwrap();
    let opts = cfg.loader_options();
    assert_eq!(opts.art_policy, ArtPolicy::Strict);
    assert!(opts.layered_frame_settle.is_zero());
    assert_eq!(opts.blank_art, "img/none.png");
}

#[test]
fn unknown_fields_are_rejected() {
    let err = BatchConfig::from_json_str(r#"{"downlod_dir":"out"}"#).unwrap_err();
    assert!(err.to_string().contains("parse batch config json"));
}

#[test]
fn forced_frame_needs_a_name() {
    let err =
        BatchConfig::from_json_str(r#"{"force_default_frame":true,"default_frame":" "}"#)
            .unwrap_err();
    assert!(matches!(err, CardforgeError::Validation(_)));
}

#[test]
fn missing_file_reports_path() {
    let err = BatchConfig::from_path(Path::new("target/no-such-config.json")).unwrap_err();
    assert!(format!("{err:#}").contains("no-such-config.json"));
}
