use super::*;
use crate::card::color::Color;

fn full_catalog() -> FrameCatalog {
    let mut frames = vec![
        FrameDescriptor::new(ARTIFACT_FRAME, "img/frames/a.png"),
        FrameDescriptor::new(MULTICOLORED_FRAME, "img/frames/m.png"),
        FrameDescriptor::new(MULTICOLORED_CROWN, "img/frames/m-crown.png"),
    ];
    for c in Color::ALL {
        let letter = c.symbol().to_ascii_lowercase();
        frames.push(FrameDescriptor::new(c.frame_name(), format!("img/frames/{letter}.png")));
        frames.push(FrameDescriptor::new(
            c.crown_name(),
            format!("img/frames/{letter}-crown.png"),
        ));
    }
    FrameCatalog::new(frames).unwrap()
}

fn identity(cost: &str) -> ColorIdentity {
    ColorIdentity::from_symbols(cost.to_uppercase().chars())
}

fn summary(frames: &[FrameDescriptor]) -> Vec<(String, Vec<String>)> {
    frames
        .iter()
        .map(|f| {
            (
                f.name.clone(),
                f.masks.iter().map(|m| m.name.clone()).collect(),
            )
        })
        .collect()
}

fn s(name: &str, masks: &[&str]) -> (String, Vec<String>) {
    (
        name.to_string(),
        masks.iter().map(|m| m.to_string()).collect(),
    )
}

#[test]
fn colorless_is_single_artifact_frame() {
    let catalog = full_catalog();
    let masks = HalfMasks::default();
    let r = FrameResolver::new(&catalog, &masks);
    for legendary in [false, true] {
        let frames = r.resolve(&identity("3"), legendary);
        assert_eq!(summary(&frames), vec![s(ARTIFACT_FRAME, &[])]);
    }
}

#[test]
fn mono_color_is_two_halves_plus_optional_crown() {
    let catalog = full_catalog();
    let masks = HalfMasks::default();
    let r = FrameResolver::new(&catalog, &masks);

    let frames = r.resolve(&identity("1RR"), false);
    assert_eq!(
        summary(&frames),
        vec![
            s("Red Frame", &["Left Half"]),
            s("Red Frame", &["Right Half"])
        ]
    );

    let frames = r.resolve(&identity("1RR"), true);
    assert_eq!(
        summary(&frames),
        vec![
            s("Red Frame", &["Left Half"]),
            s("Red Frame", &["Right Half"]),
            s("Red Legend Crown", &[]),
        ]
    );
}

#[test]
fn two_colors_follow_mana_cost_order() {
    let catalog = full_catalog();
    let masks = HalfMasks::default();
    let r = FrameResolver::new(&catalog, &masks);

    let frames = r.resolve(&identity("2GU"), false);
    assert_eq!(
        summary(&frames),
        vec![
            s("Green Frame", &["Left Half"]),
            s("Blue Frame", &["Right Half"])
        ]
    );

    let frames = r.resolve(&identity("UG"), true);
    assert_eq!(
        summary(&frames),
        vec![
            s("Blue Frame", &["Left Half"]),
            s("Green Frame", &["Right Half"]),
            s("Blue Legend Crown", &["Left Half"]),
            s("Green Legend Crown", &["Right Half"]),
        ]
    );
}

#[test]
fn three_or_more_colors_use_multicolored_frame() {
    let catalog = full_catalog();
    let masks = HalfMasks::default();
    let r = FrameResolver::new(&catalog, &masks);

    assert_eq!(
        summary(&r.resolve(&identity("WUB"), false)),
        vec![s(MULTICOLORED_FRAME, &[])]
    );
    assert_eq!(
        summary(&r.resolve(&identity("WUBRG"), true)),
        vec![s(MULTICOLORED_FRAME, &[]), s(MULTICOLORED_CROWN, &[])]
    );
}

#[test]
fn missing_catalog_entries_are_omitted() {
    let catalog = FrameCatalog::new(vec![FrameDescriptor::new("Red Frame", "r.png")]).unwrap();
    let masks = HalfMasks::default();
    let r = FrameResolver::new(&catalog, &masks);
    let frames = r.resolve(&identity("R"), true);
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| f.name == "Red Frame"));
    assert!(r.resolve(&identity("WUB"), false).is_empty());
}

#[test]
fn default_bounds_are_assigned_and_catalog_is_untouched() {
    let catalog = full_catalog();
    let masks = HalfMasks::default();
    let r = FrameResolver::new(&catalog, &masks);
    let frames = r.resolve(&identity("R"), false);
    for f in &frames {
        assert_eq!(f.bounds, Some(Bounds::FULL));
        assert!(f.masks.iter().all(|m| m.bounds == Some(Bounds::FULL)));
    }
    let template = catalog.get("Red Frame").unwrap();
    assert!(template.bounds.is_none());
    assert!(template.masks.is_empty());
    assert!(masks.left.bounds.is_none());
}

#[test]
fn template_masks_precede_card_masks() {
    let catalog = FrameCatalog::new(vec![
        FrameDescriptor::new("Red Frame", "r.png").with_mask(MaskDescriptor::new("Border", "b.png")),
    ])
    .unwrap();
    let masks = HalfMasks::default();
    let frames = FrameResolver::new(&catalog, &masks).resolve(&identity("R"), false);
    assert_eq!(
        summary(&frames),
        vec![
            s("Red Frame", &["Border", "Left Half"]),
            s("Red Frame", &["Border", "Right Half"])
        ]
    );
}

#[test]
fn resolve_named_uses_single_frame() {
    let catalog = full_catalog();
    let masks = HalfMasks::default();
    let frames = FrameResolver::new(&catalog, &masks).resolve_named("artifact frame");
    assert_eq!(summary(&frames), vec![s(ARTIFACT_FRAME, &[])]);
}
