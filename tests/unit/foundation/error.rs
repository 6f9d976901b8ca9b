use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardforgeError::missing_asset("x")
            .to_string()
            .contains("missing asset:")
    );
    assert!(
        CardforgeError::asset_load("x")
            .to_string()
            .contains("asset load failure:")
    );
    assert!(CardforgeError::timeout("x").to_string().contains("timeout:"));
    assert!(
        CardforgeError::render_not_ready("x")
            .to_string()
            .contains("render not ready:")
    );
    assert!(
        CardforgeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CardforgeError::malformed_row("x")
            .to_string()
            .contains("malformed row:")
    );
}

#[test]
fn only_timeouts_are_fatal() {
    assert!(CardforgeError::timeout("catalog").is_fatal());
    assert!(!CardforgeError::asset_load("art").is_fatal());
    assert!(!CardforgeError::render_not_ready("art").is_fatal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardforgeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
