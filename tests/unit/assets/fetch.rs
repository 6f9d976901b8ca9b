use super::*;

#[test]
fn fix_uri_normalizes_site_relative_paths() {
    assert_eq!(fix_uri("/img/blank.png").unwrap(), "img/blank.png");
    assert_eq!(fix_uri("img\\frames\\./r.png").unwrap(), "img/frames/r.png");
    assert_eq!(fix_uri("  art//a.jpg ").unwrap(), "art/a.jpg");
}

#[test]
fn fix_uri_rejects_traversal_empty_and_remote() {
    assert!(fix_uri("../secret.png").is_err());
    assert!(fix_uri("").is_err());
    assert!(fix_uri("/./").is_err());
    assert!(fix_uri("https://example.com/a.png").is_err());
}

#[tokio::test]
async fn memory_fetcher_records_requests() {
    let mut f = MemoryFetcher::new();
    f.insert("a.png", vec![1, 2, 3]);
    assert_eq!(f.fetch("a.png").await.unwrap(), vec![1, 2, 3]);
    let err = f.fetch("b.png").await.unwrap_err();
    assert!(matches!(err, CardforgeError::MissingAsset(_)));
    assert_eq!(f.requests(), vec!["a.png".to_string(), "b.png".to_string()]);
}

#[tokio::test]
async fn fs_fetcher_reads_relative_to_root() {
    let dir = std::path::PathBuf::from("target").join("fetch_unit");
    std::fs::create_dir_all(dir.join("img")).unwrap();
    std::fs::write(dir.join("img").join("x.bin"), b"xyz").unwrap();

    let f = FsFetcher::new(&dir);
    assert_eq!(f.fetch("img/x.bin").await.unwrap(), b"xyz".to_vec());
    assert!(f.fetch("img/missing.bin").await.is_err());
}
