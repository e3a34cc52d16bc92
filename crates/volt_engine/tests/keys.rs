use volt_engine::{ApiKeyStore, KeyFileSelector, KeySelectError, KeySelector};

#[tokio::test]
async fn key_file_replaces_stored_key() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("key");
    std::fs::write(&path, "  new-key \n").unwrap();
    let store = ApiKeyStore::new(Some("old-key".into()));

    KeyFileSelector::new(path, store.clone())
        .open_select_key()
        .await
        .unwrap();

    assert_eq!(store.get().as_deref(), Some("new-key"));
}

#[tokio::test]
async fn empty_key_file_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("key");
    std::fs::write(&path, "\n").unwrap();
    let store = ApiKeyStore::new(Some("old-key".into()));

    let err = KeyFileSelector::new(path, store.clone())
        .open_select_key()
        .await
        .unwrap_err();

    assert!(matches!(err, KeySelectError::EmptyKey { .. }));
    assert_eq!(store.get().as_deref(), Some("old-key"));
}

#[tokio::test]
async fn missing_key_file_is_an_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = ApiKeyStore::default();

    let err = KeyFileSelector::new(dir.path().join("absent"), store.clone())
        .open_select_key()
        .await
        .unwrap_err();

    assert!(matches!(err, KeySelectError::Io(_)));
    assert_eq!(store.get(), None);
}
