//! `.wrp` save/load of imported projects.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use wirepad_application::ports::ProjectStore;
use wirepad_infrastructure::persistence::decode;
use wirepad_infrastructure::{PostmanImporter, TokioFileSystem, WrpProjectStore};

const PET_STORE_V21: &str = include_str!("fixtures/pet_store_v21.json");
const LEGACY_V20: &str = include_str!("fixtures/legacy_shop_v20.json");

#[tokio::test]
async fn test_imported_projects_survive_save_and_load() {
    let dir = tempdir().expect("Failed to create temp directory");
    let store = WrpProjectStore::new(TokioFileSystem::new());

    for (name, content) in [("pets.wrp", PET_STORE_V21), ("shop.wrp", LEGACY_V20)] {
        let project = PostmanImporter::new().import(content).unwrap().project;
        let path = dir.path().join(name);

        store.save(&project, &path).await.expect("save");
        let loaded = store.load(&path).await.expect("load");

        assert_eq!(loaded, project);
    }
}

#[tokio::test]
async fn test_saved_file_hides_secrets() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shop.wrp");
    let store = WrpProjectStore::new(TokioFileSystem::new());

    let project = PostmanImporter::new().import(LEGACY_V20).unwrap().project;
    store.save(&project, &path).await.unwrap();

    let bytes = tokio::fs::read(&path).await.unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(!text.contains("shop.example.com"));
    assert!(!text.contains("<<productName>>"));
    assert!(text.contains("\"wirepad-project\""));

    assert_eq!(decode(&bytes).unwrap(), project);
}

#[tokio::test]
async fn test_save_overwrites_previous_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pets.wrp");
    let store = WrpProjectStore::new(TokioFileSystem::new());

    let mut project = PostmanImporter::new().import(PET_STORE_V21).unwrap().project;
    store.save(&project, &path).await.unwrap();

    project.label = "Renamed".to_string();
    store.save(&project, &path).await.unwrap();

    assert_eq!(store.load(&path).await.unwrap().label, "Renamed");
    assert!(!dir.path().join("pets.wrp.tmp").exists());
}
