//! Review Session Integration Tests
//!
//! Loads a contract file into a session and runs it over HTTP.

use std::fs;

use contract_review::{
    AnalysisConfig, AppError, PipelineEvent, ReviewSession, SettingsStore, SettingsUpdate,
};
use tempfile::TempDir;
use wiremock::MockServer;

use crate::support::*;

#[tokio::test]
async fn test_session_reviews_loaded_text_file() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let dir = TempDir::new().unwrap();
    let contract_path = dir.path().join("采购合同.TXT");
    fs::write(&contract_path, CONTRACT).unwrap();

    let session = ReviewSession::new(config_for(&server));
    let chars = session.load_contract(&contract_path).await.unwrap();
    assert_eq!(chars, CONTRACT.chars().count());

    let mut handle = session.start_review().await.unwrap();
    assert!(session.is_running().await);
    assert!(matches!(
        session.start_review().await,
        Err(AppError::Validation(_))
    ));

    let mut completed = None;
    while let Some(event) = handle.next_event().await {
        if let PipelineEvent::Completed { result } = event {
            completed = Some(result);
        }
    }
    session.finish_review(handle.id(), completed.unwrap()).await;

    let stored = session.last_result().await.unwrap();
    assert_eq!(stored.accuracy_check.as_text(), Some(ACCURACY_REPLY));
    assert!(!session.is_running().await);
}

#[tokio::test]
async fn test_session_uses_settings_from_store() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let dir = TempDir::new().unwrap();
    let mut store = SettingsStore::open(dir.path().join("config.json")).unwrap();
    store
        .update_config(SettingsUpdate {
            api_key: Some("sk-integration".to_string()),
            base_url: Some(server.uri()),
            ..SettingsUpdate::default()
        })
        .unwrap();

    let reopened = SettingsStore::open(store.path()).unwrap();
    let session = ReviewSession::from_store(&reopened);
    session.set_contract_text(CONTRACT).await;

    let outcome = session.start_review().await.unwrap().wait().await.unwrap();
    assert!(outcome.into_result().is_some());
}

#[tokio::test]
async fn test_unsupported_contract_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("contract.rtf");
    fs::write(&path, "{\\rtf1 合同}").unwrap();

    let session = ReviewSession::new(AnalysisConfig::default());
    let err = session.load_contract(&path).await.unwrap_err();
    assert!(matches!(err, AppError::UnsupportedFormat(_)));
    assert!(session.contract().await.is_none());
}
