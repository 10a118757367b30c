//! Tests for project sessions shared between concurrent tool calls.

use std::sync::Arc;
use tempfile::TempDir;
use uigen_core::{PreviewConfig, Theme};
use uigen_files::VirtualFileSystem;
use uigen_server::{ProjectSession, SessionRegistry};
use uigen_tools::{FileManagerParams, Starter, TextEditorParams, ToolCall};

fn create(path: &str, text: &str) -> ToolCall {
    ToolCall::TextEditor(TextEditorParams::create(path, text))
}

#[tokio::test]
async fn test_concurrent_creates_at_same_path() {
    let session = Arc::new(
        ProjectSession::new(VirtualFileSystem::new(), PreviewConfig::default()).unwrap(),
    );

    let mut handles = vec![];
    for i in 0..8 {
        let session = Arc::clone(&session);
        handles.push(tokio::spawn(async move {
            session
                .apply(&create("/App.jsx", &format!("version {i}")))
                .await
                .unwrap()
        }));
    }

    let mut created = 0;
    for handle in handles {
        if !handle.await.unwrap().is_error() {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(session.file_count().await, 1);
}

#[tokio::test]
async fn test_concurrent_edits_to_different_files() {
    let session = Arc::new(
        ProjectSession::new(VirtualFileSystem::new(), PreviewConfig::default()).unwrap(),
    );

    let mut handles = vec![];
    for i in 0..10 {
        let session = Arc::clone(&session);
        handles.push(tokio::spawn(async move {
            session
                .apply(&create(&format!("/components/Item{i}.jsx"), "export default 1;"))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        assert!(!handle.await.unwrap().is_error());
    }

    assert_eq!(session.file_count().await, 10);
    let count = session.with_files(VirtualFileSystem::refresh_count).await;
    assert_eq!(count, 10);
}

#[tokio::test]
async fn test_agent_workflow_with_project_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("project.json");
    let registry = SessionRegistry::new();

    let session = ProjectSession::open(&path, PreviewConfig::default()).await.unwrap();
    let (id, _) = registry.insert(session).await;

    let session = registry.get(id).await.unwrap();
    for call in Starter::Counter.calls() {
        assert!(!session.apply(&call).await.unwrap().is_error());
    }
    let update = session.render(Some(Theme::Dark)).await.unwrap();
    assert!(update.diagnostics.is_empty(), "{:?}", update.diagnostics);

    session
        .apply(&ToolCall::FileManager(FileManagerParams::delete("/components")))
        .await
        .unwrap();
    let update = session.render(None).await.unwrap();
    assert_eq!(update.diagnostics.len(), 1);
    assert!(update.diagnostics[0].message.contains("@/components/Counter"));

    registry.remove(id).await;

    let reopened = ProjectSession::open(&path, PreviewConfig::default()).await.unwrap();
    assert_eq!(reopened.file_count().await, 1);
    let exists = reopened.with_files(|vfs| vfs.exists("/components")).await;
    assert!(!exists);
}

#[tokio::test]
async fn test_sessions_do_not_share_files() {
    let registry = SessionRegistry::new();
    let (a, _) = registry
        .insert(ProjectSession::new(VirtualFileSystem::new(), PreviewConfig::default()).unwrap())
        .await;
    let (b, _) = registry
        .insert(ProjectSession::new(VirtualFileSystem::new(), PreviewConfig::default()).unwrap())
        .await;

    registry
        .get(a)
        .await
        .unwrap()
        .apply(&create("/App.jsx", "x"))
        .await
        .unwrap();

    assert_eq!(registry.get(a).await.unwrap().file_count().await, 1);
    assert_eq!(registry.get(b).await.unwrap().file_count().await, 0);
}
