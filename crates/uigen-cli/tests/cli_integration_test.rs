//! Integration tests for the project workflow behind the CLI commands.
//!
//! Each test drives the command handlers the way `uigen` does: seed a
//! project file, replay tool calls against it, then render and export.

use tempfile::TempDir;
use uigen_cli::commands::{apply, common, export, init, preview, view};
use uigen_core::cli::{ExitCode, OutputFormat};
use uigen_core::{PreviewConfig, Theme};
use uigen_preview::{DiagnosticKind, PreviewState};
use uigen_tools::Starter;

const EDITS: &str = r#"{"name": "str_replace_editor", "arguments": {"command": "str_replace", "path": "/App.jsx", "old_str": "bg-gray-100", "new_str": "bg-slate-900"}}
{"name": "str_replace_editor", "arguments": {"command": "create", "path": "/components/Badge.jsx", "file_text": "export default function Badge() { return <span>new</span>; }"}}
"#;

#[tokio::test]
async fn test_init_apply_preview_export() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project.json");

    init::create(&project, Starter::Counter, false).await.unwrap();

    let calls = apply::parse_calls(EDITS).unwrap();
    let report = apply::apply_to_project(&project, &calls).await.unwrap();
    assert_eq!(report.applied, 2);
    assert!(!report.has_failures());

    let vfs = common::load_project(&project).await.unwrap();
    assert_eq!(vfs.file_count(), 3);
    assert!(vfs.read_file("/App.jsx").unwrap().contains("bg-slate-900"));

    let update = preview::render(&vfs, PreviewConfig::default(), Theme::Dark).unwrap();
    assert_eq!(update.state, PreviewState::Ready);
    assert_eq!(update.entry.as_ref().map(ToString::to_string).as_deref(), Some("/App.jsx"));
    assert!(update.diagnostics.is_empty());

    let out = temp.path().join("site");
    let exported = export::export(&project, &out, true).await.unwrap();
    assert_eq!(exported.written, 3);
    assert!(out.join("components/Counter.jsx").exists());
    assert!(out.join("components/Badge.jsx").exists());
}

#[tokio::test]
async fn test_rename_breaks_import_and_preview_reports_it() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project.json");
    init::create(&project, Starter::Card, false).await.unwrap();

    let calls = apply::parse_calls(
        r#"[{"name": "file_manager", "arguments": {"command": "rename", "path": "/components/Card.jsx", "new_path": "/components/ProfileCard.jsx"}}]"#,
    )
    .unwrap();
    let report = apply::apply_to_project(&project, &calls).await.unwrap();
    assert_eq!(report.applied, 1);

    let vfs = common::load_project(&project).await.unwrap();
    let update = preview::render(&vfs, PreviewConfig::default(), Theme::Light).unwrap();
    assert_eq!(update.state, PreviewState::Ready);
    assert_eq!(update.diagnostics.len(), 1);
    assert_eq!(update.diagnostics[0].kind, DiagnosticKind::UnresolvedImport);
}

#[tokio::test]
async fn test_failed_call_is_reported_and_others_still_apply() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project.json");
    init::create(&project, Starter::Blank, false).await.unwrap();

    let calls = apply::parse_calls(
        r#"{"name": "file_manager", "arguments": {"command": "delete", "path": "/missing.jsx"}}
{"name": "str_replace_editor", "arguments": {"command": "create", "path": "/components/Note.jsx", "file_text": "export default () => null;"}}"#,
    )
    .unwrap();
    let report = apply::apply_to_project(&project, &calls).await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.applied, 1);
    assert!(report.calls[0].error);

    let mut vfs = common::load_project(&project).await.unwrap();
    let listing = view::view(&mut vfs, "/components", None, None);
    assert!(listing.output.contains("Note.jsx"));
}

#[tokio::test]
async fn test_view_command_exit_codes() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project.json");
    init::create(&project, Starter::Blank, false).await.unwrap();

    let ok = view::run(project.clone(), "/App.jsx".to_string(), None, None, OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(ok, ExitCode::SUCCESS);

    let missing = view::run(project, "/Nope.jsx".to_string(), None, None, OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(missing, ExitCode::TOOL_FAILED);
}

#[tokio::test]
async fn test_preview_command_writes_document() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project.json");
    let config = temp.path().join("uigen.toml");
    std::fs::write(&config, "title = \"Counter demo\"\n").unwrap();
    init::create(&project, Starter::Counter, false).await.unwrap();

    let code = preview::run(project.clone(), None, true, Some(config), OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let html = std::fs::read_to_string(temp.path().join("project.html")).unwrap();
    assert!(html.contains("Counter demo"));
}
