//! Integration tests for the project file tree.
//!
//! Exercises whole editing sessions: creation, moves, persistence round
//! trips and the refresh signal, the way hosts drive the file system.

use uigen_files::{FilesBuilder, NodeKind, SerializedNode, SerializedNodes, VirtualFileSystem};

fn project() -> VirtualFileSystem {
    FilesBuilder::new()
        .add_file(
            "/App.jsx",
            "import Counter from '@/components/Counter';\nexport default function App() { return <Counter />; }",
        )
        .add_file(
            "/components/Counter.jsx",
            "export default function Counter() { return <button>0</button>; }",
        )
        .add_file("/components/ui/Button.jsx", "export const Button = () => null;")
        .add_file("/styles.css", "body { margin: 0; }")
        .build()
        .unwrap()
}

/// Serialization followed by deserialization reproduces the tree exactly
#[test]
fn test_serialize_round_trip_is_exact() {
    let vfs = project();
    let nodes = vfs.serialize();

    let mut restored = VirtualFileSystem::new();
    restored.deserialize_from_nodes(&nodes).unwrap();

    assert_eq!(restored.serialize(), nodes);
    assert_eq!(restored.get_all_files(), vfs.get_all_files());
}

/// The JSON payload uses the persisted node shape
#[test]
fn test_persisted_payload_shape() {
    let vfs = FilesBuilder::new()
        .add_file("/App.jsx", "x")
        .build()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&vfs.to_json().unwrap()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "/": {"type": "directory", "name": "/", "path": "/"},
            "/App.jsx": {"type": "file", "name": "App.jsx", "path": "/App.jsx", "content": "x"}
        })
    );
}

/// Payloads written by other hosts may omit metadata and intermediate dirs
#[test]
fn test_deserialize_tolerates_sparse_payload() {
    let payload = r#"{
        "/components/Card.jsx": {"type": "file", "content": "card"},
        "/App.jsx": {"type": "file"},
        "/assets": {"type": "directory"}
    }"#;

    let vfs = VirtualFileSystem::from_json(payload).unwrap();
    assert_eq!(vfs.read_file("/App.jsx"), Some(""));
    assert_eq!(vfs.read_file("/components/Card.jsx"), Some("card"));
    assert!(vfs.is_directory("/components"));
    assert!(vfs.is_directory("/assets"));
}

/// Creating twice at one path fails and keeps the first content
#[test]
fn test_create_twice_keeps_first_content() {
    let mut vfs = VirtualFileSystem::new();
    vfs.create_file("/App.jsx", "first").unwrap();

    let err = vfs.create_file("/App.jsx", "second").unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(vfs.read_file("/App.jsx"), Some("first"));
}

/// Directory rename moves all descendants
#[test]
fn test_directory_rename_moves_descendants() {
    let mut vfs = project();
    vfs.rename("/components", "/widgets").unwrap();

    assert!(!vfs.exists("/components"));
    assert!(!vfs.exists("/components/Counter.jsx"));
    assert!(vfs.exists("/widgets/Counter.jsx"));
    assert!(vfs.exists("/widgets/ui/Button.jsx"));

    let names: Vec<_> = vfs
        .list_directory("/widgets")
        .unwrap()
        .into_iter()
        .map(|entry| (entry.name, entry.kind))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Counter.jsx".to_string(), NodeKind::File),
            ("ui".to_string(), NodeKind::Directory)
        ]
    );
}

/// A failed rename moves nothing
#[test]
fn test_failed_rename_moves_nothing() {
    let mut vfs = project();
    let before = vfs.serialize();

    assert!(vfs.rename("/components", "/styles.css").is_err());
    assert!(vfs.rename("/components", "/components/ui/nested").is_err());
    assert!(vfs.rename("/App.jsx", "/styles.css/App.jsx").is_err());

    assert_eq!(vfs.serialize(), before);
}

/// Every path argument is normalized before use
#[test]
fn test_paths_are_normalized() {
    let mut vfs = VirtualFileSystem::new();
    vfs.create_file("components//./Card.jsx", "card").unwrap();
    vfs.update_file("/components/../components/Card.jsx", "updated")
        .unwrap();

    assert_eq!(vfs.read_file("/components/Card.jsx"), Some("updated"));
    assert!(vfs.exists("components/"));
}

/// The refresh counter moves once per successful mutation
#[test]
fn test_refresh_counter_tracks_mutations() {
    let mut vfs = VirtualFileSystem::new();
    let rx = vfs.subscribe();

    vfs.create_file("/App.jsx", "").unwrap();
    vfs.create_file("/App.jsx", "").unwrap_err();
    vfs.create_directory("/lib").unwrap();
    vfs.delete("/lib").unwrap();
    vfs.delete("/lib").unwrap_err();

    assert_eq!(vfs.refresh_count(), 3);
    assert_eq!(*rx.borrow(), 3);
}

/// A file used as a directory by another entry rejects the whole payload
#[test]
fn test_conflicting_payload_is_rejected() {
    let mut nodes = SerializedNodes::new();
    nodes.insert("/App.jsx".to_string(), SerializedNode::file("x"));
    nodes.insert("/App.jsx/inner.jsx".to_string(), SerializedNode::file("y"));

    let err = VirtualFileSystem::from_nodes(&nodes).unwrap_err();
    assert!(err.is_not_directory());
}

/// Snapshots are detached from later edits
#[test]
fn test_snapshot_is_owned() {
    let mut vfs = project();
    let snapshot = vfs.get_all_files();

    vfs.update_file("/App.jsx", "changed").unwrap();

    assert_ne!(snapshot.get("/App.jsx"), Some("changed"));
    assert_eq!(snapshot.len(), 4);
}
