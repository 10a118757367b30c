//! Virtual file system for the UIGen live preview.
//!
//! Provides the authoritative, in-memory project state that an agent edits
//! through the editing tools and the preview pipeline compiles. Files and
//! directories live in an ordered tree keyed by normalized absolute paths.
//!
//! # Features
//!
//! - **Normalized paths**: `FilePath` collapses separators, drops `.` and
//!   clamps `..` at the root
//! - **Atomic mutations**: failed operations leave the tree untouched
//! - **Refresh signal**: a counter bumped once per successful mutation, with
//!   a `tokio::sync::watch` subscription
//! - **Persistence**: flat `path → {type, name, path, content}` node maps
//! - **Export**: write the tree to a real directory
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```
//! use uigen_files::VirtualFileSystem;
//!
//! let mut vfs = VirtualFileSystem::new();
//! vfs.create_file("/App.jsx", "export default function App() {}").unwrap();
//!
//! assert_eq!(vfs.read_file("/App.jsx"), Some("export default function App() {}"));
//! assert!(vfs.exists("/App.jsx"));
//! assert!(!vfs.exists("/missing.jsx"));
//! ```
//!
//! ## Persistence
//!
//! ```
//! use uigen_files::{FilesBuilder, VirtualFileSystem};
//!
//! let vfs = FilesBuilder::new()
//!     .add_file("/components/Card.jsx", "export default () => null;")
//!     .build()
//!     .unwrap();
//!
//! let nodes = vfs.serialize();
//! let restored = VirtualFileSystem::from_nodes(&nodes).unwrap();
//! assert_eq!(restored.serialize(), nodes);
//! ```
//!
//! ## Directory operations
//!
//! ```
//! use uigen_files::{FilesBuilder, NodeKind};
//!
//! let vfs = FilesBuilder::new()
//!     .add_file("/components/Button.jsx", "")
//!     .add_file("/components/Card.jsx", "")
//!     .build()
//!     .unwrap();
//!
//! let entries = vfs.list_directory("/components").unwrap();
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[0].kind, NodeKind::File);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod export;
pub mod tree;
pub mod types;
pub mod vfs;

pub use builder::FilesBuilder;
pub use export::ExportOptions;
pub use tree::{Files, PathTree};
pub use types::{
    DirEntry, FilePath, FileSet, FilesError, Node, NodeKind, Result, SerializedNode,
    SerializedNodes,
};
pub use vfs::VirtualFileSystem;
