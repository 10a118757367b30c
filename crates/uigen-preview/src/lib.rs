//! Live preview compilation for UIGen projects.
//!
//! Turns a snapshot of the virtual file system into one sandboxed HTML
//! document that runs the project in the browser without a build server.
//!
//! # Pipeline
//!
//! 1. [`discover_entry`] picks the module the preview starts from
//! 2. [`ModuleResolver`] walks the import graph, collecting unresolved
//!    imports as [`Diagnostic`]s instead of failing
//! 3. [`SourceTransformer`] lowers JSX and erases TypeScript syntax
//! 4. A [`Materializer`] turns each module into a loadable URL, which goes
//!    into the [`ImportMap`]
//! 5. [`PreviewAssembler`] renders the document with the import map,
//!    styles, theme and error overlay
//!
//! [`PreviewSession`] drives this per project: it tracks the
//! welcome / no files / no component / ready states and makes sure a
//! superseded build never replaces a newer preview.
//!
//! # Examples
//!
//! ```
//! use uigen_core::{PreviewConfig, Theme};
//! use uigen_files::FileSet;
//! use uigen_preview::{PreviewSession, PreviewState};
//!
//! let files: FileSet = [
//!     ("/App.jsx", "import Counter from '@/components/Counter';\nexport default () => <Counter />;"),
//!     ("/components/Counter.jsx", "export default function Counter() { return <button>0</button>; }"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut session = PreviewSession::new(PreviewConfig::default()).unwrap();
//! session.set_theme(Theme::Dark);
//!
//! let update = session.refresh(&files, 1).unwrap();
//! assert_eq!(update.state, PreviewState::Ready);
//! assert!(update.diagnostics.is_empty());
//! assert!(update.html.contains(r#"<script type="importmap">"#));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod assembler;
pub mod entry;
pub mod error;
pub mod import_map;
pub mod pipeline;
pub mod resolver;
pub mod resource;
pub mod session;
pub mod template_engine;
pub mod transform;

pub use assembler::{DocumentParts, PreviewAssembler, PreviewState, SANDBOX_POLICY};
pub use entry::{EntryPoint, discover_entry};
pub use error::{Diagnostic, DiagnosticKind, PreviewError, Result};
pub use import_map::ImportMap;
pub use pipeline::{PreviewDocument, PreviewPipeline};
pub use resolver::{ModuleGraph, ModuleResolver};
pub use resource::{BlobStore, DataUrlMaterializer, Materializer, ResourceHandle};
pub use session::{BuildOutcome, BuildSignal, BuildTicket, PreviewSession, PreviewUpdate};
pub use transform::{SourceTransformer, TransformError};
