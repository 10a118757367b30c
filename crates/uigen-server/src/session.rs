//! One open project: its file tree, live preview and project file.
//!
//! The file tree sits behind a single `tokio::sync::Mutex`, so every tool
//! call runs its read-modify-write sequence in one critical section. The
//! preview builds from a snapshot taken under that lock and never holds it
//! while compiling. A mutation cancels any build still running on an older
//! snapshot, and the render behind it starts over from the new tree.

use crate::error::{Result, SessionError};
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};
use uigen_core::{PreviewConfig, Theme};
use uigen_files::VirtualFileSystem;
use uigen_preview::{BuildSignal, PreviewSession, PreviewUpdate};
use uigen_tools::{ToolCall, ToolOutput};

/// An open project.
///
/// # Examples
///
/// ```
/// use uigen_core::PreviewConfig;
/// use uigen_files::VirtualFileSystem;
/// use uigen_server::ProjectSession;
/// use uigen_tools::{TextEditorParams, ToolCall};
///
/// # async fn example() -> uigen_server::error::Result<()> {
/// let session = ProjectSession::new(VirtualFileSystem::new(), PreviewConfig::default())?;
///
/// let call = ToolCall::TextEditor(TextEditorParams::create(
///     "/App.jsx",
///     "export default () => <h1>Hi</h1>;",
/// ));
/// let output = session.apply(&call).await?;
/// assert!(!output.is_error());
///
/// let update = session.render(None).await?;
/// assert_eq!(update.state.as_str(), "ready");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ProjectSession {
    vfs: Mutex<VirtualFileSystem>,
    preview: Mutex<PreviewSession>,
    signal: BuildSignal,
    project_file: Option<PathBuf>,
}

impl ProjectSession {
    /// Wraps a file tree in a new session.
    ///
    /// # Errors
    ///
    /// Returns `Preview` if the preview pipeline fails to initialize.
    pub fn new(vfs: VirtualFileSystem, config: PreviewConfig) -> Result<Self> {
        let preview = PreviewSession::new(config)?;
        Ok(Self {
            vfs: Mutex::new(vfs),
            signal: preview.signal(),
            preview: Mutex::new(preview),
            project_file: None,
        })
    }

    /// Persists the tree to `path` after every successful mutation.
    #[must_use]
    pub fn with_project_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_file = Some(path.into());
        self
    }

    /// Opens the project stored at `path`, or an empty one if the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file exists but cannot be read, and `Files` if
    /// its content is not a valid node map.
    pub async fn open(path: impl Into<PathBuf>, config: PreviewConfig) -> Result<Self> {
        let path = path.into();
        let vfs = match tokio::fs::read_to_string(&path).await {
            Ok(json) => VirtualFileSystem::from_json(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "project file not found, starting empty");
                VirtualFileSystem::new()
            }
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        info!(path = %path.display(), files = vfs.file_count(), "opened project");
        Ok(Self::new(vfs, config)?.with_project_file(path))
    }

    /// Project file this session persists to.
    #[must_use]
    pub fn project_file(&self) -> Option<&Path> {
        self.project_file.as_deref()
    }

    /// Runs a tool call against the tree.
    ///
    /// Tool failures come back as error output and leave the tree and the
    /// project file untouched.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the mutation succeeded but the project file could
    /// not be written.
    pub async fn apply(&self, call: &ToolCall) -> Result<ToolOutput> {
        let (output, snapshot) = {
            let mut vfs = self.vfs.lock().await;
            let before = vfs.refresh_count();
            let output = call.execute(&mut vfs);
            let changed = vfs.refresh_count() != before;
            debug!(tool = call.tool(), changed, "applied tool call");
            if changed {
                self.signal.supersede();
            }

            let snapshot = if changed && self.project_file.is_some() {
                Some(vfs.to_json()?)
            } else {
                None
            };
            (output, snapshot)
        };

        if let Some(json) = snapshot {
            self.persist(&json).await?;
        }
        Ok(output)
    }

    async fn persist(&self, json: &str) -> Result<()> {
        let Some(path) = &self.project_file else {
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| SessionError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(path, json).await.map_err(|source| {
            warn!(path = %path.display(), error = %source, "failed to persist project");
            SessionError::Io {
                path: path.clone(),
                source,
            }
        })
    }

    /// Rebuilds the preview from the current tree.
    ///
    /// `theme` switches the preview theme before building; `None` keeps it.
    ///
    /// # Errors
    ///
    /// Returns `Preview` if a document cannot be rendered.
    pub async fn render(&self, theme: Option<Theme>) -> Result<PreviewUpdate> {
        loop {
            let (files, refresh_count) = {
                let vfs = self.vfs.lock().await;
                (vfs.get_all_files(), vfs.refresh_count())
            };

            let mut preview = self.preview.lock().await;
            if let Some(theme) = theme {
                preview.set_theme(theme);
            }
            match preview.refresh(&files, refresh_count) {
                Err(e) if e.is_superseded() => {
                    debug!(refresh_count, "preview build cancelled by an edit, rebuilding");
                }
                result => return Ok(result?),
            }
        }
    }

    /// Number of files in the project.
    pub async fn file_count(&self) -> usize {
        self.vfs.lock().await.file_count()
    }

    /// Subscribes to the tree's refresh counter.
    pub async fn subscribe(&self) -> watch::Receiver<u64> {
        self.vfs.lock().await.subscribe()
    }

    /// Runs `f` with shared access to the tree.
    pub async fn with_files<T>(&self, f: impl FnOnce(&VirtualFileSystem) -> T) -> T {
        f(&*self.vfs.lock().await)
    }
}
