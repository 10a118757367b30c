//! Preview lifecycle for one project.
//!
//! [`PreviewSession`] is the consumer side of the pipeline. It decides
//! which state the preview is in, tags every build with a generation,
//! refuses results from superseded builds, and releases resource handles
//! once the generation that owned them is no longer shown.
//!
//! # States
//!
//! ```text
//! Welcome ──files──▶ NoComponent ──entry──▶ Ready
//!    ▲                    │                  │
//!    └── (first load)     └──── files change ┴──▶ NoFiles | NoComponent | Ready
//! ```
//!
//! An empty project shows `Welcome` until it has ever had files, and
//! `NoFiles` afterwards.

use crate::assembler::PreviewState;
use crate::entry::{EntryPoint, discover_entry};
use crate::error::{Diagnostic, PreviewError, Result};
use crate::pipeline::{PreviewDocument, PreviewPipeline};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};
use uigen_core::{PreviewConfig, Theme};
use uigen_files::{FilePath, FileSet};

/// Identifies one build. Only the most recently issued ticket is current.
#[derive(Debug, Clone)]
pub struct BuildTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl BuildTicket {
    /// Generation of this build.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` while no newer build has been started.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

/// Supersedes builds from outside the session.
///
/// A clone can be handed to a writer task: calling [`supersede`] while a
/// build runs makes that build stop before its next module.
///
/// [`supersede`]: BuildSignal::supersede
#[derive(Debug, Clone)]
pub struct BuildSignal {
    latest: Arc<AtomicU64>,
}

impl BuildSignal {
    /// Marks every build started so far as superseded. Returns the
    /// generation reserved for the supersession.
    pub fn supersede(&self) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation, "preview builds superseded");
        generation
    }

    /// Most recently issued generation.
    #[must_use]
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

/// Result of a build, before it is committed.
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    /// Nothing to build; show a status page
    Status(PreviewState),
    /// A built document
    Document(PreviewDocument),
}

/// What the host should display after a refresh.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewUpdate {
    /// Generation now committed
    pub generation: u64,
    /// Current state
    pub state: PreviewState,
    /// Entry module, when `Ready`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<FilePath>,
    /// Document to display
    pub html: String,
    /// Diagnostics of the latest build
    pub diagnostics: Vec<Diagnostic>,
    /// The previous document is still shown because the new build had
    /// transform failures
    pub kept_previous: bool,
}

/// Preview state for one project.
///
/// # Examples
///
/// ```
/// use uigen_core::PreviewConfig;
/// use uigen_files::FileSet;
/// use uigen_preview::{PreviewSession, PreviewState};
///
/// let mut session = PreviewSession::new(PreviewConfig::default()).unwrap();
///
/// let update = session.refresh(&FileSet::new(), 0).unwrap();
/// assert_eq!(update.state, PreviewState::Welcome);
///
/// let files: FileSet = [("/App.jsx", "export default () => <p>hi</p>;")]
///     .into_iter()
///     .collect();
/// let update = session.refresh(&files, 1).unwrap();
/// assert_eq!(update.state, PreviewState::Ready);
///
/// let update = session.refresh(&FileSet::new(), 2).unwrap();
/// assert_eq!(update.state, PreviewState::NoFiles);
/// ```
#[derive(Debug)]
pub struct PreviewSession {
    pipeline: PreviewPipeline,
    latest: Arc<AtomicU64>,
    committed: u64,
    state: PreviewState,
    had_files: bool,
    entry: Option<FilePath>,
    theme: Theme,
    dirty: bool,
    seen_refresh: Option<u64>,
    document: Option<PreviewDocument>,
    html: Option<String>,
    diagnostics: Vec<Diagnostic>,
    last: Option<PreviewUpdate>,
}

impl PreviewSession {
    /// Creates a session with the default `data:` URL materializer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline fails to initialize.
    pub fn new(config: PreviewConfig) -> Result<Self> {
        Ok(Self::with_pipeline(PreviewPipeline::new(config)?))
    }

    /// Creates a session around an existing pipeline.
    #[must_use]
    pub fn with_pipeline(pipeline: PreviewPipeline) -> Self {
        let theme = pipeline.config().theme;
        Self {
            pipeline,
            latest: Arc::new(AtomicU64::new(0)),
            committed: 0,
            state: PreviewState::Welcome,
            had_files: false,
            entry: None,
            theme,
            dirty: true,
            seen_refresh: None,
            document: None,
            html: None,
            diagnostics: Vec::new(),
            last: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PreviewState {
        self.state
    }

    /// Current theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Entry of the last committed document.
    #[must_use]
    pub const fn entry(&self) -> Option<&FilePath> {
        self.entry.as_ref()
    }

    /// Last committed generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.committed
    }

    /// The document currently shown, if the state is `Ready`.
    #[must_use]
    pub const fn document(&self) -> Option<&PreviewDocument> {
        self.document.as_ref()
    }

    /// HTML currently shown, if any refresh has committed.
    #[must_use]
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// Diagnostics of the latest committed build.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The pipeline used for builds.
    #[must_use]
    pub const fn pipeline(&self) -> &PreviewPipeline {
        &self.pipeline
    }

    /// Changes the theme. Returns `true` if it changed, in which case the
    /// preview needs a refresh.
    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if self.theme == theme {
            return false;
        }
        debug!(theme = %theme, "preview theme changed");
        self.theme = theme;
        self.dirty = true;
        true
    }

    /// Returns `true` if the preview is out of date for `refresh_count`.
    #[must_use]
    pub fn needs_refresh(&self, refresh_count: u64) -> bool {
        self.dirty || self.seen_refresh != Some(refresh_count)
    }

    /// Handle that supersedes this session's builds from another task.
    #[must_use]
    pub fn signal(&self) -> BuildSignal {
        BuildSignal {
            latest: Arc::clone(&self.latest),
        }
    }

    /// Starts a build, superseding any build still in flight.
    #[must_use]
    pub fn begin(&self) -> BuildTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation, "preview build started");
        BuildTicket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Runs the build for `ticket` against a file snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` if a newer build started first or while this
    /// one ran, and `TemplateError` if a document cannot be rendered.
    pub fn build(&mut self, ticket: &BuildTicket, files: &FileSet) -> Result<BuildOutcome> {
        if !ticket.is_current() {
            return Err(PreviewError::Superseded {
                generation: ticket.generation,
            });
        }

        if files.is_empty() {
            let state = if self.had_files {
                PreviewState::NoFiles
            } else {
                PreviewState::Welcome
            };
            return Ok(BuildOutcome::Status(state));
        }

        let entry = match discover_entry(files, self.entry.as_ref(), self.pipeline.config()) {
            EntryPoint::Found(entry) => entry,
            EntryPoint::NoComponent | EntryPoint::EmptyProject => {
                return Ok(BuildOutcome::Status(PreviewState::NoComponent));
            }
        };

        let document = self.pipeline.build_while(
            files,
            &entry,
            self.theme,
            ticket.generation,
            || ticket.is_current(),
        )?;
        Ok(BuildOutcome::Document(document))
    }

    /// Commits a finished build.
    ///
    /// A build with transform failures keeps the previously shown document
    /// on screen when there is one, and reports the new diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `StaleResult` if the build is older than the committed
    /// preview or a newer build has started; its handles are released.
    pub fn finish(&mut self, ticket: &BuildTicket, outcome: BuildOutcome) -> Result<PreviewUpdate> {
        let generation = ticket.generation;
        if generation <= self.committed || !ticket.is_current() {
            let released = self
                .pipeline
                .materializer()
                .release_generation(generation);
            warn!(generation, current = self.committed, released, "stale preview result rejected");
            return Err(PreviewError::StaleResult {
                generation,
                current: self.committed,
            });
        }

        let update = match outcome {
            BuildOutcome::Status(state) => self.commit_status(generation, state)?,
            BuildOutcome::Document(document) => self.commit_document(generation, document),
        };
        self.dirty = false;
        self.last = Some(update.clone());
        Ok(update)
    }

    fn commit_status(&mut self, generation: u64, state: PreviewState) -> Result<PreviewUpdate> {
        let html = self.pipeline.assembler().render_status(state, self.theme)?;
        let materializer = self.pipeline.materializer();
        materializer.release_older_than(generation);

        if state == PreviewState::NoComponent {
            self.had_files = true;
        }
        info!(generation, state = %state, "preview status committed");

        self.committed = generation;
        self.state = state;
        self.document = None;
        self.html = Some(html.clone());
        self.diagnostics = match state {
            PreviewState::NoComponent => vec![Diagnostic::no_entry_point()],
            PreviewState::NoFiles => vec![Diagnostic::empty_project()],
            PreviewState::Welcome | PreviewState::Ready => Vec::new(),
        };
        Ok(PreviewUpdate {
            generation,
            state,
            entry: None,
            html,
            diagnostics: self.diagnostics.clone(),
            kept_previous: false,
        })
    }

    fn commit_document(&mut self, generation: u64, document: PreviewDocument) -> PreviewUpdate {
        self.had_files = true;
        let materializer = self.pipeline.materializer();

        if document.has_transform_failures()
            && let Some(previous) = &self.document
        {
            materializer.release_generation(generation);
            warn!(
                generation,
                shown = previous.generation,
                diagnostics = document.diagnostics.len(),
                "transform failures, keeping previous preview"
            );
            self.diagnostics.clone_from(&document.diagnostics);
            return PreviewUpdate {
                generation: self.committed,
                state: PreviewState::Ready,
                entry: Some(previous.entry.clone()),
                html: previous.html.clone(),
                diagnostics: document.diagnostics,
                kept_previous: true,
            };
        }

        materializer.release_older_than(generation);
        info!(generation, entry = %document.entry, "preview committed");

        self.committed = generation;
        self.state = PreviewState::Ready;
        self.entry = Some(document.entry.clone());
        self.html = Some(document.html.clone());
        self.diagnostics.clone_from(&document.diagnostics);
        let update = PreviewUpdate {
            generation,
            state: PreviewState::Ready,
            entry: Some(document.entry.clone()),
            html: document.html.clone(),
            diagnostics: document.diagnostics.clone(),
            kept_previous: false,
        };
        self.document = Some(document);
        update
    }

    /// Begins, builds and commits in one step.
    ///
    /// `refresh_count` is the file system's refresh counter for `files`.
    /// A snapshot older than one already shown is not built; the current
    /// preview is returned instead.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` if the build is cancelled through a
    /// [`BuildSignal`], and `TemplateError` if a document cannot be
    /// rendered.
    pub fn refresh(&mut self, files: &FileSet, refresh_count: u64) -> Result<PreviewUpdate> {
        if let Some(seen) = self.seen_refresh
            && refresh_count < seen
            && let Some(last) = &self.last
        {
            debug!(refresh_count, seen, "older snapshot ignored");
            return Ok(last.clone());
        }

        let ticket = self.begin();
        let outcome = self.build(&ticket, files)?;
        let update = self.finish(&ticket, outcome)?;
        self.seen_refresh = Some(refresh_count);
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PreviewPipeline;
    use crate::resource::{BlobStore, Materializer, ResourceHandle};
    use std::sync::OnceLock;
    use std::sync::atomic::AtomicBool;

    fn files(entries: &[(&str, &str)]) -> FileSet {
        entries.iter().map(|(p, c)| (*p, *c)).collect()
    }

    fn blob_session() -> (PreviewSession, Arc<BlobStore>) {
        let store = Arc::new(BlobStore::new());
        let pipeline =
            PreviewPipeline::with_materializer(PreviewConfig::default(), store.clone()).unwrap();
        (PreviewSession::with_pipeline(pipeline), store)
    }

    #[test]
    fn test_welcome_then_no_files() {
        let mut session = PreviewSession::new(PreviewConfig::default()).unwrap();
        let update = session.refresh(&FileSet::new(), 0).unwrap();
        assert_eq!(update.state, PreviewState::Welcome);
        assert!(update.html.contains("Welcome to UI Generator"));

        session.refresh(&files(&[("/App.jsx", "export default 1;")]), 1).unwrap();
        let update = session.refresh(&FileSet::new(), 2).unwrap();
        assert_eq!(update.state, PreviewState::NoFiles);
        assert!(update.html.contains("No files to preview"));
    }

    #[test]
    fn test_no_component_state() {
        let mut session = PreviewSession::new(PreviewConfig::default()).unwrap();
        let update = session.refresh(&files(&[("/notes.md", "# hi")]), 1).unwrap();
        assert_eq!(update.state, PreviewState::NoComponent);
        assert_eq!(update.diagnostics, vec![Diagnostic::no_entry_point()]);

        // Files existed, so emptying the project is no longer a first load.
        let update = session.refresh(&FileSet::new(), 2).unwrap();
        assert_eq!(update.state, PreviewState::NoFiles);
    }

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let mut session = PreviewSession::new(PreviewConfig::default()).unwrap();
        let snapshot = files(&[("/App.jsx", "export default 1;")]);

        let first = session.begin();
        let second = session.begin();
        assert!(!first.is_current());
        assert!(session.build(&first, &snapshot).unwrap_err().is_superseded());

        let outcome = session.build(&second, &snapshot).unwrap();
        let update = session.finish(&second, outcome).unwrap();
        assert_eq!(update.generation, second.generation());
    }

    #[test]
    fn test_stale_result_rejected_and_released() {
        let (mut session, store) = blob_session();
        let snapshot = files(&[("/App.jsx", "export default 1;")]);

        let old = session.begin();
        let old_outcome = session.build(&old, &snapshot).unwrap();
        let new = session.begin();
        let new_outcome = session.build(&new, &snapshot).unwrap();
        session.finish(&new, new_outcome).unwrap();

        let err = session.finish(&old, old_outcome).unwrap_err();
        assert!(err.is_stale_result());
        assert_eq!(store.generations(), vec![new.generation()]);
    }

    /// Blob store that supersedes the running build on its first write,
    /// the way a file edit landing mid-build would.
    #[derive(Debug)]
    struct InterruptingStore {
        inner: BlobStore,
        signal: OnceLock<BuildSignal>,
        armed: AtomicBool,
    }

    impl Materializer for InterruptingStore {
        fn materialize(&self, generation: u64, code: &str) -> ResourceHandle {
            if self.armed.swap(false, Ordering::AcqRel)
                && let Some(signal) = self.signal.get()
            {
                signal.supersede();
            }
            self.inner.materialize(generation, code)
        }

        fn release_generation(&self, generation: u64) -> usize {
            self.inner.release_generation(generation)
        }

        fn release_older_than(&self, generation: u64) -> usize {
            self.inner.release_older_than(generation)
        }

        fn live_handles(&self) -> usize {
            self.inner.live_handles()
        }
    }

    #[test]
    fn test_signal_cancels_build_in_flight() {
        let store = Arc::new(InterruptingStore {
            inner: BlobStore::new(),
            signal: OnceLock::new(),
            armed: AtomicBool::new(true),
        });
        let pipeline =
            PreviewPipeline::with_materializer(PreviewConfig::default(), store.clone()).unwrap();
        let mut session = PreviewSession::with_pipeline(pipeline);
        store.signal.set(session.signal()).unwrap();

        let snapshot = files(&[
            ("/App.jsx", "import Card from './Card';\nexport default () => <Card />;"),
            ("/Card.jsx", "export default () => <div />;"),
        ]);

        let err = session.refresh(&snapshot, 1).unwrap_err();
        assert!(err.is_superseded());
        assert_eq!(store.live_handles(), 0);
        assert_eq!(session.generation(), 0);
        assert!(session.html().is_none());
        assert!(session.needs_refresh(1));

        // The next build starts after the supersession and commits.
        let update = session.refresh(&snapshot, 1).unwrap();
        assert_eq!(update.state, PreviewState::Ready);
        assert!(update.generation > 2);
        assert_eq!(store.inner.generations(), vec![update.generation]);
    }

    #[test]
    fn test_signal_supersedes_issued_tickets() {
        let session = PreviewSession::new(PreviewConfig::default()).unwrap();
        let ticket = session.begin();
        let signal = session.signal();
        assert_eq!(signal.latest(), ticket.generation());

        assert_eq!(signal.supersede(), ticket.generation() + 1);
        assert!(!ticket.is_current());

        let next = session.begin();
        assert_eq!(next.generation(), ticket.generation() + 2);
        assert!(next.is_current());
    }

    #[test]
    fn test_older_snapshot_does_not_replace_newer_preview() {
        let (mut session, store) = blob_session();
        let newer = session
            .refresh(&files(&[("/App.jsx", "export default () => <p>newer</p>;")]), 6)
            .unwrap();

        let update = session
            .refresh(&files(&[("/App.jsx", "export default () => <p>older</p>;")]), 5)
            .unwrap();
        assert_eq!(update.generation, newer.generation);
        assert_eq!(update.html, newer.html);
        assert_eq!(session.generation(), newer.generation);
        assert!(!session.needs_refresh(6));
        assert_eq!(store.generations(), vec![newer.generation]);

        let latest = session
            .refresh(&files(&[("/App.jsx", "export default () => <p>latest</p>;")]), 7)
            .unwrap();
        assert!(latest.generation > newer.generation);
    }

    #[test]
    fn test_commit_releases_previous_generation() {
        let (mut session, store) = blob_session();
        session
            .refresh(&files(&[("/App.jsx", "export default 1;")]), 1)
            .unwrap();
        session
            .refresh(&files(&[("/App.jsx", "export default 2;")]), 2)
            .unwrap();
        assert_eq!(store.generations(), vec![session.generation()]);
        assert_eq!(store.live_handles(), 1);
    }

    #[test]
    fn test_transform_failure_keeps_previous_document() {
        let mut session = PreviewSession::new(PreviewConfig::default()).unwrap();
        let good = session
            .refresh(&files(&[("/App.jsx", "export default () => <p>ok</p>;")]), 1)
            .unwrap();

        let update = session
            .refresh(&files(&[("/App.jsx", "export default () => <p>ok</p;")]), 2)
            .unwrap();
        assert!(update.kept_previous);
        assert_eq!(update.html, good.html);
        assert_eq!(update.generation, good.generation);
        assert_eq!(session.diagnostics().len(), 1);
    }

    #[test]
    fn test_entry_is_sticky_across_refreshes() {
        let mut session = PreviewSession::new(PreviewConfig::default()).unwrap();
        session
            .refresh(&files(&[("/components/Card.jsx", "export default 1;")]), 1)
            .unwrap();
        let update = session
            .refresh(
                &files(&[
                    ("/components/Card.jsx", "export default 1;"),
                    ("/App.jsx", "export default 2;"),
                ]),
                2,
            )
            .unwrap();
        assert_eq!(update.entry.unwrap().as_str(), "/components/Card.jsx");
    }

    #[test]
    fn test_theme_change_marks_dirty() {
        let mut session = PreviewSession::new(PreviewConfig::default()).unwrap();
        session.refresh(&files(&[("/App.jsx", "export default 1;")]), 1).unwrap();
        assert!(!session.needs_refresh(1));
        assert!(session.needs_refresh(2));

        assert!(session.set_theme(Theme::Dark));
        assert!(!session.set_theme(Theme::Dark));
        assert!(session.needs_refresh(1));

        let update = session.refresh(&files(&[("/App.jsx", "export default 1;")]), 1).unwrap();
        assert!(update.html.contains(r#"<html lang="en" class="dark">"#));
        assert!(!session.needs_refresh(1));
    }
}
