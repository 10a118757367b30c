//! The `file_manager` tool.
//!
//! Renames and deletes files and directories. Failures report a generic
//! message naming the paths involved; the underlying cause is logged.

use crate::types::{FileManagerCommand, FileManagerParams, FileManagerResult};
use tracing::debug;
use uigen_files::VirtualFileSystem;

/// File manager tool bound to one file system.
///
/// # Examples
///
/// ```
/// use uigen_files::VirtualFileSystem;
/// use uigen_tools::{FileManagerParams, FileManagerTool};
///
/// let mut vfs = VirtualFileSystem::new();
/// vfs.create_file("/old.jsx", "x").unwrap();
///
/// let result = FileManagerTool::new(&mut vfs).execute(&FileManagerParams::rename("/old.jsx", "/new.jsx"));
/// assert!(result.success);
/// assert_eq!(vfs.read_file("/new.jsx"), Some("x"));
/// ```
#[derive(Debug)]
pub struct FileManagerTool<'a> {
    vfs: &'a mut VirtualFileSystem,
}

impl<'a> FileManagerTool<'a> {
    /// Tool identifier agents call.
    pub const ID: &'static str = "file_manager";

    /// Tool description shown to agents.
    pub const DESCRIPTION: &'static str = "Rename or delete files and directories in the \
        project's virtual file system. Renaming a directory moves everything inside it; \
        deleting a directory removes it recursively.";

    /// Binds the tool to a file system.
    pub fn new(vfs: &'a mut VirtualFileSystem) -> Self {
        Self { vfs }
    }

    /// Runs one command.
    pub fn execute(&mut self, params: &FileManagerParams) -> FileManagerResult {
        debug!(command = %params.command, path = %params.path, "file manager call");
        match params.command {
            FileManagerCommand::Rename => self.rename(&params.path, params.new_path.as_deref()),
            FileManagerCommand::Delete => self.delete(&params.path),
            FileManagerCommand::Unknown => FileManagerResult::failure("Invalid command"),
        }
    }

    fn rename(&mut self, path: &str, new_path: Option<&str>) -> FileManagerResult {
        let Some(new_path) = new_path else {
            return FileManagerResult::failure("new_path is required for rename command");
        };
        match self.vfs.rename(path, new_path) {
            Ok(()) => {
                FileManagerResult::success(format!("Successfully renamed {path} to {new_path}"))
            }
            Err(err) => {
                debug!(error = %err, "rename rejected");
                FileManagerResult::failure(format!("Failed to rename {path} to {new_path}"))
            }
        }
    }

    fn delete(&mut self, path: &str) -> FileManagerResult {
        match self.vfs.delete(path) {
            Ok(()) => FileManagerResult::success(format!("Successfully deleted {path}")),
            Err(err) => {
                debug!(error = %err, "delete rejected");
                FileManagerResult::failure(format!("Failed to delete {path}"))
            }
        }
    }
}
