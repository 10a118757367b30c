//! The `str_replace_editor` tool.
//!
//! Translates text-editor commands into file system operations. Every
//! outcome, failures included, is a plain string meant for the agent; the
//! tool never returns an error or panics across its boundary.
//!
//! # Examples
//!
//! ```
//! use uigen_files::VirtualFileSystem;
//! use uigen_tools::{TextEditorParams, TextEditorTool};
//!
//! let mut vfs = VirtualFileSystem::new();
//! let mut tool = TextEditorTool::new(&mut vfs);
//!
//! let out = tool.execute(&TextEditorParams::create("/App.jsx", "one\ntwo"));
//! assert_eq!(out, "File created: /App.jsx");
//!
//! let out = tool.execute(&TextEditorParams::view("/App.jsx"));
//! assert_eq!(out, "     1\tone\n     2\ttwo");
//! ```

use crate::types::{TextEditorCommand, TextEditorParams};
use std::fmt::Write;
use tracing::debug;
use uigen_files::{FilePath, FilesError, NodeKind, VirtualFileSystem};

/// Text editor tool bound to one file system.
#[derive(Debug)]
pub struct TextEditorTool<'a> {
    vfs: &'a mut VirtualFileSystem,
}

impl<'a> TextEditorTool<'a> {
    /// Tool identifier agents call.
    pub const ID: &'static str = "str_replace_editor";

    /// Tool description shown to agents.
    pub const DESCRIPTION: &'static str = "View, create and edit files in the project's virtual \
        file system. `view` shows a file with line numbers or lists a directory; `create` writes \
        a new file; `str_replace` replaces one unique occurrence of `old_str`; `insert` adds \
        `new_str` after line `insert_line` (0 for the top).";

    /// Binds the tool to a file system.
    pub fn new(vfs: &'a mut VirtualFileSystem) -> Self {
        Self { vfs }
    }

    /// Runs one command and describes the outcome.
    pub fn execute(&mut self, params: &TextEditorParams) -> String {
        debug!(command = %params.command, path = %params.path, "text editor call");
        let outcome = match params.command {
            TextEditorCommand::View => self.view(params),
            TextEditorCommand::Create => self.create(params),
            TextEditorCommand::StrReplace => self.str_replace(params),
            TextEditorCommand::Insert => self.insert(params),
            TextEditorCommand::UndoEdit => Err(
                "undo_edit command is not supported in this version. Use str_replace to revert changes."
                    .to_string(),
            ),
            TextEditorCommand::Unknown => Err("Invalid command".to_string()),
        };
        outcome.unwrap_or_else(|message| format!("Error: {message}"))
    }

    fn view(&self, params: &TextEditorParams) -> Result<String, String> {
        let path = normalize(&params.path)?;
        let node = self
            .vfs
            .node(path.as_str())
            .ok_or_else(|| format!("File not found: {path}"))?;

        if node.is_directory() {
            let entries = self.vfs.list_directory(path.as_str()).map_err(describe)?;
            if entries.is_empty() {
                return Ok(format!("Directory {path} is empty"));
            }
            return Ok(entries
                .iter()
                .map(|entry| match entry.kind {
                    NodeKind::Directory => format!("[DIR] {}", entry.name),
                    NodeKind::File => format!("[FILE] {}", entry.name),
                })
                .collect::<Vec<_>>()
                .join("\n"));
        }

        let lines: Vec<&str> = node.content().split('\n').collect();
        let (start, end) = match &params.view_range {
            None => (1, lines.len()),
            Some(range) => line_range(range, lines.len(), &path)?,
        };

        let mut out = String::new();
        for (index, line) in lines.iter().enumerate().take(end).skip(start - 1) {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = write!(out, "{:>6}\t{line}", index + 1);
        }
        Ok(out)
    }

    fn create(&mut self, params: &TextEditorParams) -> Result<String, String> {
        let path = normalize(&params.path)?;
        let text = params.file_text.clone().unwrap_or_default();
        self.vfs
            .create_file(path.as_str(), text)
            .map_err(describe)?;
        Ok(format!("File created: {path}"))
    }

    fn str_replace(&mut self, params: &TextEditorParams) -> Result<String, String> {
        let path = normalize(&params.path)?;
        let old = params
            .old_str
            .as_deref()
            .ok_or_else(|| "old_str is required for str_replace command".to_string())?;
        if old.is_empty() {
            return Err("old_str must not be empty".to_string());
        }
        let new = params.new_str.as_deref().unwrap_or_default();
        let content = read(self.vfs, &path)?;

        match content.matches(old).count() {
            0 => Err(format!("old_str not found in {path}")),
            1 => {
                let updated = content.replacen(old, new, 1);
                self.vfs
                    .update_file(path.as_str(), updated)
                    .map_err(describe)?;
                Ok(format!("Replaced 1 occurrence in {path}"))
            }
            n => Err(format!(
                "Found {n} occurrences of old_str in {path}. Provide more surrounding context so the match is unique."
            )),
        }
    }

    fn insert(&mut self, params: &TextEditorParams) -> Result<String, String> {
        let path = normalize(&params.path)?;
        let line = params.insert_line.unwrap_or(0);
        let text = params.new_str.as_deref().unwrap_or_default();
        let content = read(self.vfs, &path)?;

        let mut lines: Vec<&str> = content.split('\n').collect();
        if line > lines.len() {
            return Err(format!(
                "insert_line {line} is beyond the end of {path} ({} lines)",
                lines.len()
            ));
        }
        lines.insert(line, text);
        let updated = lines.join("\n");
        self.vfs
            .update_file(path.as_str(), updated)
            .map_err(describe)?;
        Ok(format!("Text inserted at line {line} in {path}"))
    }
}

fn normalize(raw: &str) -> Result<FilePath, String> {
    FilePath::new(raw).map_err(describe)
}

fn read(vfs: &VirtualFileSystem, path: &FilePath) -> Result<String, String> {
    match vfs.node(path.as_str()) {
        Some(node) if node.is_file() => Ok(node.content().to_string()),
        Some(_) => Err(format!("Not a file: {path}")),
        None => Err(format!("File not found: {path}")),
    }
}

fn describe(err: FilesError) -> String {
    err.to_string()
}

/// Validates a `[start, end]` range against a file of `total` lines.
fn line_range(range: &[i64], total: usize, path: &FilePath) -> Result<(usize, usize), String> {
    let [start, end] = range else {
        return Err("view_range must contain exactly two numbers: [start, end]".to_string());
    };
    let in_file = |n: i64| usize::try_from(n).ok().filter(|&n| n >= 1 && n <= total);

    let start =
        in_file(*start).ok_or_else(|| format!("Line {start} not found in {path} ({total} lines)"))?;
    let end = if *end == -1 {
        total
    } else {
        in_file(*end).ok_or_else(|| format!("Line {end} not found in {path} ({total} lines)"))?
    };
    if end < start {
        return Err(format!(
            "Invalid view_range [{start}, {end}]: end must be -1 or not before start"
        ));
    }
    Ok((start, end))
}
