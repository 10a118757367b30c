//! CLI argument definitions and parsing.
//!
//! Defines the command-line interface structure using clap:
//! - `Cli` - Main CLI entry point
//! - `Commands` - Available subcommands

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// UIGen - build React components in a virtual file system and preview them.
///
/// A project is a single JSON file holding the whole file tree. Commands
/// load it, run tool calls or the preview against it, and write it back.
#[derive(Parser, Debug)]
#[command(name = "uigen")]
#[command(version, about, long_about = None)]
#[command(author = "UIGen Team")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    pub format: String,

    /// Preview configuration file (default: <config dir>/uigen/config.toml)
    #[arg(long, global = true, env = "UIGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a project file from a starter.
    ///
    /// # Examples
    ///
    /// ```bash
    /// uigen init project.json --starter card
    /// ```
    Init {
        /// Project file to create
        project: PathBuf,

        /// Starter to seed the project with (blank, counter, card, contact-form)
        #[arg(short, long, default_value = "counter")]
        starter: String,

        /// Overwrite an existing project file
        #[arg(short, long)]
        force: bool,
    },

    /// Apply tool calls to a project.
    ///
    /// Reads calls as a JSON array or one `{"name", "arguments"}` object
    /// per line, from a file or from stdin.
    ///
    /// # Examples
    ///
    /// ```bash
    /// echo '{"name": "file_manager", "arguments": {"command": "delete", "path": "/old.jsx"}}' \
    ///     | uigen apply project.json
    /// ```
    Apply {
        /// Project file to edit
        project: PathBuf,

        /// File holding the calls (default: stdin)
        #[arg(short, long)]
        calls: Option<PathBuf>,
    },

    /// Show a file with line numbers, or list a directory.
    View {
        /// Project file to read
        project: PathBuf,

        /// Path inside the project
        #[arg(default_value = "/")]
        path: String,

        /// First line to show (1-based)
        #[arg(long)]
        start: Option<i64>,

        /// Last line to show; -1 means end of file
        #[arg(long, requires = "start", allow_negative_numbers = true)]
        end: Option<i64>,
    },

    /// Render the live preview document.
    ///
    /// Exits with code 4 when the project has problems; the document is
    /// written either way.
    ///
    /// # Examples
    ///
    /// ```bash
    /// uigen preview project.json --dark -o preview.html
    /// ```
    Preview {
        /// Project file to render
        project: PathBuf,

        /// Where to write the HTML (default: the project path with .html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render with the dark theme
        #[arg(long)]
        dark: bool,
    },

    /// Write the project tree to a directory on disk.
    Export {
        /// Project file to export
        project: PathBuf,

        /// Target directory; created if missing
        dir: PathBuf,

        /// Keep files that already exist in the target directory
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Print the JSON schemas of the editing tools.
    Schema,

    /// Generate shell completions.
    ///
    /// Generates completion scripts for various shells that can be
    /// sourced or saved to enable tab completion for this CLI.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}
