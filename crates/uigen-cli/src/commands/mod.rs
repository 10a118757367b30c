//! Command implementations for the UIGen CLI.
//!
//! Each command loads what it needs, does its work, and prints a report in
//! the requested format. Project loading and saving live in [`common`].

pub mod apply;
pub mod common;
pub mod completions;
pub mod export;
pub mod init;
pub mod preview;
pub mod schema;
pub mod view;
