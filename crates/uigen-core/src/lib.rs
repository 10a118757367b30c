//! Core types, configuration, and errors for the UIGen live preview.
//!
//! This crate provides the foundational types shared by every other crate in
//! the workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - The preview [`Theme`] passed explicitly into document assembly
//! - [`PreviewConfig`], the TOML-loadable pipeline configuration
//! - An error hierarchy with contextual information
//! - CLI output helpers shared by the binaries

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod types;

pub mod cli;

pub use config::{PreviewConfig, RuntimeLibrary};
pub use error::{Error, Result};
pub use types::Theme;
