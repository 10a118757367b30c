//! UIGen CLI library.
//!
//! Argument definitions, command implementations and output formatters for
//! the `uigen` binary, exposed so they can be tested.

#![deny(unsafe_code)]
#![allow(clippy::unused_async)]

pub mod cli;
pub mod commands;
pub mod formatters;
