//! Quill CLI library
//!
//! Argument definitions and command implementations behind the `quill` binary.

pub mod cli;
pub mod commands;
