//! flexloop: demo front-end for the `flexloop-tui` runtime
//!
//! The binary wires command-line flags and configuration discovery to a small
//! counter application that runs in full-screen or inline mode.

pub mod cli;
pub mod demo;

pub use cli::Args;
pub use demo::{Counter, Message};
