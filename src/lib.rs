//! `hvac-pricing` library crate.
//!
//! The `hvac` binary is a thin wrapper; the CLI and the TUI both drive
//! [`app::pipeline`].

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod debug;
pub mod decompose;
pub mod domain;
pub mod error;
pub mod io;
pub mod log;
pub mod math;
pub mod plot;
pub mod pricing;
pub mod report;
pub mod tui;
