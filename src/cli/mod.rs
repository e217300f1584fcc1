//! Command line interface

pub mod commands;
pub mod display;
pub mod vortex;

pub use commands::CliArgs;
