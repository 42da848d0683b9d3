//! groundgen CLI library.
//!
//! This crate provides the command implementations behind the `groundgen`
//! binary and its logging setup.

pub mod commands;
pub mod logging;
