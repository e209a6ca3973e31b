//! Wattshell library - interactive control of network-attached EV charging controllers.
//!
//! This library exposes the core functionality of the `wattshell` binaries
//! for use in tests and potentially other applications.
//!
//! # Modules
//!
//! - `device`: Session abstraction over the charging controller
//! - `error`: Error types shared by the shell and the generator
//! - `gen`: Alias-table generator pipeline (fetch, parse, emit)
//! - `mapping`: Generated alias → wire-key table
//! - `shell`: Interactive command dispatch loop
//! - `export`: CSV snapshot export
#![forbid(unsafe_code)]

pub mod cli;
pub mod device;
pub mod error;
pub mod export;
pub mod gen;
pub mod logging;
pub mod mapping;
pub mod shell;
