//! Alias-table generator pipeline.
//!
//! One-shot batch tool: fetch the vendor's schema document, extract
//! (alias, wire key) pairs, and emit the sorted static table compiled into
//! the shell. Network and parse failures are terminal for a generator run;
//! no partial artifact is ever written.

mod emit;
mod fetch;
mod parse;

pub use emit::emit_table;
pub use fetch::fetch_schema;
pub use parse::{parse_schema, AliasTable};
