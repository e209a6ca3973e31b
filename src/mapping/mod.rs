//! Static alias → wire-key mapping for controller properties.
//!
//! The table itself lives in `table.rs`, which is produced by the
//! `wattshell-gen` binary from the vendor's schema document and checked in.
//! Entries are sorted ascending by alias, so lookup is a binary search and
//! re-generation from identical input is byte-identical.

mod table;

pub use table::PROPERTY_MAP;

/// Resolve a property alias to its wire key.
pub fn wire_key(alias: &str) -> Option<&'static str> {
    PROPERTY_MAP
        .binary_search_by(|(a, _)| (*a).cmp(alias))
        .ok()
        .map(|idx| PROPERTY_MAP[idx].1)
}

/// Reverse lookup: the alias published for a wire key, if any.
pub fn alias_for(key: &str) -> Option<&'static str> {
    PROPERTY_MAP
        .iter()
        .find(|(_, k)| *k == key)
        .map(|(alias, _)| *alias)
}

/// All known property aliases, in ascending order.
pub fn aliases() -> impl Iterator<Item = &'static str> {
    PROPERTY_MAP.iter().map(|(alias, _)| *alias)
}
