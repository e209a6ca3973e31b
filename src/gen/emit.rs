//! Artifact emission.

use super::parse::AliasTable;

const HEADER: &str =
    "// @generated by wattshell-gen. Do not edit by hand.\npub static PROPERTY_MAP: &[(&str, &str)] = &[\n";
const FOOTER: &str = "];\n";

/// Render the table as Rust source for `src/mapping/table.rs`.
///
/// Output is byte-identical for identical input tables: the `BTreeMap`
/// iterates in ascending alias order and the header/footer are fixed.
pub fn emit_table(table: &AliasTable) -> String {
    let mut out = String::with_capacity(HEADER.len() + FOOTER.len() + table.len() * 32);
    out.push_str(HEADER);
    for (alias, key) in table {
        out.push_str(&format!("    ({alias:?}, {key:?}),\n"));
    }
    out.push_str(FOOTER);
    out
}
