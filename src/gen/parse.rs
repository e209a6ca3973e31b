//! Schema document parsing.

use std::collections::BTreeMap;

use serde_yaml::Value;
use tracing::warn;

use crate::error::{Result, WshError};

/// Alias → wire-key table.
///
/// A `BTreeMap` so iteration (and therefore the emitted artifact) is
/// always in ascending alias order, independent of document order.
pub type AliasTable = BTreeMap<String, String>;

/// Decode a schema document and fold its `properties` sequence into an
/// [`AliasTable`].
///
/// Entries missing `key` or `alias`, or whose value is blank or not a
/// string, are skipped; the schema carries plenty of bookkeeping entries
/// that have no operator-facing alias. A repeated alias overwrites the
/// earlier occurrence (document order), with a non-fatal warning so schema
/// authoring mistakes stay visible.
pub fn parse_schema(bytes: &[u8]) -> Result<AliasTable> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| WshError::Parse(format!("schema is not valid UTF-8: {e}")))?;
    if text.trim().is_empty() {
        return Err(WshError::Parse("schema document is empty".to_string()));
    }

    let doc: Value =
        serde_yaml::from_str(text).map_err(|e| WshError::Parse(format!("invalid YAML: {e}")))?;

    let properties = doc
        .get("properties")
        .and_then(Value::as_sequence)
        .ok_or_else(|| WshError::Parse("schema has no `properties` sequence".to_string()))?;

    let mut table = AliasTable::new();
    for entry in properties {
        let key = entry.get("key").and_then(Value::as_str).unwrap_or("");
        let alias = entry.get("alias").and_then(Value::as_str).unwrap_or("");
        if key.is_empty() || alias.is_empty() {
            continue;
        }
        if let Some(previous) = table.insert(alias.to_string(), key.to_string()) {
            if previous != key {
                warn!(%alias, %previous, %key, "duplicate alias, later wire key wins");
            }
        }
    }

    Ok(table)
}
