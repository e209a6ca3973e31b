//! CSV snapshot export for the `dump` command.
//!
//! Each invocation appends one data row; the header row is written only
//! when the target file does not exist yet, so repeated dumps across
//! process runs accumulate into one continuous table.

use std::fs::OpenOptions;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::device::DeviceSession;
use crate::error::Result;

/// Default dump target when the operator gives no path.
pub const DEFAULT_DUMP_PATH: &str = "./wattshell-data.csv";

/// Internal liveness counter the controller publishes for session
/// bookkeeping; it is not a measurement, so it stays out of dumps.
const EXCLUDED_ALIAS: &str = "heartbeat";

/// Append the current property snapshot as one CSV row.
pub async fn dump_csv(session: &dyn DeviceSession, path: &Path) -> Result<()> {
    let mut columns = session.properties();
    columns.retain(|alias| alias != EXCLUDED_ALIAS);
    columns.sort();

    let write_header = !path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = csv::Writer::from_writer(file);

    if write_header {
        debug!(path = %path.display(), "new dump target, writing header");
        writer.write_record(&columns)?;
    }

    let mut row = Vec::with_capacity(columns.len());
    for alias in &columns {
        let value = session
            .get_property(alias)
            .await
            .unwrap_or(Value::Null);
        row.push(render(&value));
    }
    writer.write_record(&row)?;
    writer.flush()?;
    Ok(())
}

/// Render a property value as a bare CSV cell (strings unquoted,
/// null as empty).
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_cells() {
        assert_eq!(render(&json!("ready")), "ready");
        assert_eq!(render(&json!(16)), "16");
        assert_eq!(render(&json!(50.5)), "50.5");
        assert_eq!(render(&json!(true)), "true");
        assert_eq!(render(&Value::Null), "");
    }
}
