//! CSV export of the priority queue.

use crate::records::PriorityEntry;

pub const CSV_HEADER: &str = "id,level,waitTime";

/// Standard CSV quoting: every data field is quoted, internal quotes doubled.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render the priority list with columns id, level, waitTime. Row order
/// follows the list (newest first).
pub fn priority_csv(entries: &[PriorityEntry]) -> String {
    let mut out = String::from(CSV_HEADER);
    for entry in entries {
        out.push('\n');
        out.push_str(&csv_field(entry.id.as_str()));
        out.push(',');
        out.push_str(&csv_field(&entry.level.to_string()));
        out.push(',');
        out.push_str(&csv_field(&entry.wait.to_string()));
    }
    out.push('\n');
    out
}
