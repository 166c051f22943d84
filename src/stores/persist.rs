//! Optional JSON snapshot of the list stores, used only to survive a reload.
//!
//! The snapshot is a cache, not a source of truth: an absent or corrupt file
//! degrades silently to the empty default and is never an error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pipeline::state::View;
use crate::records::{CallRecord, PriorityEntry};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub priority: Vec<PriorityEntry>,
    pub calls: Vec<CallRecord>,
    pub view: View,
}

impl Snapshot {
    pub fn load(path: &Path) -> Self {
        let Ok(raw) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot unreadable, starting empty");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, json)
    }
}
