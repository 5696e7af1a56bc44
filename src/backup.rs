//! Backup and restore of registered entries
//!
//! A snapshot is a point-in-time JSON copy of every managed entry:
//!
//! ```json
//! {
//!   "timestamp": "2026-01-01T12:00:00Z",
//!   "entries": [
//!     { "key": "womMyScript", "title": "My Python Action",
//!       "command": "\"python\" \"C:\\tools\\my_script.py\" \"%V\"",
//!       "icon": "C:\\Windows\\py.exe" }
//!   ]
//! }
//! ```
//!
//! Restore replays entries as stored. It is additive: keys missing from the
//! snapshot are left alone, keys present are overwritten.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{MenuError, Result};
use crate::menu::ContextMenuEntry;
use crate::store::{AddReport, EntryStore, Hive};

/// One entry as written to a backup file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub key: String,
    pub title: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl From<&ContextMenuEntry> for SnapshotEntry {
    fn from(entry: &ContextMenuEntry) -> Self {
        Self {
            key: entry.key.clone(),
            title: entry.title.clone(),
            command: entry.command.clone(),
            icon: entry.icon_path.clone(),
        }
    }
}

impl SnapshotEntry {
    pub fn to_entry(&self) -> ContextMenuEntry {
        ContextMenuEntry::from_stored(&self.key, &self.title, &self.command, self.icon.clone())
    }
}

/// Timestamped copy of the registered entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSnapshot {
    /// RFC 3339, UTC
    pub timestamp: String,
    pub entries: Vec<SnapshotEntry>,
}

impl BackupSnapshot {
    /// Build a snapshot stamped now; later duplicates of a key replace earlier ones
    pub fn new(entries: Vec<SnapshotEntry>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            entries: dedup_by_key(entries).0,
        }
    }

    /// Read and parse a snapshot file without touching the store
    pub fn read(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(MenuError::Validation(format!(
                "Backup file does not exist: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path).map_err(|source| MenuError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| MenuError::Serialization {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the snapshot as pretty JSON, replacing `path` in one step
    pub fn write(&self, path: &Path) -> Result<()> {
        let unwritable = |reason: String| {
            MenuError::Validation(format!(
                "Cannot write backup to {}: {}",
                path.display(),
                reason
            ))
        };

        if path.is_dir() {
            return Err(unwritable("destination is a directory".to_string()));
        }
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(unwritable("parent directory does not exist".to_string()));
        }

        let json =
            serde_json::to_string_pretty(self).map_err(|source| MenuError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;

        let mut temp =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| unwritable(e.to_string()))?;
        temp.write_all(json.as_bytes())
            .and_then(|_| temp.write_all(b"\n"))
            .map_err(|e| unwritable(e.to_string()))?;
        temp.persist(path).map_err(|e| unwritable(e.error.to_string()))?;

        Ok(())
    }

    fn validate(&self, source: &Path) -> Result<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.key.trim().is_empty() {
                return Err(MenuError::Validation(format!(
                    "{}: entry #{} has an empty key",
                    source.display(),
                    i + 1
                )));
            }
            if entry.key.contains(['\\', '/']) {
                return Err(MenuError::Validation(format!(
                    "{}: entry '{}' has a path separator in its key",
                    source.display(),
                    entry.key
                )));
            }
            if entry.command.trim().is_empty() {
                return Err(MenuError::Validation(format!(
                    "{}: entry '{}' has an empty command",
                    source.display(),
                    entry.key
                )));
            }
        }
        Ok(())
    }
}

/// Result of a successful backup
#[derive(Debug)]
pub struct BackupReport {
    pub path: PathBuf,
    pub entries: usize,
    /// Managed keys left out because they had no command
    pub skipped: Vec<String>,
}

/// Result of a successful restore
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub restored: Vec<(String, AddReport)>,
    /// Entries dropped because a later entry had the same key
    pub duplicates: usize,
}

impl RestoreReport {
    /// The snapshot held no entries; nothing was written
    pub fn is_empty(&self) -> bool {
        self.restored.is_empty()
    }
}

/// Snapshot every managed entry in the store
pub fn capture<H: Hive>(store: &EntryStore<H>) -> Result<(BackupSnapshot, Vec<String>)> {
    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for listed in store.list()? {
        if !listed.is_managed() {
            tracing::debug!(key = %listed.key, "Skipping entry not created by wom-menu");
            continue;
        }
        let Some(mut entry) = store.get(&listed.key)? else {
            continue;
        };
        if entry.command.trim().is_empty() {
            tracing::warn!(key = %entry.key, "Entry has no command, leaving it out of the backup");
            skipped.push(entry.key);
            continue;
        }
        if entry.title.trim().is_empty() {
            tracing::warn!(key = %entry.key, "Entry has no title, backing it up under its key");
            entry.title = entry.key.clone();
        }
        entries.push(SnapshotEntry::from(&entry));
    }

    Ok((BackupSnapshot::new(entries), skipped))
}

/// Write a snapshot of the store to `destination`
pub fn backup<H: Hive>(store: &EntryStore<H>, destination: &Path) -> Result<BackupReport> {
    let (snapshot, skipped) = capture(store)?;
    snapshot.write(destination)?;

    tracing::debug!(
        path = %destination.display(),
        entries = snapshot.entries.len(),
        "Backup written"
    );
    Ok(BackupReport {
        path: destination.to_path_buf(),
        entries: snapshot.entries.len(),
        skipped,
    })
}

/// Replay a snapshot into the store
///
/// The whole file is parsed and checked before the first write, so a
/// malformed backup never leaves a partial restore behind.
pub fn restore<H: Hive>(store: &mut EntryStore<H>, source: &Path) -> Result<RestoreReport> {
    let snapshot = BackupSnapshot::read(source)?;
    snapshot.validate(source)?;

    let (entries, duplicates) = dedup_by_key(snapshot.entries);
    if duplicates > 0 {
        tracing::warn!(duplicates, "Backup repeats keys, keeping the last of each");
    }

    let mut report = RestoreReport {
        restored: Vec::with_capacity(entries.len()),
        duplicates,
    };
    for snapshot_entry in &entries {
        let entry = snapshot_entry.to_entry();
        match store.add(&entry) {
            Ok(added) => report.restored.push((entry.key, added)),
            Err(err) => {
                tracing::warn!(
                    restored = report.restored.len(),
                    remaining = entries.len() - report.restored.len(),
                    "Restore stopped early"
                );
                return Err(err);
            }
        }
    }

    Ok(report)
}

/// Keep the last entry for each key, in first-seen order
fn dedup_by_key(entries: Vec<SnapshotEntry>) -> (Vec<SnapshotEntry>, usize) {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<SnapshotEntry> = Vec::with_capacity(entries.len());
    let mut duplicates = 0;

    for entry in entries {
        match index.get(&entry.key) {
            Some(&i) => {
                unique[i] = entry;
                duplicates += 1;
            }
            None => {
                index.insert(entry.key.clone(), unique.len());
                unique.push(entry);
            }
        }
    }

    (unique, duplicates)
}
