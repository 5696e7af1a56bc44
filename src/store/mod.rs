//! Context-menu entry store
//!
//! Every logical entry lives in two sibling scopes under the classes root:
//!
//! ```text
//! Software\Classes\Directory\shell\<key>              (default) = title, Icon
//! Software\Classes\Directory\shell\<key>\command      (default) = command
//! Software\Classes\Directory\Background\shell\<key>   same layout
//! ```
//!
//! Both scopes are written, overwritten, and removed together.

pub mod hive;
pub mod memory;
#[cfg(windows)]
pub mod registry;

use std::collections::BTreeMap;
use std::fmt;

use crate::config::{BACKGROUND_SCOPE_KEY, FILE_SCOPE_KEY};
use crate::error::{MenuError, Result};
use crate::menu::key_name;
use crate::menu::ContextMenuEntry;

pub use hive::{Hive, RootScope};
pub use memory::MemoryHive;

const ICON_VALUE: &str = "Icon";
const COMMAND_SUBKEY: &str = "command";

/// One of the two locations an entry is mirrored into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Right-click on a folder
    File,
    /// Right-click on the empty area inside a folder
    Background,
}

impl Scope {
    pub const ALL: [Scope; 2] = [Scope::File, Scope::Background];

    pub fn root_key(self) -> &'static str {
        match self {
            Self::File => FILE_SCOPE_KEY,
            Self::Background => BACKGROUND_SCOPE_KEY,
        }
    }

    fn entry_path(self, key: &str) -> String {
        format!(r"{}\{}", self.root_key(), key)
    }

    fn command_path(self, key: &str) -> String {
        format!(r"{}\{}\{}", self.root_key(), key, COMMAND_SUBKEY)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Background => write!(f, "background"),
        }
    }
}

/// Values persisted for one key in one scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ScopeRecord {
    title: Option<String>,
    icon: Option<String>,
    command: Option<String>,
}

/// What `add` did in one scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Created,
    Overwritten,
}

/// Per-scope outcome of a successful `add`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddReport {
    pub file: WriteStatus,
    pub background: WriteStatus,
}

impl AddReport {
    /// True when the key existed in neither scope before
    pub fn is_new(&self) -> bool {
        self.file == WriteStatus::Created && self.background == WriteStatus::Created
    }
}

/// Per-scope outcome of `remove`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveStatus {
    pub file: bool,
    pub background: bool,
}

impl RemoveStatus {
    pub fn is_not_found(&self) -> bool {
        !self.file && !self.background
    }
}

/// An entry as found while enumerating the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub key: String,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub command: Option<String>,
    pub in_file: bool,
    pub in_background: bool,
}

impl ListedEntry {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            title: None,
            icon: None,
            command: None,
            in_file: false,
            in_background: false,
        }
    }

    /// No title in either scope
    pub fn is_unlabeled(&self) -> bool {
        self.title.as_deref().map_or(true, |t| t.trim().is_empty())
    }

    /// Key follows our naming scheme
    pub fn is_managed(&self) -> bool {
        key_name::is_valid_key(&self.key)
    }

    /// Present in both scopes
    pub fn is_complete(&self) -> bool {
        self.in_file && self.in_background
    }

    pub fn scopes_label(&self) -> &'static str {
        match (self.in_file, self.in_background) {
            (true, true) => "file+background",
            (true, false) => "file",
            (false, true) => "background",
            (false, false) => "-",
        }
    }

    fn merge(&mut self, scope: Scope, record: ScopeRecord) {
        match scope {
            Scope::File => self.in_file = true,
            Scope::Background => self.in_background = true,
        }
        // File scope is read first and wins
        if self.is_unlabeled() {
            self.title = record.title;
        }
        self.icon = self.icon.take().or(record.icon);
        self.command = self.command.take().or(record.command);
    }
}

/// CRUD over a [`Hive`], mirroring every entry into both scopes
pub struct EntryStore<H: Hive> {
    hive: H,
}

impl<H: Hive> EntryStore<H> {
    pub fn new(hive: H) -> Self {
        Self { hive }
    }

    pub fn root(&self) -> RootScope {
        self.hive.root()
    }

    pub fn hive(&self) -> &H {
        &self.hive
    }

    pub fn hive_mut(&mut self) -> &mut H {
        &mut self.hive
    }

    /// Write an entry into both scopes, overwriting any same-key entry
    ///
    /// If any write fails, both scopes are returned to their prior state
    /// before the error is reported.
    pub fn add(&mut self, entry: &ContextMenuEntry) -> Result<AddReport> {
        check_key(&entry.key)?;

        let mut prior = Vec::with_capacity(Scope::ALL.len());
        for scope in Scope::ALL {
            let record = self
                .read_scope(scope, &entry.key)
                .map_err(|e| MenuError::store(scope, &entry.key, e))?;
            prior.push((scope, record));
        }

        for (i, scope) in Scope::ALL.into_iter().enumerate() {
            if let Err(err) = self.write_scope(scope, entry) {
                tracing::warn!(
                    key = %entry.key,
                    scope = %scope,
                    error = %err,
                    "Write failed, rolling back"
                );
                self.rollback(&entry.key, &prior[..=i]);
                return Err(MenuError::store(scope, &entry.key, err));
            }
            tracing::debug!(key = %entry.key, scope = %scope, "Wrote entry");
        }

        let status = |record: &Option<ScopeRecord>| match record {
            Some(_) => WriteStatus::Overwritten,
            None => WriteStatus::Created,
        };
        Ok(AddReport {
            file: status(&prior[0].1),
            background: status(&prior[1].1),
        })
    }

    /// All immediate children of both scopes, merged by key and sorted
    pub fn list(&self) -> Result<Vec<ListedEntry>> {
        let mut entries: BTreeMap<String, ListedEntry> = BTreeMap::new();

        for scope in Scope::ALL {
            let keys = self
                .hive
                .subkeys(scope.root_key())
                .map_err(|e| MenuError::store(scope, "enumerating entries", e))?;

            for key in keys {
                let record = self
                    .read_scope(scope, &key)
                    .map_err(|e| MenuError::store(scope, &key, e))?
                    .unwrap_or_default();
                entries
                    .entry(key.clone())
                    .or_insert_with(|| ListedEntry::new(&key))
                    .merge(scope, record);
            }
        }

        Ok(entries.into_values().collect())
    }

    /// Full detail for one key, `None` when it is in neither scope
    pub fn get(&self, key: &str) -> Result<Option<ContextMenuEntry>> {
        let mut found = ListedEntry::new(key);
        let mut exists = false;

        for scope in Scope::ALL {
            if let Some(record) = self
                .read_scope(scope, key)
                .map_err(|e| MenuError::store(scope, key, e))?
            {
                exists = true;
                found.merge(scope, record);
            }
        }

        if !exists {
            return Ok(None);
        }
        Ok(Some(ContextMenuEntry::from_stored(
            key,
            found.title.as_deref().unwrap_or_default(),
            found.command.as_deref().unwrap_or_default(),
            found.icon,
        )))
    }

    /// Delete a key from both scopes; absent keys are reported, not errors
    ///
    /// If a delete fails, scopes already deleted are written back before the
    /// error is reported.
    pub fn remove(&mut self, key: &str) -> Result<RemoveStatus> {
        check_key(key)?;

        let mut prior = Vec::with_capacity(Scope::ALL.len());
        for scope in Scope::ALL {
            let record = self
                .read_scope(scope, key)
                .map_err(|e| MenuError::store(scope, key, e))?;
            prior.push((scope, record));
        }

        let mut removed = [false; 2];
        for (i, scope) in Scope::ALL.into_iter().enumerate() {
            match self.hive.delete_tree(&scope.entry_path(key)) {
                Ok(existed) => removed[i] = existed,
                Err(err) => {
                    tracing::warn!(
                        key,
                        scope = %scope,
                        error = %err,
                        "Delete failed, rolling back"
                    );
                    self.rollback(key, &prior[..i]);
                    return Err(MenuError::store(scope, key, err));
                }
            }
        }

        let status = RemoveStatus {
            file: removed[0],
            background: removed[1],
        };
        tracing::debug!(key, ?status, "Removed entry");
        Ok(status)
    }

    fn read_scope(&self, scope: Scope, key: &str) -> std::io::Result<Option<ScopeRecord>> {
        let path = scope.entry_path(key);
        if !self.hive.key_exists(&path)? {
            return Ok(None);
        }
        Ok(Some(ScopeRecord {
            title: self.hive.get_value(&path, "")?,
            icon: self.hive.get_value(&path, ICON_VALUE)?,
            command: self.hive.get_value(&scope.command_path(key), "")?,
        }))
    }

    fn write_scope(&mut self, scope: Scope, entry: &ContextMenuEntry) -> std::io::Result<()> {
        let record = ScopeRecord {
            title: Some(entry.title.clone()),
            icon: entry.icon_path.clone(),
            command: Some(entry.command.clone()),
        };
        self.write_record(scope, &entry.key, &record)
    }

    fn write_record(
        &mut self,
        scope: Scope,
        key: &str,
        record: &ScopeRecord,
    ) -> std::io::Result<()> {
        let path = scope.entry_path(key);
        match &record.title {
            Some(title) => self.hive.set_value(&path, "", title)?,
            None => {
                // Creates the key, then leaves it without a default value
                self.hive.set_value(&path, "", "")?;
                self.hive.delete_value(&path, "")?;
            }
        }
        match &record.icon {
            Some(icon) => self.hive.set_value(&path, ICON_VALUE, icon)?,
            None => self.hive.delete_value(&path, ICON_VALUE)?,
        }
        match &record.command {
            Some(command) => self.hive.set_value(&scope.command_path(key), "", command),
            None => self.hive.delete_value(&scope.command_path(key), ""),
        }
    }

    /// Put every touched scope back the way it was before `add` or `remove`
    fn rollback(&mut self, key: &str, touched: &[(Scope, Option<ScopeRecord>)]) {
        for (scope, prior) in touched {
            let result = match prior {
                Some(record) => self.write_record(*scope, key, record),
                None => self.hive.delete_tree(&scope.entry_path(key)).map(|_| ()),
            };
            if let Err(err) = result {
                tracing::error!(key, scope = %scope, error = %err, "Rollback failed");
            }
        }
    }
}

/// Keys become registry key names and must not nest
fn check_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(MenuError::Validation("entry key is empty".to_string()));
    }
    if key.contains(['\\', '/']) {
        return Err(MenuError::Validation(format!(
            "entry key must not contain path separators: {}",
            key
        )));
    }
    Ok(())
}
