//! In-memory hive for tests and previews

use std::collections::BTreeMap;
use std::io;

use super::hive::{Hive, RootScope};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct KeyNode {
    /// Path as first created, keys compare case-insensitively
    path: String,
    values: BTreeMap<String, String>,
}

/// Registry lookalike backed by a map
///
/// Key paths are case-insensitive like the real registry. Writes under a
/// denied prefix fail with `PermissionDenied` so callers can exercise their
/// failure paths.
#[derive(Debug, Clone)]
pub struct MemoryHive {
    root: RootScope,
    keys: BTreeMap<String, KeyNode>,
    denied: Vec<String>,
}

impl Default for MemoryHive {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHive {
    pub fn new() -> Self {
        Self::with_root(RootScope::CurrentUser)
    }

    pub fn with_root(root: RootScope) -> Self {
        Self {
            root,
            keys: BTreeMap::new(),
            denied: Vec::new(),
        }
    }

    /// Make every write at or below `prefix` fail
    pub fn deny_writes_under(&mut self, prefix: &str) {
        self.denied.push(normalize(prefix));
    }

    pub fn allow_all_writes(&mut self) {
        self.denied.clear();
    }

    fn check_writable(&self, path: &str) -> io::Result<()> {
        let path = normalize(path);
        if self.denied.iter().any(|d| is_at_or_below(&path, d)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("access denied: {}", path),
            ));
        }
        Ok(())
    }

    fn create_key(&mut self, path: &str) -> &mut KeyNode {
        let mut prefix = String::new();
        for part in path.split('\\').filter(|p| !p.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('\\');
            }
            prefix.push_str(part);
            self.keys
                .entry(normalize(&prefix))
                .or_insert_with(|| KeyNode {
                    path: prefix.clone(),
                    values: BTreeMap::new(),
                });
        }
        self.keys.entry(normalize(path)).or_insert_with(|| KeyNode {
            path: path.to_string(),
            values: BTreeMap::new(),
        })
    }
}

fn normalize(path: &str) -> String {
    path.trim_matches('\\').to_lowercase()
}

fn is_at_or_below(path: &str, ancestor: &str) -> bool {
    path == ancestor
        || (path.starts_with(ancestor) && path[ancestor.len()..].starts_with('\\'))
}

impl Hive for MemoryHive {
    fn root(&self) -> RootScope {
        self.root
    }

    fn subkeys(&self, path: &str) -> io::Result<Vec<String>> {
        let parent = normalize(path);
        Ok(self
            .keys
            .iter()
            .filter(|(k, _)| {
                k.strip_prefix(&parent)
                    .and_then(|rest| rest.strip_prefix('\\'))
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('\\'))
            })
            .filter_map(|(_, node)| node.path.rsplit('\\').next().map(str::to_string))
            .collect())
    }

    fn key_exists(&self, path: &str) -> io::Result<bool> {
        Ok(self.keys.contains_key(&normalize(path)))
    }

    fn get_value(&self, path: &str, name: &str) -> io::Result<Option<String>> {
        Ok(self
            .keys
            .get(&normalize(path))
            .and_then(|node| node.values.get(name).cloned()))
    }

    fn set_value(&mut self, path: &str, name: &str, value: &str) -> io::Result<()> {
        self.check_writable(path)?;
        self.create_key(path)
            .values
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete_value(&mut self, path: &str, name: &str) -> io::Result<()> {
        self.check_writable(path)?;
        if let Some(node) = self.keys.get_mut(&normalize(path)) {
            node.values.remove(name);
        }
        Ok(())
    }

    fn delete_tree(&mut self, path: &str) -> io::Result<bool> {
        self.check_writable(path)?;
        let target = normalize(path);
        let before = self.keys.len();
        self.keys.retain(|k, _| !is_at_or_below(k, &target));
        Ok(self.keys.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_creates_parents() {
        let mut hive = MemoryHive::new();
        hive.set_value(r"A\B\C", "", "leaf").unwrap();

        assert!(hive.key_exists("A").unwrap());
        assert!(hive.key_exists(r"A\B").unwrap());
        assert_eq!(hive.get_value(r"A\B\C", "").unwrap(), Some("leaf".to_string()));
        assert_eq!(hive.get_value(r"A\B", "").unwrap(), None);
    }

    #[test]
    fn test_subkeys_are_immediate_children() {
        let mut hive = MemoryHive::new();
        hive.set_value(r"Root\one", "", "1").unwrap();
        hive.set_value(r"Root\two\command", "", "2").unwrap();
        hive.set_value(r"Rootless\three", "", "3").unwrap();

        let mut children = hive.subkeys("Root").unwrap();
        children.sort();
        assert_eq!(children, vec!["one".to_string(), "two".to_string()]);
        assert!(hive.subkeys("Missing").unwrap().is_empty());
    }

    #[test]
    fn test_paths_case_insensitive() {
        let mut hive = MemoryHive::new();
        hive.set_value(r"Shell\womSetup", "", "Setup").unwrap();

        assert!(hive.key_exists(r"shell\WOMSETUP").unwrap());
        assert_eq!(hive.subkeys("SHELL").unwrap(), vec!["womSetup".to_string()]);
    }

    #[test]
    fn test_delete_tree() {
        let mut hive = MemoryHive::new();
        hive.set_value(r"Root\a\command", "", "x").unwrap();
        hive.set_value(r"Root\ab", "", "y").unwrap();

        assert!(hive.delete_tree(r"Root\a").unwrap());
        assert!(!hive.key_exists(r"Root\a\command").unwrap());
        // Sibling sharing a name prefix survives
        assert!(hive.key_exists(r"Root\ab").unwrap());
        assert!(!hive.delete_tree(r"Root\a").unwrap());
    }

    #[test]
    fn test_denied_writes() {
        let mut hive = MemoryHive::new();
        hive.deny_writes_under(r"Locked");

        let err = hive.set_value(r"Locked\key", "", "v").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(hive.set_value(r"LockedOut\key", "", "v").is_ok());

        hive.allow_all_writes();
        assert!(hive.set_value(r"Locked\key", "", "v").is_ok());
    }
}
