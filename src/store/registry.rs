//! Windows registry hive

use std::io;
use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ, KEY_WRITE};
use winreg::RegKey;

use super::hive::{Hive, RootScope};

/// The registry under one predefined root
pub struct RegistryHive {
    scope: RootScope,
    root: RegKey,
}

impl RegistryHive {
    pub fn open(scope: RootScope) -> Self {
        let root = match scope {
            RootScope::CurrentUser => RegKey::predef(HKEY_CURRENT_USER),
            RootScope::LocalMachine => RegKey::predef(HKEY_LOCAL_MACHINE),
        };
        Self { scope, root }
    }

    fn open_read(&self, path: &str) -> io::Result<Option<RegKey>> {
        match self.root.open_subkey_with_flags(path, KEY_READ) {
            Ok(key) => Ok(Some(key)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl Hive for RegistryHive {
    fn root(&self) -> RootScope {
        self.scope
    }

    fn subkeys(&self, path: &str) -> io::Result<Vec<String>> {
        match self.open_read(path)? {
            Some(key) => key.enum_keys().collect(),
            None => Ok(Vec::new()),
        }
    }

    fn key_exists(&self, path: &str) -> io::Result<bool> {
        Ok(self.open_read(path)?.is_some())
    }

    fn get_value(&self, path: &str, name: &str) -> io::Result<Option<String>> {
        let Some(key) = self.open_read(path)? else {
            return Ok(None);
        };
        match key.get_value::<String, _>(name) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn set_value(&mut self, path: &str, name: &str, value: &str) -> io::Result<()> {
        let (key, _) = self.root.create_subkey(path)?;
        key.set_value(name, &value)
    }

    fn delete_value(&mut self, path: &str, name: &str) -> io::Result<()> {
        let key = match self.root.open_subkey_with_flags(path, KEY_READ | KEY_WRITE) {
            Ok(key) => key,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err),
        };
        match key.delete_value(name) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn delete_tree(&mut self, path: &str) -> io::Result<bool> {
        if !self.key_exists(path)? {
            return Ok(false);
        }
        match self.root.delete_subkey_all(path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}
