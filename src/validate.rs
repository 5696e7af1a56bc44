//! Pre-flight checks and the registration pipeline
//!
//! `prepare` runs everything up to the store write, so a dry run that
//! succeeds predicts the outcome of the real registration.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{MenuError, Result};
use crate::menu::command;
use crate::menu::icon::IconWarning;
use crate::menu::key_name;
use crate::menu::ContextMenuEntry;
use crate::store::{AddReport, EntryStore, Hive, RootScope};

/// What the user asked to register
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub script: PathBuf,
    pub title: String,
    /// `auto`, a keyword, or an icon path
    pub icon: String,
    /// Use this key instead of deriving one from the file name
    pub key: Option<String>,
}

/// A fully resolved entry, ready to write
#[derive(Debug, Clone)]
pub struct Prepared {
    pub entry: ContextMenuEntry,
    pub icon_warning: Option<IconWarning>,
}

/// Checks run before anything touches the store
pub struct ValidationGate {
    root: RootScope,
    on_path: fn(&str) -> bool,
}

impl ValidationGate {
    pub fn new(root: RootScope) -> Self {
        Self {
            root,
            on_path: command::on_search_path,
        }
    }

    /// Replace the PATH probe used for interpreter lookup
    pub fn with_path_probe(mut self, on_path: fn(&str) -> bool) -> Self {
        self.on_path = on_path;
        self
    }

    /// Validate and resolve a request without writing anything
    pub fn prepare(&self, request: &RegisterRequest) -> Result<Prepared> {
        check_root(self.root)?;

        if request.title.trim().is_empty() {
            return Err(MenuError::Validation("Title must not be empty".to_string()));
        }

        let script = check_script(&request.script)?;
        let source = script.to_string_lossy();

        let (mut entry, icon_warning) = ContextMenuEntry::resolve_with(
            &source,
            request.title.trim(),
            &request.icon,
            self.on_path,
        );

        if let Some(key) = &request.key {
            if !key_name::is_valid_key(key) {
                return Err(MenuError::Validation(format!(
                    "Key '{}' must match ^(wom|works|dev)[A-Za-z0-9]*$",
                    key
                )));
            }
            entry.key = key.clone();
        }

        tracing::debug!(
            key = %entry.key,
            script_type = %entry.script_type,
            command = %entry.command,
            "Resolved entry"
        );
        Ok(Prepared {
            entry,
            icon_warning,
        })
    }

    /// Preview a registration; never touches the store
    pub fn dry_run(&self, request: &RegisterRequest) -> Result<Prepared> {
        self.prepare(request)
    }

    /// Validate, resolve, and write an entry into both scopes
    pub fn register<H: Hive>(
        &self,
        store: &mut EntryStore<H>,
        request: &RegisterRequest,
    ) -> Result<(Prepared, AddReport)> {
        check_root(store.root())?;
        let prepared = self.prepare(request)?;
        let report = store.add(&prepared.entry)?;
        Ok((prepared, report))
    }
}

/// Refuse machine-wide roots so registration never needs elevation
pub fn check_root(root: RootScope) -> Result<()> {
    match root {
        RootScope::CurrentUser => Ok(()),
        other => Err(MenuError::Validation(format!(
            "Refusing to write under {}: only per-user registration is supported",
            other
        ))),
    }
}

/// Confirm the script is an existing, readable regular file; return its absolute path
pub fn check_script(path: &Path) -> Result<PathBuf> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            MenuError::Validation(format!("Script does not exist: {}", path.display()))
        }
        _ => MenuError::Validation(format!("Cannot access script {}: {}", path.display(), e)),
    })?;
    if !metadata.is_file() {
        return Err(MenuError::Validation(format!(
            "Script is not a regular file: {}",
            path.display()
        )));
    }
    File::open(path).map_err(|e| {
        MenuError::Validation(format!("Script is not readable: {}: {}", path.display(), e))
    })?;

    let absolute = path.canonicalize().map_err(|source| MenuError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(strip_windows_prefix(&absolute))
}

/// Strip Windows extended-length path prefix (\\?\)
///
/// `canonicalize()` on Windows returns `\\?\C:\path`, which Explorer does not
/// expect in a command line.
pub fn strip_windows_prefix(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if let Some(stripped) = path_str.strip_prefix(r"\\?\") {
        PathBuf::from(stripped)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::icon::{POWERSHELL_ICON, PYTHON_ICON};
    use crate::menu::ScriptType;
    use crate::store::MemoryHive;
    use std::fs;
    use tempfile::TempDir;

    fn python_only(name: &str) -> bool {
        name == "python"
    }

    fn gate() -> ValidationGate {
        ValidationGate::new(RootScope::CurrentUser).with_path_probe(python_only)
    }

    fn request(script: PathBuf, title: &str, icon: &str) -> RegisterRequest {
        RegisterRequest {
            script,
            title: title.to_string(),
            icon: icon.to_string(),
            key: None,
        }
    }

    fn script(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, "echo hi\n").unwrap();
        path
    }

    #[test]
    fn test_register_python_script() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "setup.py");
        let mut store = EntryStore::new(MemoryHive::new());

        let (prepared, report) = gate()
            .register(&mut store, &request(path, "Setup Project", "auto"))
            .unwrap();

        let entry = &prepared.entry;
        assert!(report.is_new());
        assert_eq!(entry.script_type, ScriptType::Python);
        assert!(entry.command.starts_with(r#""python" "#));
        assert!(entry.command.ends_with(r#""%V""#));
        assert_eq!(entry.icon_path.as_deref(), Some(PYTHON_ICON));
        assert_eq!(entry.key, "womSetup");
        assert_eq!(store.get("womSetup").unwrap().as_ref(), Some(entry));
    }

    #[test]
    fn test_register_powershell_script() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "deploy.ps1");
        let absolute = strip_windows_prefix(&path.canonicalize().unwrap());

        let prepared = gate()
            .prepare(&request(path, "Deploy", "powershell"))
            .unwrap();

        assert_eq!(
            prepared.entry.command,
            format!(
                r#"powershell.exe -ExecutionPolicy Bypass -File "{}" "%V""#,
                absolute.display()
            )
        );
        assert_eq!(prepared.entry.icon_path.as_deref(), Some(POWERSHELL_ICON));
        assert_eq!(prepared.entry.key, "womDeploy");
    }

    #[test]
    fn test_dry_run_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut store = EntryStore::new(MemoryHive::new());
        gate()
            .register(&mut store, &request(script(&dir, "keep.bat"), "Keep", "auto"))
            .unwrap();
        let before = store.list().unwrap();

        let prepared = gate()
            .dry_run(&request(script(&dir, "preview.py"), "Preview", "auto"))
            .unwrap();

        assert_eq!(prepared.entry.key, "womPreview");
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn test_missing_script_rejected() {
        let dir = TempDir::new().unwrap();
        let err = gate()
            .prepare(&request(dir.path().join("ghost.py"), "Ghost", "auto"))
            .unwrap_err();
        assert!(matches!(err, MenuError::Validation(_)));
    }

    #[test]
    fn test_missing_script_message() {
        let dir = TempDir::new().unwrap();
        let err = check_script(&dir.path().join("ghost.py")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[cfg(unix)]
    #[test]
    fn test_inaccessible_script_is_not_reported_missing() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        let path = locked.join("setup.py");
        fs::write(&path, "print('hi')\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = check_script(&path);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Root bypasses directory permissions
        if let Err(err) = result {
            assert!(matches!(err, MenuError::Validation(_)));
            assert!(!err.to_string().contains("does not exist"));
        }
    }

    #[test]
    fn test_directory_rejected() {
        let dir = TempDir::new().unwrap();
        let err = gate()
            .prepare(&request(dir.path().to_path_buf(), "Dir", "auto"))
            .unwrap_err();
        assert!(matches!(err, MenuError::Validation(_)));
    }

    #[test]
    fn test_empty_title_rejected() {
        let dir = TempDir::new().unwrap();
        let err = gate()
            .prepare(&request(script(&dir, "a.py"), "   ", "auto"))
            .unwrap_err();
        assert!(matches!(err, MenuError::Validation(_)));
    }

    #[test]
    fn test_machine_root_refused() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "setup.py");

        let machine_gate = ValidationGate::new(RootScope::LocalMachine);
        assert!(matches!(
            machine_gate.prepare(&request(path.clone(), "Setup", "auto")),
            Err(MenuError::Validation(_))
        ));

        let mut machine_store = EntryStore::new(MemoryHive::with_root(RootScope::LocalMachine));
        assert!(gate()
            .register(&mut machine_store, &request(path, "Setup", "auto"))
            .is_err());
        assert!(machine_store.list().unwrap().is_empty());
    }

    #[test]
    fn test_key_override() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "setup.py");

        let mut req = request(path, "Setup", "auto");
        req.key = Some("devSetupAlt".to_string());
        assert_eq!(gate().prepare(&req).unwrap().entry.key, "devSetupAlt");

        req.key = Some("setup-alt".to_string());
        assert!(matches!(gate().prepare(&req), Err(MenuError::Validation(_))));
    }

    #[test]
    fn test_missing_icon_is_a_warning_not_an_error() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "tool.exe");
        let missing = dir.path().join("missing.ico");

        let prepared = gate()
            .prepare(&request(path, "Tool", &missing.to_string_lossy()))
            .unwrap();
        assert_eq!(prepared.entry.icon_path, None);
        assert!(prepared.icon_warning.is_some());
    }

    #[test]
    fn test_strip_windows_prefix() {
        let result = strip_windows_prefix(Path::new(r"\\?\C:\tools\setup.py"));
        assert_eq!(result, PathBuf::from(r"C:\tools\setup.py"));

        let result = strip_windows_prefix(Path::new("/home/me/setup.py"));
        assert_eq!(result, PathBuf::from("/home/me/setup.py"));
    }
}
