//! Command synthesis for registered scripts
//!
//! Every command ends with the quoted folder placeholder (`%V`), which Explorer
//! replaces with the folder the user right-clicked.

use super::script_type::ScriptType;
use crate::config::FOLDER_PLACEHOLDER;

/// Interpreters probed on PATH, in order
const PYTHON_CANDIDATES: [&str; 3] = ["python", "python3", "py"];

/// Used when no Python interpreter is found
const PYTHON_FALLBACK: &str = "py";

const POWERSHELL_PREFIX: &str = "powershell.exe -ExecutionPolicy Bypass -File";
const BATCH_PREFIX: &str = "cmd.exe /c";

/// Build the command line for a script, probing PATH with `which`
pub fn synthesize(script_type: ScriptType, path: &str) -> String {
    synthesize_with(script_type, path, on_search_path)
}

/// Whether an executable with this name is on PATH
pub fn on_search_path(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Build the command line with a caller-supplied PATH probe
///
/// Never fails: a missing interpreter degrades to a best-effort literal.
pub fn synthesize_with<F>(script_type: ScriptType, path: &str, on_path: F) -> String
where
    F: Fn(&str) -> bool,
{
    match script_type {
        ScriptType::Python => {
            let interpreter = PYTHON_CANDIDATES
                .iter()
                .copied()
                .find(|&name| on_path(name))
                .unwrap_or_else(|| {
                    tracing::warn!("No Python interpreter on PATH, using '{}'", PYTHON_FALLBACK);
                    PYTHON_FALLBACK
                });
            format!("\"{}\" \"{}\" \"{}\"", interpreter, path, FOLDER_PLACEHOLDER)
        }
        // The bypass applies to this one invocation, not the machine policy
        ScriptType::PowerShell => {
            format!("{} \"{}\" \"{}\"", POWERSHELL_PREFIX, path, FOLDER_PLACEHOLDER)
        }
        ScriptType::Batch => format!("{} \"{}\" \"{}\"", BATCH_PREFIX, path, FOLDER_PLACEHOLDER),
        ScriptType::Executable => format!("\"{}\" \"{}\"", path, FOLDER_PLACEHOLDER),
    }
}

/// Recover the script type and source path from a synthesized command
///
/// Only the exact shapes `synthesize_with` produces are recognized; anything
/// else returns `None`.
pub fn parse_command(command: &str) -> Option<(ScriptType, String)> {
    let command = command.trim();

    let (script_type, source) = if let Some(rest) = command.strip_prefix(POWERSHELL_PREFIX) {
        match quoted_tokens(rest.strip_prefix(' ')?)?.as_slice() {
            [source] => (ScriptType::PowerShell, *source),
            _ => return None,
        }
    } else if let Some(rest) = command.strip_prefix(BATCH_PREFIX) {
        match quoted_tokens(rest.strip_prefix(' ')?)?.as_slice() {
            [source] => (ScriptType::Batch, *source),
            _ => return None,
        }
    } else {
        match quoted_tokens(command)?.as_slice() {
            [interpreter, source] if PYTHON_CANDIDATES.contains(interpreter) => {
                (ScriptType::Python, *source)
            }
            [source] => (ScriptType::Executable, *source),
            _ => return None,
        }
    };

    if source.trim().is_empty() {
        return None;
    }
    Some((script_type, source.to_string()))
}

/// Split `"a" "b" "%V"` into the tokens before the trailing placeholder
///
/// `None` unless the whole string is space-separated quoted tokens ending in
/// the quoted placeholder.
fn quoted_tokens(text: &str) -> Option<Vec<&str>> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut tokens: Vec<&str> = inner.split("\" \"").collect();
    if tokens.iter().any(|t| t.contains('"')) {
        return None;
    }
    match tokens.pop() {
        Some(last) if last == FOLDER_PLACEHOLDER => Some(tokens),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nothing_on_path(_: &str) -> bool {
        false
    }

    #[test]
    fn test_python_uses_first_interpreter_found() {
        let cmd = synthesize_with(ScriptType::Python, r"C:\tools\my_script.py", |name| {
            name == "python3" || name == "py"
        });
        assert_eq!(cmd, r#""python3" "C:\tools\my_script.py" "%V""#);

        let cmd = synthesize_with(ScriptType::Python, r"C:\tools\my_script.py", |_| true);
        assert_eq!(cmd, r#""python" "C:\tools\my_script.py" "%V""#);
    }

    #[test]
    fn test_python_degrades_to_py() {
        let cmd = synthesize_with(ScriptType::Python, r"C:\tools\a.py", nothing_on_path);
        assert_eq!(cmd, r#""py" "C:\tools\a.py" "%V""#);
    }

    #[test]
    fn test_powershell() {
        let cmd = synthesize_with(
            ScriptType::PowerShell,
            r"C:\tools\deploy.ps1",
            nothing_on_path,
        );
        assert_eq!(
            cmd,
            r#"powershell.exe -ExecutionPolicy Bypass -File "C:\tools\deploy.ps1" "%V""#
        );
    }

    #[test]
    fn test_batch_and_executable() {
        assert_eq!(
            synthesize_with(ScriptType::Batch, r"C:\b.bat", nothing_on_path),
            r#"cmd.exe /c "C:\b.bat" "%V""#
        );
        assert_eq!(
            synthesize_with(ScriptType::Executable, r"C:\t.exe", nothing_on_path),
            r#""C:\t.exe" "%V""#
        );
    }

    #[test]
    fn test_paths_with_spaces_stay_quoted() {
        let cmd = synthesize_with(
            ScriptType::Executable,
            r"C:\Program Files\Tool\tool.exe",
            nothing_on_path,
        );
        assert_eq!(cmd, r#""C:\Program Files\Tool\tool.exe" "%V""#);
    }

    #[test]
    fn test_parse_recovers_every_type() {
        let cases = [
            (ScriptType::Python, r"C:\tools\setup.py"),
            (ScriptType::PowerShell, r"C:\tools\deploy.ps1"),
            (ScriptType::Batch, r"C:\My Tools\build.cmd"),
            (ScriptType::Executable, r"C:\tools\tool.exe"),
        ];
        for (script_type, path) in cases {
            let cmd = synthesize_with(script_type, path, nothing_on_path);
            assert_eq!(
                parse_command(&cmd),
                Some((script_type, path.to_string())),
                "command: {cmd}"
            );
        }
    }

    #[test]
    fn test_parse_foreign_command() {
        assert_eq!(parse_command("notepad.exe %1"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command(r#"wt.exe -d "%V""#), None);
        assert_eq!(parse_command(r#""C:\tool.exe" "--flag" "%V""#), None);
        assert_eq!(parse_command(r#""C:\tool.exe" "%1""#), None);
        assert_eq!(parse_command(r#""%V""#), None);
        assert_eq!(parse_command(r#"cmd.exe /c "C:\b.bat" "x" "%V""#), None);
    }

    #[test]
    fn test_parse_python_requires_known_interpreter() {
        assert_eq!(
            parse_command(r#""python3" "C:\tools\a.py" "%V""#),
            Some((ScriptType::Python, r"C:\tools\a.py".to_string()))
        );
        assert_eq!(parse_command(r#""node" "C:\tools\a.js" "%V""#), None);
    }
}
