use std::{
    env,
    fs::{self, OpenOptions},
    io::{BufRead, Write},
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use crate::error::{AppError, ConfigError, Result};

const CONFIG_DIR: &str = ".config/twitter_run";
const CONFIG_FILENAME: &str = "config.toml";

pub fn get_config_dir() -> std::result::Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR))
        .ok_or(ConfigError::HomeDirNotFound)
}

pub fn get_config_file() -> std::result::Result<PathBuf, ConfigError> {
    Ok(get_config_dir()?.join(CONFIG_FILENAME))
}

pub fn editor() -> String {
    env::var("EDITOR")
        .or_else(|_| env::var("VISUAL"))
        .unwrap_or_else(|_| "vi".to_string())
}

pub fn open_editor(file: &Path) -> std::result::Result<ExitStatus, ConfigError> {
    let editor = editor();

    Command::new(&editor)
        .arg(file)
        .status()
        .map_err(|source| ConfigError::EditorFailed { editor, source })
}

/// Returns a warning when `path` is readable by group or others.
pub fn check_permissions(path: &Path, is_dir: bool) -> Option<String> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).ok()?;
        let mode = metadata.permissions().mode() & 0o777;
        let expected = if is_dir { 0o700 } else { 0o600 };

        if mode != expected {
            return Some(format!(
                "Permissions for {} are {:o}, expected {:o}. Run: chmod {:o} {}",
                path.display(),
                mode,
                expected,
                expected,
                path.display()
            ));
        }
    }

    #[cfg(not(unix))]
    let _ = (path, is_dir);

    None
}

/// Limits `path` to owner read/write. No-op off Unix.
pub fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}

/// Writes `data` to `path`, replacing any previous contents. The file is
/// created owner read/write only, and an existing file is narrowed to that.
pub fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    // `mode` only applies on creation.
    restrict_permissions(path)
}

/// First `max` characters of `text`.
pub fn excerpt(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Writes `label`, then reads one line from `input`. EOF before any input is an error.
pub fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<String> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AppError::empty_input(label.trim_end_matches([':', ' '])));
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serial_test::serial;

    use super::*;

    #[test]
    fn excerpt_keeps_short_text() {
        assert_eq!(excerpt("hello", 100), "hello");
        assert_eq!(excerpt("", 100), "");
    }

    #[test]
    fn excerpt_boundary() {
        let exact = "a".repeat(100);
        assert_eq!(excerpt(&exact, 100), exact);

        let over = "b".repeat(101);
        assert_eq!(excerpt(&over, 100).len(), 100);
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let text = "é".repeat(150);
        let cut = excerpt(&text, 100);
        assert_eq!(cut.chars().count(), 100);
        assert_eq!(cut.len(), 200);
    }

    #[test]
    fn prompt_reads_one_line() {
        let mut input = Cursor::new("elonmusk\nignored\n");
        let mut out = Vec::new();

        let answer = prompt(&mut input, &mut out, "Username: ").unwrap();

        assert_eq!(answer, "elonmusk");
        assert_eq!(String::from_utf8(out).unwrap(), "Username: ");
    }

    #[test]
    fn prompt_fails_on_eof() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();

        let err = prompt(&mut input, &mut out, "Search: ").unwrap_err();
        assert!(matches!(err, AppError::EmptyInput { what } if what == "Search"));
    }

    #[test]
    #[serial]
    fn config_file_lives_under_home() {
        let home = env::temp_dir().join("twitter-run-tests/home");
        unsafe {
            env::set_var("HOME", &home);
        }

        assert_eq!(
            get_config_file().unwrap(),
            home.join(".config/twitter_run/config.toml")
        );
    }

    #[test]
    #[serial]
    fn editor_prefers_editor_over_visual() {
        unsafe {
            env::set_var("EDITOR", "nano");
            env::set_var("VISUAL", "code");
        }
        assert_eq!(editor(), "nano");

        unsafe {
            env::remove_var("EDITOR");
        }
        assert_eq!(editor(), "code");

        unsafe {
            env::remove_var("VISUAL");
        }
        assert_eq!(editor(), "vi");
    }

    #[cfg(unix)]
    #[test]
    fn write_private_creates_owner_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cookies.json");

        write_private(&file, b"{}").unwrap();

        let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(fs::read_to_string(&file).unwrap(), "{}");
    }

    #[cfg(unix)]
    #[test]
    fn write_private_narrows_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cookies.json");
        fs::write(&file, "old contents that are longer").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

        write_private(&file, b"new").unwrap();

        let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(fs::read_to_string(&file).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn restricted_file_passes_permission_check() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cookies.json");
        fs::write(&file, "{}").unwrap();

        restrict_permissions(&file).unwrap();

        assert!(check_permissions(&file, false).is_none());
    }
}
