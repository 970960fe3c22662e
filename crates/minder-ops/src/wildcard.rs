//! Shell-style wildcard expansion.

use std::path::{Path, PathBuf};

use glob::MatchOptions;
use minder_core::{OpError, Result};

/// Characters that turn a path into a glob pattern.
const GLOB_CHARS: [char; 3] = ['*', '?', '['];

/// Whether `s` contains a glob metacharacter.
pub fn has_glob(s: &str) -> bool {
    s.contains(GLOB_CHARS)
}

/// Expand a pattern into a sorted, deduplicated list of existing paths.
///
/// A pattern without metacharacters is returned unchanged, whether or not
/// it exists. Dotfiles follow shell conventions: a final segment starting
/// with `.` matches only dotfiles (never `.` or `..`), anything else never
/// matches them.
pub fn expand(pattern: &Path) -> Result<Vec<PathBuf>> {
    let text = pattern.to_string_lossy();
    if !has_glob(&text) {
        return Ok(vec![pattern.to_path_buf()]);
    }

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    let paths = glob::glob_with(&text, options).map_err(|e| OpError::InvalidPattern {
        pattern: text.to_string(),
        message: e.msg.to_string(),
    })?;

    let wants_dotfiles = pattern
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'));

    let mut matches: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(path = %e.path().display(), error = %e.error(), "Skipping unreadable glob entry");
                None
            }
        })
        .filter(|path| keep_match(path, wants_dotfiles))
        .collect();

    matches.sort();
    matches.dedup();

    if matches.is_empty() {
        return Err(OpError::NoMatches {
            pattern: text.to_string(),
        });
    }

    tracing::debug!(pattern = %text, count = matches.len(), "Expanded glob");
    Ok(matches)
}

fn keep_match(path: &Path, wants_dotfiles: bool) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    if wants_dotfiles {
        name.starts_with('.') && name != "." && name != ".."
    } else {
        !name.starts_with('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join(".hidden"), "h").unwrap();
        temp
    }

    #[test]
    fn test_has_glob() {
        assert!(has_glob("*.txt"));
        assert!(has_glob("file?.log"));
        assert!(has_glob("[ab].rs"));
        assert!(!has_glob("plain/path.txt"));
    }

    #[test]
    fn test_literal_passthrough() {
        let path = Path::new("/does/not/exist.txt");
        assert_eq!(expand(path).unwrap(), vec![path.to_path_buf()]);
    }

    #[test]
    fn test_star_skips_dotfiles() {
        let temp = fixture();
        let matches = expand(&temp.path().join("*")).unwrap();
        assert_eq!(names(&matches), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_dot_star_only_dotfiles() {
        let temp = fixture();
        let matches = expand(&temp.path().join(".*")).unwrap();
        assert_eq!(names(&matches), vec![".hidden"]);
    }

    #[test]
    fn test_no_matches() {
        let temp = fixture();
        let err = expand(&temp.path().join("*.rs")).unwrap_err();
        assert!(matches!(err, OpError::NoMatches { .. }));
    }

    #[test]
    fn test_only_dotfiles_is_no_match_for_star() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".only"), "x").unwrap();
        let err = expand(&temp.path().join("*")).unwrap_err();
        assert!(matches!(err, OpError::NoMatches { .. }));
    }

    #[test]
    fn test_invalid_pattern() {
        let temp = fixture();
        let err = expand(&temp.path().join("[*.txt")).unwrap_err();
        assert!(matches!(err, OpError::InvalidPattern { .. }));
    }
}
