//! Resolution of user-typed paths against a working directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use minder_core::{OpError, Result};

use crate::wildcard::has_glob;

/// Resolves typed paths relative to the shell's current location.
///
/// The location may be a file (the user selected one); relative input then
/// resolves against that file's parent directory.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    working_dir: &'a Path,
    home: Option<&'a Path>,
}

impl<'a> PathResolver<'a> {
    /// Create a resolver for a working directory.
    pub fn new(working_dir: &'a Path) -> Self {
        Self {
            working_dir,
            home: None,
        }
    }

    /// Enable `~` expansion against a home directory.
    pub fn with_home(mut self, home: Option<&'a Path>) -> Self {
        self.home = home;
        self
    }

    /// Resolve a path that must already exist when given in absolute form.
    ///
    /// Absolute glob patterns only require their literal directory prefix
    /// to exist; matching happens later.
    pub fn resolve(&self, input: &str) -> Result<PathBuf> {
        if let Some(path) = self.absolute(input) {
            let probe = if has_glob(input) {
                literal_prefix(&path)
            } else {
                path.clone()
            };
            if fs::symlink_metadata(&probe).is_err() {
                return Err(OpError::not_found(probe));
            }
            return Ok(path);
        }
        Ok(self.base_dir()?.join(input))
    }

    /// Resolve a path that may be about to be created.
    ///
    /// Absolute targets only need an existing parent directory.
    pub fn resolve_target(&self, input: &str) -> Result<PathBuf> {
        if let Some(path) = self.absolute(input) {
            if fs::symlink_metadata(&path).is_ok() {
                return Ok(path);
            }
            return match path.parent() {
                Some(parent) if parent.is_dir() => Ok(path),
                _ => Err(OpError::not_found(path)),
            };
        }
        Ok(self.base_dir()?.join(input))
    }

    /// The directory relative input is joined onto.
    pub fn base_dir(&self) -> Result<PathBuf> {
        base_dir(self.working_dir)
    }

    fn absolute(&self, input: &str) -> Option<PathBuf> {
        if let Some(home) = self.home {
            if input == "~" {
                return Some(home.to_path_buf());
            }
            if let Some(rest) = input.strip_prefix("~/") {
                return Some(home.join(rest));
            }
        }
        let path = Path::new(input);
        path.is_absolute().then(|| path.to_path_buf())
    }
}

/// Resolve `input` against `working_dir` (no `~` expansion).
pub fn resolve_path(working_dir: &Path, input: &str) -> Result<PathBuf> {
    PathResolver::new(working_dir).resolve(input)
}

/// The directory that relative paths join onto: the working directory, or
/// its parent when the working directory is a file.
pub fn base_dir(working_dir: &Path) -> Result<PathBuf> {
    let metadata = fs::metadata(working_dir).map_err(|e| OpError::io(working_dir, e))?;
    if metadata.is_dir() {
        return Ok(working_dir.to_path_buf());
    }
    Ok(working_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| working_dir.to_path_buf()))
}

/// The leading components of `pattern` that contain no glob metacharacter.
fn literal_prefix(pattern: &Path) -> PathBuf {
    pattern
        .components()
        .take_while(|c| !has_glob(&c.as_os_str().to_string_lossy()))
        .collect()
}

/// Lexically normalize a path: drop `.` components and fold `..`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Normalize a path and resolve symlinks in its longest existing prefix.
///
/// Works for paths that do not exist yet, so destinations can be compared
/// against their sources before anything is created.
pub fn canonical_form(path: &Path) -> PathBuf {
    let normalized = normalize(path);
    let mut existing = normalized.as_path();
    let mut rest: Vec<&std::ffi::OsStr> = Vec::new();

    loop {
        if let Ok(canonical) = existing.canonicalize() {
            let mut out = canonical;
            out.extend(rest.iter().rev());
            return out;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name);
                existing = parent;
            }
            _ => return normalize(path),
        }
    }
}

/// Whether `child` lies strictly inside `parent`.
pub fn is_subpath(child: &Path, parent: &Path) -> bool {
    let child = canonical_form(child);
    let parent = canonical_form(parent);
    child != parent && child.starts_with(&parent)
}

/// Whether two paths name the same location.
pub fn same_path(a: &Path, b: &Path) -> bool {
    canonical_form(a) == canonical_form(b)
}
