//! User-supplied path specifications.

use std::path::{Path, PathBuf};

use minder_core::Result;
use serde::{Deserialize, Serialize};

use crate::resolve::PathResolver;
use crate::wildcard::expand;

/// Suffixes that mark a contents-only spec (`dir/.`).
#[cfg(windows)]
const CONTENTS_SUFFIXES: &[&str] = &["/.", "\\."];
#[cfg(not(windows))]
const CONTENTS_SUFFIXES: &[&str] = &["/."];

/// A path as typed by the user, before resolution.
///
/// May be relative, may contain glob metacharacters, and may end in `/.`
/// to address the children of a directory rather than the directory itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    raw: String,
    base: String,
    contents_only: bool,
}

impl PathSpec {
    /// Parse a raw spec, splitting off any contents-only suffix.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut base = raw.as_str();
        let mut contents_only = false;

        while let Some(stripped) = CONTENTS_SUFFIXES
            .iter()
            .find_map(|suffix| base.strip_suffix(suffix))
        {
            contents_only = true;
            base = stripped;
        }

        // "/." addresses the children of the root.
        let base = if contents_only && base.is_empty() {
            std::path::MAIN_SEPARATOR_STR.to_string()
        } else {
            base.to_string()
        };

        Self {
            raw,
            base,
            contents_only,
        }
    }

    /// The string exactly as typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The spec without its contents-only suffix.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether the spec addresses a directory's children.
    pub fn is_contents_only(&self) -> bool {
        self.contents_only
    }

    /// Whether the raw spec names the empty path or the current directory.
    ///
    /// These are removal roots no matter where they resolve to.
    pub fn is_bare_dot(&self) -> bool {
        matches!(self.base.trim_end_matches(['/', '\\']), "" | ".")
            && self.base != std::path::MAIN_SEPARATOR_STR
    }

    /// Resolve against a working directory.
    pub fn resolve(&self, resolver: &PathResolver<'_>) -> Result<ResolvedSpec> {
        let path = resolver.resolve(&self.base)?;
        Ok(ResolvedSpec {
            raw: self.raw.clone(),
            path,
            contents_only: self.contents_only,
        })
    }
}

impl From<&str> for PathSpec {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// A path spec resolved to an absolute path (possibly still a glob pattern).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSpec {
    /// The string exactly as typed.
    pub raw: String,
    /// Absolute path or absolute glob pattern, without the `/.` suffix.
    pub path: PathBuf,
    /// Whether the spec addresses a directory's children.
    pub contents_only: bool,
}

impl ResolvedSpec {
    /// Build a resolved spec for a concrete absolute path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            raw: path.display().to_string(),
            path,
            contents_only: false,
        }
    }

    /// Build a contents-only spec for a concrete absolute directory.
    pub fn contents_of(dir: impl Into<PathBuf>) -> Self {
        let path = dir.into();
        Self {
            raw: format!("{}/.", path.display()),
            path,
            contents_only: true,
        }
    }

    /// The resolved base path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the raw spec names the empty path or the current directory.
    pub fn is_bare_dot(&self) -> bool {
        PathSpec::parse(self.raw.as_str()).is_bare_dot()
    }

    /// Expand the base path into concrete matches.
    pub fn expand(&self) -> Result<Vec<PathBuf>> {
        expand(&self.path)
    }
}

impl std::fmt::Display for ResolvedSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.contents_only {
            write!(f, "{}/.", self.path.display())
        } else {
            write!(f, "{}", self.path.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let spec = PathSpec::parse("docs/readme.md");
        assert_eq!(spec.base(), "docs/readme.md");
        assert!(!spec.is_contents_only());
    }

    #[test]
    fn test_parse_contents_only() {
        let spec = PathSpec::parse("build/.");
        assert_eq!(spec.base(), "build");
        assert!(spec.is_contents_only());
        assert_eq!(spec.raw(), "build/.");
    }

    #[test]
    fn test_parse_repeated_suffix() {
        let spec = PathSpec::parse("build/./.");
        assert_eq!(spec.base(), "build");
        assert!(spec.is_contents_only());
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_root_contents() {
        let spec = PathSpec::parse("/.");
        assert_eq!(spec.base(), "/");
        assert!(spec.is_contents_only());
        assert!(!spec.is_bare_dot());
    }

    #[test]
    fn test_dotfile_is_not_contents_only() {
        let spec = PathSpec::parse("dir/.hidden");
        assert!(!spec.is_contents_only());
        assert_eq!(spec.base(), "dir/.hidden");
    }

    #[test]
    fn test_bare_dot() {
        assert!(PathSpec::parse("").is_bare_dot());
        assert!(PathSpec::parse(".").is_bare_dot());
        assert!(PathSpec::parse("./.").is_bare_dot());
        assert!(PathSpec::parse("./").is_bare_dot());
        assert!(!PathSpec::parse("..").is_bare_dot());
        assert!(!PathSpec::parse("a").is_bare_dot());
    }

    #[test]
    fn test_resolved_display() {
        let spec = ResolvedSpec::contents_of("/tmp/x");
        assert_eq!(spec.to_string(), "/tmp/x/.");
        assert_eq!(ResolvedSpec::from_path("/tmp/x").to_string(), "/tmp/x");
    }
}
