pub mod decode;

use std::path::{Path, PathBuf};

use crate::foundation::error::{VignetteError, VignetteResult};

/// Environment variable overriding the default assets root.
pub const ASSETS_DIR_ENV: &str = "VIGNETTE_ASSETS_DIR";

const DEFAULT_ASSETS_DIR: &str = "docs/assets";

/// Root directory all illustration and caption files are resolved under.
///
/// Supplied at construction and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root from [`ASSETS_DIR_ENV`], falling back to `docs/assets`.
    pub fn from_env() -> Self {
        let root = std::env::var(ASSETS_DIR_ENV).unwrap_or_else(|_| DEFAULT_ASSETS_DIR.into());
        Self::new(root)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Join a normalized root-relative path onto the root.
    pub fn resolve(&self, rel: &str) -> VignetteResult<PathBuf> {
        let norm = normalize_rel_path(rel)?;
        Ok(self.root.join(Path::new(&norm)))
    }
}

/// Normalize and validate root-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and
/// rejects absolute paths or parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> VignetteResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(VignetteError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(VignetteError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(VignetteError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(VignetteError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}
