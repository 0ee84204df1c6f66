//! Path normalization utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Directory of `file` relative to `base`.
///
/// `_sass/blog/site.scss` under `_sass` gives `blog`; a file directly in
/// `base` gives an empty path. Files outside `base` also give an empty path.
pub fn relative_dir(file: &Path, base: &Path) -> PathBuf {
    file.parent()
        .and_then(|parent| parent.strip_prefix(base).ok())
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/definitely/not/here/site.scss");
        assert_eq!(normalize_path(path), path);
    }

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("missing/_sass"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("missing/_sass"));
    }

    #[test]
    fn test_relative_dir() {
        let base = Path::new("/site/_sass");
        assert_eq!(
            relative_dir(Path::new("/site/_sass/blog/site.scss"), base),
            PathBuf::from("blog")
        );
        assert_eq!(
            relative_dir(Path::new("/site/_sass/site.scss"), base),
            PathBuf::new()
        );
        assert_eq!(
            relative_dir(Path::new("/elsewhere/site.scss"), base),
            PathBuf::new()
        );
    }
}
