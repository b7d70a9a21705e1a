//! Path arithmetic for output-directory redirection
//!
//! The redirected build directory is expressed relative to the default one
//! (`build/../../build`), so the final location must be computed lexically,
//! before anything exists on disk.

use crate::error::{Error, ErrorCode, Result};
use std::path::{Component, Path, PathBuf};

/// Resolve a path to an absolute form without touching the filesystem.
///
/// Relative paths are anchored at the current working directory. `.` and
/// `..` components are folded lexically; `..` at the filesystem root stays
/// at the root, matching how Gradle resolves directory layouts.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let anchored = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| {
                Error::new(ErrorCode::InvalidPath, "Cannot determine working directory")
                    .with_source(e)
            })?
            .join(path)
    };
    Ok(normalize(&anchored))
}

/// Fold `.` and `..` components out of an absolute path.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping past the root is a no-op.
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_parent_components() {
        let path = Path::new("/work/app/android/build/../../build");
        assert_eq!(normalize(path), PathBuf::from("/work/app/build"));
    }

    #[test]
    fn test_normalize_ignores_cur_dir() {
        let path = Path::new("/work/./android/./build");
        assert_eq!(normalize(path), PathBuf::from("/work/android/build"));
    }

    #[test]
    fn test_normalize_stops_at_root() {
        let path = Path::new("/../../build");
        assert_eq!(normalize(path), PathBuf::from("/build"));
    }

    #[test]
    fn test_absolutize_anchors_relative_paths() {
        let abs = absolutize(Path::new("android/build")).unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("android/build"));
    }
}
