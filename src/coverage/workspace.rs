//! Report workspace handling.

use crate::error::{QagateError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Delete `dir` if it exists, then create it empty.
///
/// Refuses with [`QagateError::UnsafeReportDir`] when `dir` is, or
/// contains, any of the `protected` paths.
pub fn clean_directory(dir: &Path, protected: &[&Path]) -> Result<()> {
    ensure_disposable(dir, protected)?;

    match fs::remove_dir_all(dir) {
        Ok(()) => tracing::info!("Cleaning workdirectory at {}", dir.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Check that deleting `dir` leaves every `protected` path alone.
pub fn ensure_disposable(dir: &Path, protected: &[&Path]) -> Result<()> {
    let resolved = resolve(dir)?;

    for path in protected {
        let kept = resolve(path)?;
        if kept.starts_with(&resolved) {
            let reason = if kept == resolved {
                format!("it is {}", path.display())
            } else {
                format!("it contains {}", path.display())
            };
            return Err(QagateError::UnsafeReportDir {
                path: dir.to_path_buf(),
                reason,
            });
        }
    }
    Ok(())
}

/// Absolute form of `path` with symlinks resolved as far as the path exists.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let absolute = normalize(&absolute);

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(mut resolved) = existing.canonicalize() {
            for name in missing.iter().rev() {
                resolved.push(name);
            }
            return Ok(resolved);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }
}

/// Drop `.` components and fold `..` into their parent.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
