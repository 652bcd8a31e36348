//! Generated artifacts and how they reach the disk.
//!
//! Writes go through a temporary file in the destination directory that is
//! renamed over the target, so a failed run never leaves a truncated file.
//! Multi-artifact writes keep the files they replace until every rename has
//! succeeded, and put them back if one fails.

use crate::GenerateError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, info, warn};

/// One generated text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name the artifact is written under
    pub name: String,
    pub contents: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write `contents` into a temporary file next to `target`.
fn stage(target: &Path, contents: &str) -> Result<NamedTempFile, GenerateError> {
    let dir = parent_dir(target);
    let mut file = NamedTempFile::new_in(dir).map_err(|err| GenerateError::io(dir, err))?;
    file.write_all(contents.as_bytes())
        .and_then(|_| file.as_file().sync_all())
        .map_err(|err| GenerateError::io(target, err))?;
    debug!("staged {} at {}", target.display(), file.path().display());
    Ok(file)
}

fn commit(staged: NamedTempFile, target: &Path) -> Result<(), GenerateError> {
    staged
        .persist(target)
        .map_err(|err| GenerateError::io(target, err.error))?;
    info!("wrote {}", target.display());
    Ok(())
}

/// Atomically replace the file at `path` with `contents`.
pub fn write_atomically(path: &Path, contents: &str) -> Result<(), GenerateError> {
    let staged = stage(path, contents)?;
    commit(staged, path)
}

/// A target that has been replaced, with the file it replaced (if any).
struct Committed {
    target: PathBuf,
    backup: Option<TempPath>,
}

/// Rename `staged` over `target`, moving an existing file aside first.
fn replace(staged: NamedTempFile, target: &Path) -> Result<Committed, GenerateError> {
    let backup = if target.is_file() {
        let dir = parent_dir(target);
        let backup = NamedTempFile::new_in(dir)
            .map_err(|err| GenerateError::io(dir, err))?
            .into_temp_path();
        fs::rename(target, &backup).map_err(|err| GenerateError::io(target, err))?;
        debug!("moved {} aside to {}", target.display(), backup.display());
        Some(backup)
    } else {
        None
    };

    if let Err(err) = staged.persist(target) {
        if let Some(backup) = &backup {
            restore(backup, target);
        }
        return Err(GenerateError::io(target, err.error));
    }

    Ok(Committed {
        target: target.to_path_buf(),
        backup,
    })
}

fn restore(backup: &Path, target: &Path) {
    if let Err(err) = fs::rename(backup, target) {
        warn!("could not restore {}: {}", target.display(), err);
    }
}

/// Undo committed replacements, newest first.
fn rollback(committed: Vec<Committed>) {
    for entry in committed.into_iter().rev() {
        match &entry.backup {
            Some(backup) => restore(backup, &entry.target),
            None => {
                if let Err(err) = fs::remove_file(&entry.target) {
                    warn!("could not remove {}: {}", entry.target.display(), err);
                }
            }
        }
        debug!("rolled back {}", entry.target.display());
    }
}

/// Write every artifact into `dir`.
///
/// Either every artifact ends up in place or the directory is left as it
/// was. Targets are checked and all artifacts are staged before anything is
/// renamed. Replaced files are kept until the last rename succeeds, and a
/// failed rename restores them.
pub fn write_all_atomically(
    artifacts: &[Artifact],
    dir: &Path,
) -> Result<Vec<PathBuf>, GenerateError> {
    fs::create_dir_all(dir).map_err(|err| GenerateError::io(dir, err))?;

    let targets: Vec<PathBuf> = artifacts.iter().map(|a| dir.join(&a.name)).collect();
    for target in &targets {
        if target.is_dir() {
            return Err(GenerateError::io(
                target,
                io::Error::new(io::ErrorKind::IsADirectory, "target is a directory"),
            ));
        }
    }

    let mut staged = Vec::with_capacity(artifacts.len());
    for (artifact, target) in artifacts.iter().zip(&targets) {
        staged.push(stage(target, &artifact.contents)?);
    }

    let mut committed = Vec::with_capacity(staged.len());
    for (file, target) in staged.into_iter().zip(&targets) {
        match replace(file, target) {
            Ok(entry) => committed.push(entry),
            Err(err) => {
                rollback(committed);
                return Err(err);
            }
        }
    }

    // Dropping the backups deletes the replaced files
    for entry in &committed {
        info!("wrote {}", entry.target.display());
    }
    Ok(targets)
}
