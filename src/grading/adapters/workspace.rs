//! Scratch directories for program runs.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::grading::domain::AttemptSpec;

/// Errors raised while managing a program workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The workspace root could not be created or opened.
    #[error("cannot open workspace root {path}: {source}")]
    Root {
        /// Root directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The attempt directory could not be created or removed.
    #[error("cannot manage workspace {path}: {source}")]
    Directory {
        /// Attempt directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Directory reserved for one program run, removed when dropped.
///
/// The directory lives under a configured root and is named after the
/// attempt plus a random suffix, so concurrent runs never share it.
#[derive(Debug)]
pub struct ProgramWorkspace {
    root: Dir,
    name: String,
    path: Utf8PathBuf,
    released: bool,
}

impl ProgramWorkspace {
    /// Creates a fresh workspace for `attempt` under `root`.
    ///
    /// The root is created when missing.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when the root or the attempt directory
    /// cannot be created.
    pub fn create(root: &Utf8Path, attempt: &AttemptSpec) -> Result<Self, WorkspaceError> {
        let root_error = |source| WorkspaceError::Root {
            path: root.to_owned(),
            source,
        };
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(root_error)?;
        let root_dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(root_error)?;

        let name = format!(
            "{}-{}",
            directory_stem(attempt.as_str()),
            Uuid::new_v4().simple()
        );
        let path = root.join(&name);
        root_dir
            .create_dir(&name)
            .map_err(|source| WorkspaceError::Directory {
                path: path.clone(),
                source,
            })?;
        debug!(workspace = %path, "created program workspace");

        Ok(Self {
            root: root_dir,
            name,
            path,
            released: false,
        })
    }

    /// Returns the absolute path of the workspace.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Removes the workspace and reports removal failures.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Directory`] when removal fails.
    pub fn release(mut self) -> Result<(), WorkspaceError> {
        self.released = true;
        self.remove()
    }

    fn remove(&self) -> Result<(), WorkspaceError> {
        self.root
            .remove_dir_all(&self.name)
            .map_err(|source| WorkspaceError::Directory {
                path: self.path.clone(),
                source,
            })
    }
}

impl Drop for ProgramWorkspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.remove() {
            warn!(error = %err, "failed to remove program workspace");
        }
    }
}

fn directory_stem(attempt: &str) -> String {
    attempt
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}
