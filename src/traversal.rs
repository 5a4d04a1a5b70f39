//! Recursive directory enumeration
//!
//! Entries come out depth-first in whatever order the filesystem lists them.
//! A directory is always yielded before its contents.

use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One entry found under the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub is_directory: bool,
    /// The entry itself is a symbolic link
    pub is_symlink: bool,
}

/// Iterator over the entries below a root
pub struct Walk {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl Iterator for Walk {
    type Item = Result<FileEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.inner.next()? {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(&self.root).to_path_buf();
                return Some(Err(Error::FileUnreadable {
                    path,
                    source: io::Error::from(err),
                }));
            }
        };

        let file_type = entry.file_type();
        let is_symlink = entry.path_is_symlink();
        // An unfollowed link to a directory is still listed as a directory
        let is_directory = file_type.is_dir() || (file_type.is_symlink() && entry.path().is_dir());

        Some(Ok(FileEntry {
            path: entry.into_path(),
            is_directory,
            is_symlink,
        }))
    }
}

/// Make sure `root` exists and, if it is a directory, that it can be listed.
///
/// Returns whether the root is a directory.
pub fn check_root(root: &Path) -> Result<bool> {
    let not_found = |_| Error::RootNotFound(root.to_path_buf());
    let metadata = fs::metadata(root).map_err(not_found)?;
    if metadata.is_dir() {
        fs::read_dir(root).map_err(not_found)?;
    }
    Ok(metadata.is_dir())
}

/// Walk `root` recursively.
///
/// The root directory itself is not yielded. If `root` is a regular file, that
/// file is the only entry. Fails with [`Error::RootNotFound`] when the root
/// cannot be reached.
pub fn walk(root: &Path, follow_links: bool) -> Result<Walk> {
    let min_depth = if check_root(root)? { 1 } else { 0 };

    tracing::debug!(root = %root.display(), follow_links, "walking tree");

    Ok(Walk {
        root: root.to_path_buf(),
        inner: WalkDir::new(root)
            .follow_links(follow_links)
            .min_depth(min_depth)
            .into_iter(),
    })
}
