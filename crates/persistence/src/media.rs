// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Filesystem media store.
//!
//! Files land under `<root>/<media kind>/` with a generated name; the
//! durable reference is the path relative to `root`.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use fieldops::{MediaStore, StoreError};
use fieldops_domain::{MediaFile, MediaKind, MediaRef};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::error::PersistenceError;

/// Content types the store accepts, with the extension used on disk.
pub const ACCEPTED_CONTENT_TYPES: [(&str, &str); 3] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// 10 MiB.
pub const DEFAULT_MAX_MEDIA_BYTES: usize = 10 * 1024 * 1024;

static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: PathBuf,
    max_bytes: usize,
}

impl FsMediaStore {
    /// Creates a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new<P: AsRef<Path>>(root: P, max_bytes: usize) -> Result<Self, PersistenceError> {
        let root: PathBuf = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root, max_bytes })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Checks a file against the size and type limits.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::MediaRejected` naming the violated limit.
    pub fn accept(&self, file: &MediaFile) -> Result<&'static str, PersistenceError> {
        if file.bytes.is_empty() {
            return Err(PersistenceError::MediaRejected(format!(
                "{} is empty",
                file.file_name
            )));
        }
        if file.bytes.len() > self.max_bytes {
            return Err(PersistenceError::MediaRejected(format!(
                "{} is {} bytes, limit is {}",
                file.file_name,
                file.bytes.len(),
                self.max_bytes
            )));
        }
        let content_type: String = file.content_type.trim().to_ascii_lowercase();
        ACCEPTED_CONTENT_TYPES
            .iter()
            .find(|(accepted, _)| *accepted == content_type)
            .map(|(_, extension)| *extension)
            .ok_or_else(|| {
                PersistenceError::MediaRejected(format!(
                    "{} has unsupported content type {}",
                    file.file_name, file.content_type
                ))
            })
    }

    /// Writes `file` and returns its reference.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::MediaRejected` or an I/O error.
    pub fn store(&self, kind: MediaKind, file: &MediaFile) -> Result<MediaRef, PersistenceError> {
        let extension: &str = self.accept(file)?;

        let directory: PathBuf = self.root.join(kind.as_str());
        fs::create_dir_all(&directory)?;

        let sequence: u64 = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let stamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        let file_name: String = format!("{stamp}-{sequence}.{extension}");
        fs::write(directory.join(&file_name), &file.bytes)?;

        let reference: MediaRef = MediaRef::new(format!("{}/{file_name}", kind.as_str()));
        debug!(%kind, %reference, bytes = file.bytes.len(), "Stored media file");
        Ok(reference)
    }

    /// Reads the bytes behind a reference produced by this store.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` for references that leave the
    /// store root or do not exist, or an I/O error.
    pub fn read(&self, reference: &MediaRef) -> Result<Vec<u8>, PersistenceError> {
        let relative: &Path = Path::new(reference.as_str());
        if !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(PersistenceError::NotFound(format!(
                "media {}",
                reference.as_str()
            )));
        }

        let path: PathBuf = self.root.join(relative);
        if !path.is_file() {
            return Err(PersistenceError::NotFound(format!(
                "media {}",
                reference.as_str()
            )));
        }
        Ok(fs::read(path)?)
    }
}

impl MediaStore for FsMediaStore {
    fn upload(&self, kind: MediaKind, file: &MediaFile) -> Result<MediaRef, StoreError> {
        self.store(kind, file).map_err(|e| {
            warn!(%kind, file_name = %file.file_name, error = %e, "Media upload refused");
            StoreError::from(e)
        })
    }
}
