//! A local directory used as object storage.
//!
//! Every regular file directly inside the root is one stored object; its
//! file name is both the stored name and the object id.

use std::io;
use std::path::{Path, PathBuf};

use slicestore_reassembly::{FetchError, FetchFuture, ObjectFetcher, validate_output_name};
use slicestore_slicing::StoredObjectRef;
use tracing::debug;

use crate::lister::{ListFuture, ObjectLister};

/// Lists and reads objects from a directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves an object id to a path inside the root.
    ///
    /// Ids are plain file names; separators and traversal are rejected.
    fn object_path(&self, object_id: &str) -> Result<PathBuf, FetchError> {
        validate_output_name(object_id)
            .map_err(|e| FetchError::InvalidObjectId(e.to_string()))?;
        if object_id.contains(['/', '\\']) {
            return Err(FetchError::InvalidObjectId(format!(
                "path separators not allowed: {object_id}"
            )));
        }
        Ok(self.root.join(object_id))
    }

    async fn list_objects(&self) -> Result<Vec<StoredObjectRef>, FetchError> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut objects = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => objects.push(StoredObjectRef::new(name.clone(), name)),
                Err(raw) => debug!(name = ?raw, "skipping non-UTF-8 file name"),
            }
        }

        objects.sort_by(|a, b| a.stored_name.cmp(&b.stored_name));
        debug!(root = %self.root.display(), objects = objects.len(), "directory listed");
        Ok(objects)
    }

    async fn read_object(&self, object_id: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.object_path(object_id)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(object_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ObjectLister for DirectoryStore {
    fn list(&self) -> ListFuture<'_> {
        Box::pin(self.list_objects())
    }
}

impl ObjectFetcher for DirectoryStore {
    fn fetch(&self, object_id: &str) -> FetchFuture<'_> {
        let object_id = object_id.to_string();
        Box::pin(async move { self.read_object(&object_id).await })
    }
}
