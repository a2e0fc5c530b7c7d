use std::path::{Path, PathBuf};

use slicestore_reassembly::FetchError;
use slicestore_slicing::StoredObjectRef;
use tracing::debug;

use crate::lister::{ListFuture, ObjectLister};

/// A storage listing kept in a JSON file:
/// `[{"stored_name": "...", "object_id": "..."}, ...]`.
///
/// The file is re-read on every [`list`](ObjectLister::list) call.
#[derive(Debug, Clone)]
pub struct JsonListing {
    path: PathBuf,
}

impl JsonListing {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses listing JSON.
    pub fn parse(data: &[u8]) -> Result<Vec<StoredObjectRef>, FetchError> {
        serde_json::from_slice(data).map_err(|e| FetchError::Malformed(e.to_string()))
    }

    async fn load(&self) -> Result<Vec<StoredObjectRef>, FetchError> {
        let data = tokio::fs::read(&self.path).await?;
        let objects = Self::parse(&data)?;
        debug!(path = %self.path.display(), objects = objects.len(), "listing loaded");
        Ok(objects)
    }
}

impl ObjectLister for JsonListing {
    fn list(&self) -> ListFuture<'_> {
        Box::pin(self.load())
    }
}
