use std::future::Future;
use std::pin::Pin;

use slicestore_reassembly::FetchError;
use slicestore_slicing::StoredObjectRef;

/// Boxed future returned by [`ObjectLister::list`].
pub type ListFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<StoredObjectRef>, FetchError>> + Send + 'a>>;

/// Enumerates the objects held by a storage backend.
pub trait ObjectLister: Send + Sync {
    fn list(&self) -> ListFuture<'_>;
}
