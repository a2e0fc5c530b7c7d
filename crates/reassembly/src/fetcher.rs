//! Object retrieval seam.
//!
//! Callers implement [`ObjectFetcher`] on top of whatever transport reaches
//! their storage. Keeping it a trait lets reassembly run against mocks in
//! tests and against HTTP or local stores in production.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::FetchError;

/// Boxed future returned by [`ObjectFetcher::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, FetchError>> + Send + 'a>>;

/// Retrieves the payload of one stored object by id.
pub trait ObjectFetcher: Send + Sync {
    /// Fetches the full payload of `object_id`.
    ///
    /// The returned future is dropped when the retrieval is cancelled, so
    /// implementations should release their resources on drop.
    fn fetch(&self, object_id: &str) -> FetchFuture<'_>;
}

impl<F: ObjectFetcher + ?Sized> ObjectFetcher for Arc<F> {
    fn fetch(&self, object_id: &str) -> FetchFuture<'_> {
        (**self).fetch(object_id)
    }
}

impl<F: ObjectFetcher + ?Sized> ObjectFetcher for Box<F> {
    fn fetch(&self, object_id: &str) -> FetchFuture<'_> {
        (**self).fetch(object_id)
    }
}
