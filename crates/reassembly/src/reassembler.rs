//! Verify, order, fetch and merge one chunk group.

use std::sync::Arc;

use slicestore_slicing::{ChunkGroup, SliceDescriptor, order, verify};
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::content_type::detect_content_type;
use crate::error::ReassemblyError;
use crate::fetch::{ConcurrentFetcher, FetchOptions};
use crate::fetcher::ObjectFetcher;
use crate::merge::merge;
use crate::progress::ProgressCallback;
use crate::types::{ReconstructedFile, attach_metadata};

/// Rebuilds logical files from their slices.
///
/// Every operation checks the group first and fails with
/// [`ReassemblyError::Group`] before any retrieval is issued. Cancelling
/// the token returned by [`cancel_token`](Self::cancel_token) aborts
/// in-flight retrievals and yields [`ReassemblyError::Cancelled`].
pub struct Reassembler<F: ?Sized> {
    fetcher: ConcurrentFetcher<F>,
    cancel: CancellationToken,
}

impl<F: ObjectFetcher + ?Sized + 'static> Reassembler<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        Self {
            fetcher: ConcurrentFetcher::new(fetcher),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.fetcher = self.fetcher.with_options(options);
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.fetcher = self.fetcher.with_progress(callback);
        self
    }

    /// Uses `cancel` instead of a private token, e.g. to tie reassembly to
    /// the lifetime of a view.
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a cancellation token for this reassembler.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Rebuilds `group` in memory, inferring the content type from its name.
    pub async fn reassemble(&self, group: &ChunkGroup) -> Result<ReconstructedFile, ReassemblyError> {
        self.reassemble_as(group, detect_content_type(group.original_name()))
            .await
    }

    /// Rebuilds `group` in memory with an explicit content type.
    pub async fn reassemble_as(
        &self,
        group: &ChunkGroup,
        mime_type: &str,
    ) -> Result<ReconstructedFile, ReassemblyError> {
        let slices = prepare(group)?;
        let parts = self.fetcher.fetch_all(&slices, &self.cancel).await?;
        let bytes = merge(parts);

        info!(
            name = %group.original_name(),
            slices = slices.len(),
            size = bytes.len(),
            "file reassembled"
        );
        Ok(attach_metadata(bytes, group.original_name(), mime_type))
    }

    /// Streams `group` into `writer` in slice order without buffering the
    /// whole file. Returns the number of bytes written.
    pub async fn reassemble_into<W>(
        &self,
        group: &ChunkGroup,
        writer: &mut W,
    ) -> Result<u64, ReassemblyError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let slices = prepare(group)?;
        let written = self
            .fetcher
            .fetch_into(&slices, writer, &self.cancel)
            .await?;

        info!(
            name = %group.original_name(),
            slices = slices.len(),
            size = written,
            "file reassembled to writer"
        );
        Ok(written)
    }
}

/// Checks the group and returns its slices in index order.
fn prepare(group: &ChunkGroup) -> Result<Vec<SliceDescriptor>, ReassemblyError> {
    if let Err(defect) = verify(group) {
        warn!(name = %group.original_name(), error = %defect, "refusing to reassemble");
        return Err(defect.into());
    }
    Ok(order(group))
}

/// Rebuilds `group` with default options, reporting progress to `progress`.
pub async fn reassemble<F>(
    group: &ChunkGroup,
    fetcher: Arc<F>,
    progress: Option<ProgressCallback>,
) -> Result<ReconstructedFile, ReassemblyError>
where
    F: ObjectFetcher + ?Sized + 'static,
{
    let mut reassembler = Reassembler::new(fetcher);
    if let Some(progress) = progress {
        reassembler = reassembler.with_progress(progress);
    }
    reassembler.reassemble(group).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use slicestore_slicing::{GroupDefect, StoredObjectRef, group_slices};

    use crate::error::FetchError;
    use crate::fetcher::FetchFuture;

    /// In-memory object store counting every retrieval issued.
    struct MemoryStore {
        objects: HashMap<String, Vec<u8>>,
        calls: AtomicUsize,
    }

    impl MemoryStore {
        fn new(objects: &[(&str, &str)]) -> Self {
            Self {
                objects: objects
                    .iter()
                    .map(|(id, data)| (id.to_string(), data.as_bytes().to_vec()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ObjectFetcher for MemoryStore {
        fn fetch(&self, object_id: &str) -> FetchFuture<'_> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self
                .objects
                .get(object_id)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(object_id.to_string()));
            Box::pin(async move { result })
        }
    }

    fn group_of(listing: &[(&str, &str)], name: &str) -> ChunkGroup {
        let refs: Vec<StoredObjectRef> = listing
            .iter()
            .map(|(stored, id)| StoredObjectRef::new(*stored, *id))
            .collect();
        group_slices(&refs).remove(name).unwrap()
    }

    #[tokio::test]
    async fn reassembles_and_infers_content_type() {
        let store = Arc::new(MemoryStore::new(&[("1", "AA"), ("2", "BB"), ("3", "CC")]));
        let group = group_of(
            &[
                ("report.pdf.part3of3", "3"),
                ("report.pdf.part1of3", "1"),
                ("report.pdf.part2of3", "2"),
            ],
            "report.pdf",
        );

        let file = Reassembler::new(store).reassemble(&group).await.unwrap();
        assert_eq!(file.name, "report.pdf");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.bytes, b"AABBCC");
    }

    #[tokio::test]
    async fn explicit_content_type() {
        let store = Arc::new(MemoryStore::new(&[("1", "x")]));
        let group = group_of(&[("blob.part1of1", "1")], "blob");
        let file = Reassembler::new(store)
            .reassemble_as(&group, "text/plain")
            .await
            .unwrap();
        assert_eq!(file.mime_type, "text/plain");
    }

    #[tokio::test]
    async fn incomplete_group_issues_no_fetch() {
        let store = Arc::new(MemoryStore::new(&[("1", "AA"), ("3", "CC")]));
        let group = group_of(
            &[("report.pdf.part1of3", "1"), ("report.pdf.part3of3", "3")],
            "report.pdf",
        );

        let err = Reassembler::new(Arc::clone(&store))
            .reassemble(&group)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReassemblyError::Group(GroupDefect::IncompleteGroup { .. })
        ));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn inconsistent_total_reported_distinctly() {
        let store = Arc::new(MemoryStore::new(&[("1", "A"), ("2", "B")]));
        let group = group_of(&[("f.part1of2", "1"), ("f.part2of3", "2")], "f");
        let err = Reassembler::new(store).reassemble(&group).await.unwrap_err();
        assert!(matches!(
            err,
            ReassemblyError::Group(GroupDefect::InconsistentTotal { .. })
        ));
    }

    #[tokio::test]
    async fn streams_into_writer() {
        let store = Arc::new(MemoryStore::new(&[("a", "he"), ("b", "llo"), ("c", "")]));
        let group = group_of(
            &[
                ("greeting.txt.part2of3", "b"),
                ("greeting.txt.part3of3", "c"),
                ("greeting.txt.part1of3", "a"),
            ],
            "greeting.txt",
        );

        let mut out = Vec::new();
        let written = Reassembler::new(store)
            .reassemble_into(&group, &mut out)
            .await
            .unwrap();
        assert_eq!(written, 5);
        assert_eq!(out, b"hello");
    }

    #[tokio::test]
    async fn free_function_reports_progress() {
        let store = Arc::new(MemoryStore::new(&[("1", "AA"), ("2", "BB")]));
        let group = group_of(&[("x.part1of2", "1"), ("x.part2of2", "2")], "x");
        let reports = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reports);

        let file = reassemble(
            &group,
            store,
            Some(Box::new(move |_: crate::progress::FetchProgress| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        )
        .await
        .unwrap();
        assert_eq!(file.bytes, b"AABB");
        assert_eq!(reports.load(Ordering::SeqCst), 2);
    }
}
