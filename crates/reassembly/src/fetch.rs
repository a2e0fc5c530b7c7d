//! Fan-out/fan-in retrieval of slice payloads.
//!
//! One task is spawned per slice. Each task owns exactly one output slot
//! (its position in the input), so results are placed by position and never
//! appended in completion order. The first failure cancels every sibling;
//! cancelling the caller's token does the same and yields
//! [`ReassemblyError::Cancelled`].

use std::sync::Arc;
use std::time::Duration;

use slicestore_slicing::SliceDescriptor;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::DEFAULT_FETCH_TIMEOUT;
use crate::error::{FetchError, ReassemblyError};
use crate::fetcher::ObjectFetcher;
use crate::progress::{FetchProgress, ProgressCallback};

/// Tuning for a fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Per-retrieval timeout. A timed-out retrieval fails like any other.
    pub timeout: Option<Duration>,
    /// Maximum retrievals in flight at once. `None` or `Some(0)` means no limit.
    pub max_concurrent: Option<usize>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_FETCH_TIMEOUT),
            max_concurrent: None,
        }
    }
}

/// Result of one retrieval task: its slot, its slice index, and the payload.
/// `None` means the task observed cancellation.
type TaskOutput = (usize, u32, Option<Result<Vec<u8>, FetchError>>);

/// Retrieves the payloads of a list of slices concurrently.
pub struct ConcurrentFetcher<F: ?Sized> {
    fetcher: Arc<F>,
    options: FetchOptions,
    progress: Option<ProgressCallback>,
}

impl<F: ObjectFetcher + ?Sized + 'static> ConcurrentFetcher<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            options: FetchOptions::default(),
            progress: None,
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers a callback invoked after every completed retrieval.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetches every slice and returns the payloads in input order.
    ///
    /// All-or-nothing: on failure or cancellation, payloads already received
    /// are dropped.
    pub async fn fetch_all(
        &self,
        slices: &[SliceDescriptor],
        cancel: &CancellationToken,
    ) -> Result<Vec<Vec<u8>>, ReassemblyError> {
        let mut slots: Vec<Option<Vec<u8>>> = (0..slices.len()).map(|_| None).collect();
        let mut fan_in = self.spawn_all(slices, cancel);

        while let Some(done) = fan_in.next().await {
            let (slot, payload) = done?;
            slots[slot] = Some(payload);
        }

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ReassemblyError::Task("retrieval finished without a payload".into()))
    }

    /// Fetches every slice and writes the payloads to `writer` in input order.
    ///
    /// Each payload is written as soon as every earlier one has been written,
    /// then released. Returns the number of bytes written. On failure the
    /// writer may hold a prefix of the output.
    pub async fn fetch_into<W>(
        &self,
        slices: &[SliceDescriptor],
        writer: &mut W,
        cancel: &CancellationToken,
    ) -> Result<u64, ReassemblyError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut pending: Vec<Option<Vec<u8>>> = (0..slices.len()).map(|_| None).collect();
        let mut next_slot = 0;
        let mut written: u64 = 0;
        let mut fan_in = self.spawn_all(slices, cancel);

        while let Some(done) = fan_in.next().await {
            let (slot, payload) = done?;
            pending[slot] = Some(payload);

            while let Some(payload) = pending.get_mut(next_slot).and_then(Option::take) {
                if let Err(e) = writer.write_all(&payload).await {
                    fan_in.abort().await;
                    return Err(e.into());
                }
                written += payload.len() as u64;
                next_slot += 1;
            }
        }

        if next_slot != slices.len() {
            return Err(ReassemblyError::Task(
                "retrieval finished without a payload".into(),
            ));
        }
        writer.flush().await?;
        Ok(written)
    }

    fn spawn_all(&self, slices: &[SliceDescriptor], cancel: &CancellationToken) -> FanIn<'_> {
        let siblings = cancel.child_token();
        let limiter = self
            .options
            .max_concurrent
            .filter(|n| *n > 0)
            .map(|n| Arc::new(Semaphore::new(n)));
        let mut tasks = JoinSet::new();

        for (slot, slice) in slices.iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let token = siblings.clone();
            let limiter = limiter.clone();
            let object_id = slice.object_id.clone();
            let index = slice.index;
            let timeout = self.options.timeout;

            tasks.spawn(async move {
                // biased: once cancelled, a retrieval that has not started is never issued.
                let result = tokio::select! {
                    biased;
                    _ = token.cancelled() => None,
                    result = retrieve(&*fetcher, &object_id, timeout, limiter) => Some(result),
                };
                (slot, index, result)
            });
        }

        debug!(slices = slices.len(), "retrievals spawned");
        FanIn {
            tasks,
            cancel: cancel.clone(),
            siblings,
            progress: self.progress.as_ref(),
            completed: 0,
            total: slices.len(),
            bytes: 0,
        }
    }
}

async fn retrieve<F: ObjectFetcher + ?Sized>(
    fetcher: &F,
    object_id: &str,
    timeout: Option<Duration>,
    limiter: Option<Arc<Semaphore>>,
) -> Result<Vec<u8>, FetchError> {
    let _permit = match limiter {
        Some(semaphore) => Some(
            semaphore
                .acquire_owned()
                .await
                .map_err(|e| FetchError::Io(std::io::Error::other(e)))?,
        ),
        None => None,
    };

    let fetch = fetcher.fetch(object_id);
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fetch)
            .await
            .unwrap_or_else(|_| Err(FetchError::Timeout(limit))),
        None => fetch.await,
    }
}

/// Collects the results of one fan-out.
struct FanIn<'a> {
    tasks: JoinSet<TaskOutput>,
    cancel: CancellationToken,
    siblings: CancellationToken,
    progress: Option<&'a ProgressCallback>,
    completed: usize,
    total: usize,
    bytes: u64,
}

impl FanIn<'_> {
    /// Waits for the next retrieval to finish.
    ///
    /// Returns `None` once every retrieval has succeeded. Any error aborts
    /// the remaining retrievals before it is returned.
    async fn next(&mut self) -> Option<Result<(usize, Vec<u8>), ReassemblyError>> {
        let joined = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            joined = self.tasks.join_next() => Some(joined?),
        };

        let outcome = match joined {
            None => Err(ReassemblyError::Cancelled),
            Some(Err(e)) => Err(ReassemblyError::Task(e.to_string())),
            Some(Ok((_, _, None))) => Err(ReassemblyError::Cancelled),
            Some(Ok((_, index, Some(Err(source))))) => {
                warn!(index, error = %source, "slice retrieval failed");
                Err(ReassemblyError::Retrieval { index, source })
            }
            Some(Ok((slot, index, Some(Ok(payload))))) => {
                self.completed += 1;
                self.bytes += payload.len() as u64;
                debug!(index, size = payload.len(), "slice retrieved");
                if let Some(progress) = self.progress {
                    progress(FetchProgress {
                        completed: self.completed,
                        total: self.total,
                        bytes: self.bytes,
                    });
                }
                return Some(Ok((slot, payload)));
            }
        };

        self.abort().await;
        Some(outcome)
    }

    /// Cancels every outstanding retrieval and waits for the tasks to stop.
    async fn abort(&mut self) {
        self.siblings.cancel();
        self.tasks.shutdown().await;
    }
}
