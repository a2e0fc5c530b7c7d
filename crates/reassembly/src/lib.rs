//! Concurrent retrieval and reassembly of sliced files.
//!
//! A verified [`ChunkGroup`](slicestore_slicing::ChunkGroup) is turned into
//! a [`ReconstructedFile`] by fetching every slice in parallel through an
//! [`ObjectFetcher`] and concatenating the payloads in index order.
//!
//! # Pipeline
//!
//! 1. **Verify**: reject incomplete or corrupted groups before any I/O
//! 2. **Order**: sort slices by index
//! 3. **Fetch**: one retrieval per slice, all in flight at once, fail-fast
//! 4. **Merge**: concatenate in index order and attach name + content type

mod content_type;
mod error;
mod fetch;
mod fetcher;
mod merge;
mod progress;
mod reassembler;
mod types;
mod validation;

pub use content_type::{DEFAULT_CONTENT_TYPE, detect_content_type};
pub use error::{FetchError, ReassemblyError};
pub use fetch::{ConcurrentFetcher, FetchOptions};
pub use fetcher::{FetchFuture, ObjectFetcher};
pub use merge::{checksum_bytes, merge};
pub use progress::{FetchProgress, ProgressCallback, ThroughputMeter};
pub use reassembler::{Reassembler, reassemble};
pub use types::{ReconstructedFile, attach_metadata};
pub use validation::validate_output_name;

use std::time::Duration;

/// Default per-retrieval timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);
