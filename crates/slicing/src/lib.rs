//! Identification and verification of sliced files.
//!
//! Oversized files are stored as several objects named
//! `<original_name>.part<index>of<total>`. This crate turns a flat listing
//! of stored objects back into logical files:
//!
//! 1. **Decode**: [`codec`] recognises slice names
//! 2. **Group**: [`grouping`] collects slices by original name
//! 3. **Verify**: [`completeness`] checks every index `1..=total` is present once
//! 4. **Order**: [`ordering`] sorts a group by slice index
//!
//! Everything here is synchronous and performs no I/O. Fetching and merging
//! the payloads lives in `slicestore-reassembly`.

pub mod codec;
pub mod completeness;
pub mod grouping;
pub mod ordering;
pub mod summary;
pub mod types;

pub use codec::{SLICE_DELIMITER, SliceName, decode, encode};
pub use completeness::{GroupDefect, MISSING_REPORTED, find_incomplete, is_complete, verify};
pub use grouping::{GroupedListing, group_and_check, group_slices};
pub use ordering::order;
pub use summary::{GroupSummary, summarize};
pub use types::{ChunkGroup, SliceDescriptor, StoredObjectRef};
