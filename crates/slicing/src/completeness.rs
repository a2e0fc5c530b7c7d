//! Completeness checks for chunk groups.
//!
//! A group is complete when it is non-empty, every member declares the same
//! total `T`, and the member indices are exactly `{1, ..., T}` with no index
//! claimed twice. Duplicates are never resolved by picking one of them.

use std::collections::{BTreeMap, HashMap};

use crate::types::ChunkGroup;

/// Upper bound on the absent indices listed in [`GroupDefect::IncompleteGroup`].
///
/// The total comes from stored names, so it can be as large as `u32::MAX`.
pub const MISSING_REPORTED: usize = 32;

/// Why a chunk group cannot be reconstructed.
///
/// Checked in declaration order: the first applicable defect is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupDefect {
    #[error("chunk group {name} has no slices")]
    Empty { name: String },

    /// Members disagree on how many slices the file has.
    #[error("chunk group {name} declares conflicting totals {totals:?}")]
    InconsistentTotal { name: String, totals: Vec<u32> },

    /// More than one physical object claims the same index.
    #[error("chunk group {name} has several objects for slice index {indices:?}")]
    DuplicateIndex { name: String, indices: Vec<u32> },

    /// Some indices have not been observed (yet).
    ///
    /// `missing` holds at most [`MISSING_REPORTED`] of the lowest absent
    /// indices; `missing_count` is the full number.
    #[error(
        "chunk group {name} is incomplete: {received}/{total} slices, \
         {missing_count} missing, first {missing:?}"
    )]
    IncompleteGroup {
        name: String,
        received: usize,
        total: u32,
        missing: Vec<u32>,
        missing_count: u32,
    },
}

impl GroupDefect {
    /// Name of the logical file the defect refers to.
    pub fn name(&self) -> &str {
        match self {
            Self::Empty { name }
            | Self::InconsistentTotal { name, .. }
            | Self::DuplicateIndex { name, .. }
            | Self::IncompleteGroup { name, .. } => name,
        }
    }

    /// `true` for defects that more uploads cannot fix.
    pub fn is_corrupted(&self) -> bool {
        matches!(
            self,
            Self::InconsistentTotal { .. } | Self::DuplicateIndex { .. }
        )
    }
}

/// Checks a group and reports the first defect found.
pub fn verify(group: &ChunkGroup) -> Result<(), GroupDefect> {
    let name = group.original_name();
    let Some(first) = group.slices().first() else {
        return Err(GroupDefect::Empty { name: name.into() });
    };

    let totals = group.declared_totals();
    if totals.len() > 1 {
        return Err(GroupDefect::InconsistentTotal {
            name: name.into(),
            totals: totals.into_iter().collect(),
        });
    }
    let total = first.total;

    let mut claims: BTreeMap<u32, usize> = BTreeMap::new();
    for slice in group.slices() {
        *claims.entry(slice.index).or_default() += 1;
    }

    let duplicated: Vec<u32> = claims
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(index, _)| *index)
        .collect();
    if !duplicated.is_empty() {
        return Err(GroupDefect::DuplicateIndex {
            name: name.into(),
            indices: duplicated,
        });
    }

    // Indices are unique and within 1..=total here, so the gap count
    // follows from the member count alone.
    let received = group.len();
    let missing_count = total.saturating_sub(u32::try_from(received).unwrap_or(u32::MAX));
    if missing_count > 0 {
        return Err(GroupDefect::IncompleteGroup {
            name: name.into(),
            received,
            total,
            missing: first_gaps(claims.keys().copied(), total, MISSING_REPORTED),
            missing_count,
        });
    }

    Ok(())
}

/// Lowest `limit` indices in `1..=total` absent from the ascending `present`.
///
/// Walks the gaps between present indices, so the work is bounded by
/// `present.len() + limit` whatever the declared total.
fn first_gaps(present: impl Iterator<Item = u32>, total: u32, limit: usize) -> Vec<u32> {
    let mut gaps = Vec::new();
    let mut next = 1u64;
    let end = u64::from(total) + 1;
    for index in present.map(u64::from).chain(std::iter::once(end)) {
        while next < index {
            if gaps.len() == limit {
                return gaps;
            }
            // next < index <= total + 1, so it fits in a u32.
            gaps.push(next as u32);
            next += 1;
        }
        next = index + 1;
    }
    gaps
}

/// Returns `true` if the group can be reconstructed.
pub fn is_complete(group: &ChunkGroup) -> bool {
    verify(group).is_ok()
}

/// Names of the groups failing [`verify`], sorted.
pub fn find_incomplete(groups: &HashMap<String, ChunkGroup>) -> Vec<String> {
    let mut names: Vec<String> = groups
        .iter()
        .filter(|(_, group)| !is_complete(group))
        .map(|(name, _)| name.clone())
        .collect();
    names.sort();
    names
}
