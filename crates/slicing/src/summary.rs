use serde::Serialize;

use crate::completeness::is_complete;
use crate::ordering::order;
use crate::types::ChunkGroup;

/// Display information for a chunk group, complete or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub original_name: String,
    /// Largest total declared by any member (0 for an empty group).
    pub total: u32,
    /// Number of physical objects observed.
    pub received: usize,
    /// Indices of the observed objects, ascending. Repeats are kept.
    pub indices: Vec<u32>,
    pub complete: bool,
    /// `original_name` when complete, otherwise `"<name> (<received>/<total>)"`.
    pub display_name: String,
}

/// Summarises a group for listings such as "3/7 parts received".
pub fn summarize(group: &ChunkGroup) -> GroupSummary {
    let total = group.declared_totals().last().copied().unwrap_or(0);
    let indices: Vec<u32> = order(group).iter().map(|s| s.index).collect();
    let received = indices.len();
    let complete = is_complete(group);
    let display_name = if complete {
        group.original_name().to_owned()
    } else {
        format!("{} ({received}/{total})", group.original_name())
    };

    GroupSummary {
        original_name: group.original_name().to_owned(),
        total,
        received,
        indices,
        complete,
        display_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_slices;
    use crate::types::StoredObjectRef;

    #[test]
    fn complete_group_uses_plain_name() {
        let listing = vec![
            StoredObjectRef::new("a.zip.part1of2", "1"),
            StoredObjectRef::new("a.zip.part2of2", "2"),
        ];
        let s = summarize(&group_slices(&listing)["a.zip"]);
        assert!(s.complete);
        assert_eq!(s.total, 2);
        assert_eq!(s.received, 2);
        assert_eq!(s.display_name, "a.zip");
    }

    #[test]
    fn partial_group_shows_progress() {
        let listing = vec![
            StoredObjectRef::new("movie.mkv.part1of7", "1"),
            StoredObjectRef::new("movie.mkv.part2of7", "2"),
            StoredObjectRef::new("movie.mkv.part5of7", "5"),
        ];
        let s = summarize(&group_slices(&listing)["movie.mkv"]);
        assert!(!s.complete);
        assert_eq!(s.indices, vec![1, 2, 5]);
        assert_eq!(s.display_name, "movie.mkv (3/7)");
    }

    #[test]
    fn listing_order_does_not_leak_into_indices() {
        let listing = vec![
            StoredObjectRef::new("a.zip.part3of3", "3"),
            StoredObjectRef::new("a.zip.part1of3", "1"),
            StoredObjectRef::new("a.zip.part3of3", "3b"),
        ];
        let s = summarize(&group_slices(&listing)["a.zip"]);
        assert_eq!(s.indices, vec![1, 3, 3]);
        assert_eq!(s.received, 3);
        assert!(!s.complete);
    }

    #[test]
    fn huge_total_summarizes_quickly() {
        let listing = vec![StoredObjectRef::new("huge.bin.part1of4294967295", "1")];
        let s = summarize(&group_slices(&listing)["huge.bin"]);
        assert_eq!(s.total, u32::MAX);
        assert_eq!(s.indices, vec![1]);
        assert_eq!(s.display_name, "huge.bin (1/4294967295)");
    }

    #[test]
    fn empty_group() {
        let s = summarize(&ChunkGroup::new("ghost"));
        assert_eq!(s.total, 0);
        assert!(s.indices.is_empty());
        assert_eq!(s.display_name, "ghost (0/0)");
    }
}
