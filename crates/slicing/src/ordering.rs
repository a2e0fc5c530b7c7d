use crate::types::{ChunkGroup, SliceDescriptor};

/// Returns the group's slices sorted ascending by index.
///
/// Reconstruction must only order groups that passed
/// [`verify`](crate::completeness::verify); display code may order partial
/// groups. Slices sharing an index keep their listing order.
pub fn order(group: &ChunkGroup) -> Vec<SliceDescriptor> {
    let mut slices = group.slices().to_vec();
    slices.sort_by_key(|s| s.index);
    slices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_slices;
    use crate::types::StoredObjectRef;

    #[test]
    fn orders_complete_group() {
        let listing: Vec<StoredObjectRef> = [5, 2, 4, 1, 3]
            .iter()
            .map(|i| StoredObjectRef::new(format!("f.part{i}of5"), format!("id-{i}")))
            .collect();
        let groups = group_slices(&listing);

        let indices: Vec<u32> = order(&groups["f"]).iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn orders_partial_group() {
        let listing = vec![
            StoredObjectRef::new("f.part7of7", "c"),
            StoredObjectRef::new("f.part2of7", "a"),
            StoredObjectRef::new("f.part4of7", "b"),
        ];
        let groups = group_slices(&listing);

        let ordered = order(&groups["f"]);
        let ids: Vec<&str> = ordered.iter().map(|s| s.object_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
