//! Partitioning a storage listing into chunk groups.
//!
//! Groups are derived from the listing on every call and never cached; the
//! membership of each group is deterministic, the map's iteration order is not.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::completeness::{GroupDefect, verify};
use crate::types::{ChunkGroup, SliceDescriptor, StoredObjectRef};

/// Groups the slices in a listing by original name.
///
/// Objects whose names are not slices are skipped.
pub fn group_slices<'a>(
    objects: impl IntoIterator<Item = &'a StoredObjectRef>,
) -> HashMap<String, ChunkGroup> {
    let mut groups: HashMap<String, ChunkGroup> = HashMap::new();
    for object in objects {
        let Some(slice) = SliceDescriptor::decode(object) else {
            continue;
        };
        groups
            .entry(slice.original_name.clone())
            .or_insert_with(|| ChunkGroup::new(slice.original_name.clone()))
            .insert(slice);
    }
    groups
}

/// A listing split into reconstructable and defective groups.
#[derive(Debug, Default)]
pub struct GroupedListing {
    /// Groups that passed verification, keyed by original name.
    pub complete: HashMap<String, ChunkGroup>,
    /// Names of the groups that failed verification, sorted.
    pub incomplete: Vec<String>,
    /// Why each incomplete group failed.
    pub defects: BTreeMap<String, GroupDefect>,
}

/// Groups a listing and verifies every group.
pub fn group_and_check<'a>(
    objects: impl IntoIterator<Item = &'a StoredObjectRef>,
) -> GroupedListing {
    let mut listing = GroupedListing::default();

    for (name, group) in group_slices(objects) {
        match verify(&group) {
            Ok(()) => {
                listing.complete.insert(name, group);
            }
            Err(defect) => {
                if defect.is_corrupted() {
                    warn!(name = %name, error = %defect, "corrupted chunk group");
                } else {
                    debug!(name = %name, error = %defect, "partial chunk group");
                }
                listing.defects.insert(name, defect);
            }
        }
    }

    listing.incomplete = listing.defects.keys().cloned().collect();
    debug!(
        complete = listing.complete.len(),
        incomplete = listing.incomplete.len(),
        "listing grouped"
    );
    listing
}
