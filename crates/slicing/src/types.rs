use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::codec;

/// One physical object visible in remote storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredObjectRef {
    /// Name the object is stored under.
    pub stored_name: String,
    /// Opaque identifier used to retrieve the object's payload.
    pub object_id: String,
}

impl StoredObjectRef {
    pub fn new(stored_name: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            stored_name: stored_name.into(),
            object_id: object_id.into(),
        }
    }
}

/// A stored object whose name decoded as a slice.
///
/// Invariant: `1 <= index <= total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceDescriptor {
    pub original_name: String,
    pub index: u32,
    pub total: u32,
    pub stored_name: String,
    pub object_id: String,
}

impl SliceDescriptor {
    /// Decodes a stored object. Returns `None` when its name is not a slice.
    pub fn decode(object: &StoredObjectRef) -> Option<Self> {
        let name = codec::decode(&object.stored_name)?;
        Some(Self {
            original_name: name.original_name.to_owned(),
            index: name.index,
            total: name.total,
            stored_name: object.stored_name.clone(),
            object_id: object.object_id.clone(),
        })
    }
}

/// The slices currently observed for one logical file.
///
/// Every member shares the group's `original_name` and has an index within
/// its own declared total. Members may still disagree on `total` or repeat
/// an index; [`verify`](crate::completeness::verify) reports those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkGroup {
    original_name: String,
    slices: Vec<SliceDescriptor>,
}

impl ChunkGroup {
    /// Creates an empty group for `original_name`.
    pub fn new(original_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            slices: Vec::new(),
        }
    }

    /// Adds a slice to the group.
    ///
    /// Returns `false` (and leaves the group untouched) if the slice belongs
    /// to another logical file or its index is outside `1..=total`.
    pub fn insert(&mut self, slice: SliceDescriptor) -> bool {
        if slice.original_name != self.original_name
            || slice.index == 0
            || slice.index > slice.total
        {
            return false;
        }
        self.slices.push(slice);
        true
    }

    /// Name of the logical file.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Members in insertion order.
    pub fn slices(&self) -> &[SliceDescriptor] {
        &self.slices
    }

    /// Number of physical objects in the group.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Distinct totals declared by the members, ascending.
    pub fn declared_totals(&self) -> BTreeSet<u32> {
        self.slices.iter().map(|s| s.total).collect()
    }
}
