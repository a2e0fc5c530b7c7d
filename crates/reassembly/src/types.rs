use crate::merge::checksum_bytes;

/// A logical file rebuilt from its slices.
///
/// Owned by the caller; the reassembly machinery keeps no reference to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructedFile {
    /// Original (logical) file name.
    pub name: String,
    /// Content type, e.g. `application/pdf`.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ReconstructedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hex SHA-256 of the reconstructed bytes.
    pub fn sha256(&self) -> String {
        checksum_bytes(&self.bytes)
    }
}

/// Binds merged bytes to a name and content type. No I/O.
pub fn attach_metadata(
    bytes: Vec<u8>,
    original_name: impl Into<String>,
    mime_type: impl Into<String>,
) -> ReconstructedFile {
    ReconstructedFile {
        name: original_name.into(),
        mime_type: mime_type.into(),
        bytes,
    }
}
