use sha2::{Digest, Sha256};

/// Concatenates payloads in the given order, byte-exact, without separators.
pub fn merge(parts: Vec<Vec<u8>>) -> Vec<u8> {
    let len = parts.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(len);
    for part in parts {
        merged.extend_from_slice(&part);
    }
    merged
}

/// Computes SHA-256 of `data` and returns the hex-encoded digest.
pub fn checksum_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
