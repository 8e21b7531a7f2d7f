pub mod result_ext;

use sha2::{Digest as _, Sha256};

/// Hex encoded sha256 of the given bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Hex encoded sha256 over a sequence of fields
///
/// Each field is prefixed with its length so `["ab", "c"]` and `["a", "bc"]` hash differently
pub fn sha256_fields<'a>(fields: impl IntoIterator<Item = &'a [u8]>) -> String {
    let mut sha256 = Sha256::new();

    for field in fields {
        sha256.update((field.len() as u64).to_be_bytes());
        sha256.update(field);
    }

    hex::encode(sha256.finalize())
}
