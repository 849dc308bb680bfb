//! Content fingerprints used as review and session ids.

use sha2::{Digest, Sha256};

const FIELD_SEPARATOR: &[u8] = &[0x1f];

/// SHA-256 hex digest of the text with surrounding whitespace removed.
pub fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.trim().as_bytes()))
}

/// Stable id for a review input. Fields are separated so that moving text
/// between resume, role and job description changes the id.
pub fn review_fingerprint(resume_text: &str, target_role: Option<&str>, jd_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(resume_text.trim().as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(target_role.unwrap_or_default().trim().to_lowercase().as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(jd_text.trim().as_bytes());
    hex::encode(hasher.finalize())
}

/// True for a 64-character lowercase hex digest.
pub fn is_fingerprint(id: &str) -> bool {
    id.len() == 64 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
