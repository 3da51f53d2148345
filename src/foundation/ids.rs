use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::Digest as _;

/// Sequential and hash-based identifier source for one document-build session.
///
/// Counters are atomic, so a generator can be shared across threads; two
/// sessions that must not interfere each own their own generator.
#[derive(Debug, Default)]
pub struct IdGenerator {
    resource: AtomicU64,
    text_style: AtomicU64,
}

impl IdGenerator {
    /// Fresh generator; the first resource id is `r1`, the first text style id `ts1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next resource id (`r1`, `r2`, ...).
    pub fn next_resource_id(&self) -> String {
        let n = self.resource.fetch_add(1, Ordering::SeqCst) + 1;
        format!("r{n}")
    }

    /// Rebase the resource counter so the next id is `r{start + 1}`.
    pub fn reset_counter(&self, start: u64) {
        self.resource.store(start, Ordering::SeqCst);
    }

    /// Next text style id (`ts1`, `ts2`, ...), independent of resource ids.
    pub fn next_text_style_id(&self) -> String {
        let n = self.text_style.fetch_add(1, Ordering::SeqCst) + 1;
        format!("ts{n}")
    }

    /// Rebase the text style counter so the next id is `ts{start + 1}`.
    pub fn reset_text_style_counter(&self, start: u64) {
        self.text_style.store(start, Ordering::SeqCst);
    }

    /// 32-char uppercase hex id derived from `prefix` and the current time.
    ///
    /// Uniqueness is probabilistic, not guaranteed.
    pub fn unique_id(&self, prefix: &str) -> String {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros())
            .unwrap_or_default();
        hash_hex(&format!("{prefix}-{micros}"))
    }
}

/// First 128 bits of SHA-256 over `input`, uppercase hex.
pub fn hash_hex(input: &str) -> String {
    let digest = sha2::Sha256::digest(input.as_bytes());
    let mut out = String::with_capacity(32);
    for b in &digest[..16] {
        out.push_str(&format!("{b:02X}"));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
