//! Client and request fingerprints
//!
//! Fingerprints are SHA-256 hex digests over their fields joined with a
//! unit separator, so `("ab", "c")` and `("a", "bc")` never collide.

use sha2::{Digest, Sha256};

const SEPARATOR: u8 = 0x1f;

fn digest<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            hasher.update([SEPARATOR]);
        }
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Identify a client by address and user agent
pub fn client(ip: &str, user_agent: &str) -> String {
    digest(["client", ip, user_agent])
}

/// Identify a cacheable request
///
/// `params` are sorted by name first, so their order does not matter.
pub fn request(url: &str, query: &str, params: &[(&str, String)], user_agent: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let params: Vec<String> = sorted
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    let params = params.join("&");

    digest(["request", url, query, &params, user_agent])
}
