//! Token generation for task records.
//!
//! Tokens have the format `<prefix>-<hash>` where hash is base36 lowercase
//! (0-9, a-z). They replace the ad-hoc `job-<jobid>-<timestamp>-<random>`
//! string templating the tracker used to scatter at call sites: the engine
//! owns one injected `TokenGenerator` and every generated id goes through it.
//!
//! Job-task tokens only need to be unique within one job's task set
//! (lookups are scoped by job id), so collisions across jobs are harmless.

use sha2::{Digest, Sha256};

/// Token generation configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Token prefix (e.g. "jt" for job tasks, "custom" for custom tasks).
    pub prefix: String,
    /// Hash length in base36 characters.
    pub length: usize,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            prefix: "jt".to_string(),
            length: 8,
        }
    }
}

/// Generator producing unique tokens within a caller-supplied scope.
#[derive(Debug, Clone, Default)]
pub struct TokenGenerator {
    config: TokenConfig,
}

impl TokenGenerator {
    #[must_use]
    pub const fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::new(TokenConfig {
            prefix: prefix.into(),
            ..Default::default()
        })
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    /// Generate a token for `seed`, retrying with increasing nonces while
    /// the `exists` checker reports a collision.
    pub fn generate<F>(&self, seed: &str, exists: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        self.generate_with_prefix(&self.config.prefix, seed, exists)
    }

    /// Generate a token under an explicit prefix (same collision loop).
    pub fn generate_with_prefix<F>(&self, prefix: &str, seed: &str, exists: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let mut nonce: u32 = 0;
        loop {
            let hash = compute_token(&format!("{seed}|{nonce}"), self.config.length);
            let token = format!("{prefix}-{hash}");
            if !exists(&token) {
                return token;
            }
            nonce += 1;
            // Exhausting the base36 space at length 8 takes ~2.8e12 seeds;
            // past the threshold, widen the token with the nonce so it
            // leaves the saturated namespace. Widened candidates still go
            // through the same exists check before being handed out.
            if nonce > 10_000 {
                let widened = format!("{token}-{nonce}");
                if !exists(&widened) {
                    return widened;
                }
            }
        }
    }
}

/// Compute a base36 hash of the input string with a specific length.
///
/// Uses SHA256 on the input, takes the first 8 bytes as a u64, encodes as
/// base36, and truncates/pads to the requested length.
#[must_use]
pub fn compute_token(input: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();

    let mut num = 0u64;
    for &byte in result.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    let mut s = base36_encode(num);
    if s.len() < length {
        s = format!("{s:0>length$}");
    }
    s.chars().take(length).collect()
}

fn base36_encode(mut num: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while num > 0 {
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    chars.into_iter().rev().collect()
}
