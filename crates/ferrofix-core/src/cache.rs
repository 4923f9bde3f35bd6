//! Memoized tokenization keyed by code hash

use std::collections::HashMap;

use xxhash_rust::xxh3::xxh3_64;

use crate::tokens::Tokens;

/// Cache of token streams, keyed by the xxh3 hash of their code.
///
/// The runner regenerates code after every fixing pass; when a pass leaves
/// the code as it was, re-tokenizing is skipped.
#[derive(Debug, Default)]
pub struct TokensCache {
    entries: HashMap<u64, Tokens>,
}

impl TokensCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `code`, reusing a cached stream when the code matches.
    ///
    /// The returned stream is a fresh copy and is not flagged as changed.
    pub fn tokenize(&mut self, code: &str) -> Tokens {
        let hash = xxh3_64(code.as_bytes());
        if let Some(cached) = self.entries.get(&hash) {
            if cached.generate_code() == code {
                tracing::trace!(hash, "tokens cache hit");
                return cached.clone();
            }
        }

        let tokens = Tokens::from_code(code);
        self.entries.insert(hash, tokens.clone());
        tokens
    }

    /// Store a stream under the hash of its current code
    pub fn insert(&mut self, tokens: &Tokens) {
        let mut stored = tokens.clone();
        stored.clear_empty_tokens();
        stored.clear_changed();
        self.entries.insert(stored.code_hash(), stored);
    }

    pub fn has(&self, hash: u64) -> bool {
        self.entries.contains_key(&hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
