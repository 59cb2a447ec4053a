use std::time::{Duration, Instant};

use dashmap::DashMap;
use sha2::{Digest, Sha256};

use crate::matching::matching_model::MatchResult;

const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    results: Vec<MatchResult>,
    inserted_at: Instant,
}

/// Short-TTL cache over match results, keyed by a hash of the normalized
/// query and the quality score. Entries only ever leave by expiry; catalog
/// writes do not invalidate (staleness within the TTL is accepted).
pub struct MatchCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl MatchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL)
    }

    /// Cache key for a (normalized query, quality score) pair.
    pub fn key(normalized_query: &str, quality_score: f64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalized_query.as_bytes());
        hasher.update(format!("|{:.4}", quality_score).as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Option<Vec<MatchResult>> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.results.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    pub fn put(&self, key: String, results: Vec<MatchResult>) {
        self.entries.insert(
            key,
            CacheEntry {
                results,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for MatchCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}
