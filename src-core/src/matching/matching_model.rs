use serde::Serialize;

use crate::advertisers::Advertiser;

/// Result of matching one advertiser against a query. Ephemeral: recomputed
/// per query (or served from the short-TTL cache), never persisted.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub advertiser: Advertiser,
    pub score: f64,
    pub reasons: Vec<String>,
}

impl MatchResult {
    pub fn advertiser_id(&self) -> &str {
        &self.advertiser.id
    }
}
