use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;

use crate::advertisers::{Advertiser, AdvertiserCategory, AdvertiserRepository, Keyword};
use crate::matching::match_cache::MatchCache;
use crate::matching::matching_errors::Result;
use crate::matching::matching_model::MatchResult;
use crate::matching::tokenizer::build_tokens;

/// Weight of a category link before the primary boost.
const CATEGORY_LINK_WEIGHT: f64 = 0.6;
/// Boost applied when the link is the advertiser's primary category.
const CATEGORY_PRIMARY_BOOST: f64 = 1.2;
/// Weight of the aggregated category score when combined with keywords.
/// Applied on top of CATEGORY_LINK_WEIGHT, matching upstream behaviour.
const CATEGORY_COMBINE_WEIGHT: f64 = 0.6;
/// Nominal score for advertisers admitted on quality threshold alone.
const QUALITY_FALLBACK_SCORE: f64 = 0.1;

/// Matches a query's tokens against the advertiser catalog and produces
/// scored, reason-annotated candidates for the auction.
pub struct MatcherService {
    repository: AdvertiserRepository,
    cache: MatchCache,
}

impl MatcherService {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            repository: AdvertiserRepository::new(pool),
            cache: MatchCache::with_default_ttl(),
        }
    }

    /// Returns advertisers sorted by match score descending, each annotated
    /// with the reasons that contributed. Three batch queries against the
    /// catalog at most; repeated identical lookups within the cache TTL are
    /// served from memory.
    pub fn match_advertisers(&self, query: &str, quality_score: f64) -> Result<Vec<MatchResult>> {
        let normalized = query.trim().to_lowercase();
        let cache_key = MatchCache::key(&normalized, quality_score);
        if let Some(hit) = self.cache.get(&cache_key) {
            debug!("Match cache hit for query '{}'", normalized);
            return Ok(hit);
        }

        let tokens = build_tokens(query);

        let advertisers = self.repository.get_auto_bid_advertisers()?;
        let keywords = self.repository.find_keywords_matching(&tokens)?;
        let categories = self.repository.find_categories_matching(&tokens)?;
        let paths: Vec<String> = categories.into_iter().map(|c| c.path).collect();
        let links = self.repository.get_category_links(&paths)?;

        let results = score_catalog(advertisers, &keywords, &links, quality_score);
        debug!(
            "Matched {} advertisers for query '{}' ({} tokens)",
            results.len(),
            normalized,
            tokens.len()
        );

        self.cache.put(cache_key, results.clone());
        Ok(results)
    }

    pub fn cache_entry_count(&self) -> usize {
        self.cache.entry_count()
    }
}

/// Pure scoring over pre-fetched catalog rows.
///
/// Keyword contribution: match-type weight x (1 + priority/10), summed over
/// matched keywords. Category contribution: link weight (x primary boost),
/// summed, then discounted again at combine time. Advertisers with no hits
/// are kept at a nominal score only when the query's quality score meets
/// their configured minimum.
pub(crate) fn score_catalog(
    advertisers: Vec<Advertiser>,
    keywords: &[Keyword],
    links: &[AdvertiserCategory],
    quality_score: f64,
) -> Vec<MatchResult> {
    let mut keyword_hits: HashMap<&str, (f64, Vec<String>)> = HashMap::new();
    for kw in keywords {
        let contribution = kw.match_type.weight() * (1.0 + kw.priority as f64 / 10.0);
        let entry = keyword_hits
            .entry(kw.advertiser_id.as_str())
            .or_insert_with(|| (0.0, Vec::new()));
        entry.0 += contribution;
        entry.1.push(format!(
            "keyword '{}' ({} match, priority {})",
            kw.keyword,
            kw.match_type.as_str(),
            kw.priority
        ));
    }

    let mut category_hits: HashMap<&str, (f64, Vec<String>)> = HashMap::new();
    for link in links {
        let mut contribution = CATEGORY_LINK_WEIGHT;
        if link.is_primary {
            contribution *= CATEGORY_PRIMARY_BOOST;
        }
        let entry = category_hits
            .entry(link.advertiser_id.as_str())
            .or_insert_with(|| (0.0, Vec::new()));
        entry.0 += contribution;
        entry.1.push(format!(
            "category '{}'{}",
            link.category_path,
            if link.is_primary { " (primary)" } else { "" }
        ));
    }

    let mut results = Vec::new();
    for advertiser in advertisers {
        let (keyword_score, mut reasons) = keyword_hits
            .remove(advertiser.id.as_str())
            .unwrap_or((0.0, Vec::new()));
        let (category_score, category_reasons) = category_hits
            .remove(advertiser.id.as_str())
            .unwrap_or((0.0, Vec::new()));
        reasons.extend(category_reasons);

        let mut score = keyword_score + CATEGORY_COMBINE_WEIGHT * category_score;
        if score <= 0.0 {
            if quality_score >= advertiser.min_quality_score {
                score = QUALITY_FALLBACK_SCORE;
                reasons.push("quality threshold met".to_string());
            } else {
                continue;
            }
        }

        results.push(MatchResult {
            advertiser,
            score,
            reasons,
        });
    }

    // Stable sort keeps catalog fetch order for equal scores.
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advertisers::MatchType;

    fn advertiser(id: &str, min_quality: f64) -> Advertiser {
        Advertiser {
            id: id.to_string(),
            name: format!("Advertiser {id}"),
            landing_url: "https://example.com".to_string(),
            daily_budget: 1000.0,
            max_bid_per_keyword: 100.0,
            min_quality_score: min_quality,
            auto_bid_enabled: true,
            review_approved: false,
            recommended_bid_min: None,
            recommended_bid_max: None,
        }
    }

    fn keyword(advertiser_id: &str, text: &str, priority: i32, match_type: MatchType) -> Keyword {
        Keyword {
            id: format!("kw-{advertiser_id}-{text}"),
            advertiser_id: advertiser_id.to_string(),
            keyword: text.to_string(),
            priority,
            match_type,
        }
    }

    fn link(advertiser_id: &str, path: &str, is_primary: bool) -> AdvertiserCategory {
        AdvertiserCategory {
            id: format!("advcat-{advertiser_id}-{path}"),
            advertiser_id: advertiser_id.to_string(),
            category_path: path.to_string(),
            is_primary,
        }
    }

    #[test]
    fn test_keyword_score_weights() {
        let results = score_catalog(
            vec![advertiser("a", 1.0)],
            &[keyword("a", "shopping", 5, MatchType::Exact)],
            &[],
            0.0,
        );
        assert_eq!(results.len(), 1);
        // exact weight 1.0, priority weight 1.5
        assert!((results[0].score - 1.5).abs() < 1e-9);
        assert_eq!(
            results[0].reasons,
            vec!["keyword 'shopping' (exact match, priority 5)"]
        );
    }

    #[test]
    fn test_category_weight_is_discounted_twice() {
        let results = score_catalog(
            vec![advertiser("a", 1.0)],
            &[],
            &[link("a", "retail/fashion", true)],
            0.0,
        );
        assert_eq!(results.len(), 1);
        // 0.6 link weight x 1.2 primary boost x 0.6 combine weight
        assert!((results[0].score - 0.432).abs() < 1e-9);
    }

    #[test]
    fn test_quality_fallback_inclusion_and_exclusion() {
        let results = score_catalog(
            vec![advertiser("meets", 0.3), advertiser("misses", 0.9)],
            &[],
            &[],
            0.5,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].advertiser_id(), "meets");
        assert!((results[0].score - QUALITY_FALLBACK_SCORE).abs() < 1e-9);
        assert_eq!(results[0].reasons, vec!["quality threshold met"]);
    }

    #[test]
    fn test_ordering_is_descending_and_stable() {
        let results = score_catalog(
            vec![advertiser("first", 0.0), advertiser("second", 0.0), advertiser("top", 0.0)],
            &[
                keyword("first", "shopping", 3, MatchType::Broad),
                keyword("second", "shopping", 3, MatchType::Broad),
                keyword("top", "shopping", 5, MatchType::Exact),
            ],
            &[],
            0.0,
        );
        let ids: Vec<&str> = results.iter().map(|r| r.advertiser_id()).collect();
        // equal-score advertisers keep fetch order
        assert_eq!(ids, vec!["top", "first", "second"]);
    }

    #[test]
    fn test_keyword_and_category_scores_combine() {
        let results = score_catalog(
            vec![advertiser("a", 1.0)],
            &[keyword("a", "fashion", 2, MatchType::Phrase)],
            &[link("a", "retail/fashion", false)],
            0.0,
        );
        // phrase 0.85 x 1.2 + 0.6 x 0.6
        let expected = 0.85 * 1.2 + 0.6 * 0.6;
        assert!((results[0].score - expected).abs() < 1e-9);
        assert_eq!(results[0].reasons.len(), 2);
    }
}
