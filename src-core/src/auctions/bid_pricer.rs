use crate::auctions::auctions_constants::{GLOBAL_MAX_BID, GLOBAL_MIN_BID};
use crate::matching::MatchResult;

/// Converts a match into a bid price.
///
/// `round(max_bid_per_keyword x min(score, 1.0))`, clamped into the
/// advertiser's review-approved range when one exists, then into the global
/// bounds. Returns None when the resulting bid would be worthless; such
/// candidates are excluded from the auction.
pub fn price_bid(candidate: &MatchResult) -> Option<f64> {
    let advertiser = &candidate.advertiser;
    let mut bid = (advertiser.max_bid_per_keyword * candidate.score.min(1.0)).round();
    if bid <= 0.0 {
        return None;
    }

    if advertiser.review_approved {
        if let (Some(min), Some(max)) =
            (advertiser.recommended_bid_min, advertiser.recommended_bid_max)
        {
            bid = bid.clamp(min, max);
        }
    }

    Some(bid.clamp(GLOBAL_MIN_BID, GLOBAL_MAX_BID))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advertisers::Advertiser;

    fn candidate(max_bid: f64, score: f64, review: Option<(f64, f64)>) -> MatchResult {
        MatchResult {
            advertiser: Advertiser {
                id: "adv-1".to_string(),
                name: "Advertiser".to_string(),
                landing_url: "https://example.com".to_string(),
                daily_budget: 10_000.0,
                max_bid_per_keyword: max_bid,
                min_quality_score: 0.0,
                auto_bid_enabled: true,
                review_approved: review.is_some(),
                recommended_bid_min: review.map(|r| r.0),
                recommended_bid_max: review.map(|r| r.1),
            },
            score,
            reasons: Vec::new(),
        }
    }

    #[test]
    fn test_score_is_capped_at_one() {
        assert_eq!(price_bid(&candidate(200.0, 3.7, None)), Some(200.0));
    }

    #[test]
    fn test_partial_score_scales_the_bid() {
        assert_eq!(price_bid(&candidate(200.0, 0.5, None)), Some(100.0));
    }

    #[test]
    fn test_review_bounds_clamp() {
        assert_eq!(
            price_bid(&candidate(200.0, 1.0, Some((50.0, 120.0)))),
            Some(120.0)
        );
        assert_eq!(
            price_bid(&candidate(200.0, 0.1, Some((50.0, 120.0)))),
            Some(50.0)
        );
    }

    #[test]
    fn test_zero_bid_is_excluded() {
        assert_eq!(price_bid(&candidate(0.0, 1.0, None)), None);
        assert_eq!(price_bid(&candidate(3.0, 0.1, None)), None);
    }

    #[test]
    fn test_global_floor_applies() {
        // round(30 x 0.1) = 3, lifted to the global minimum
        assert_eq!(price_bid(&candidate(30.0, 0.2, None)), Some(GLOBAL_MIN_BID));
    }
}
