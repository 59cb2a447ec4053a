use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::signing::signing_errors::{Result, SigningError};

type HmacSha256 = Hmac<Sha256>;

/// Payout for a platform-owned (fallback) bid click.
pub const PLATFORM_CLICK_PAYOUT: f64 = 50.0;

/// Who funds the click payout. ADVERTISER payouts equal the winning bid
/// price; PLATFORM payouts are the fixed constant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BidType {
    Platform,
    Advertiser,
}

impl BidType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidType::Platform => "PLATFORM",
            BidType::Advertiser => "ADVERTISER",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "PLATFORM" => Ok(BidType::Platform),
            "ADVERTISER" => Ok(BidType::Advertiser),
            other => Err(SigningError::UnknownBidType(other.to_string())),
        }
    }
}

/// Produces and validates HMAC-SHA256 tokens binding a bid id, payout amount
/// and bid type. A valid token authorizes a reward claim at redirect time
/// without a database round trip for authorization.
pub struct ClickSigner {
    secret: String,
}

impl ClickSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn sign(&self, bid_id: &str, payout: f64, bid_type: BidType) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
        mac.update(claim_payload(bid_id, payout, bid_type).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Recomputes the HMAC and compares in constant time. Malformed hex or a
    /// mismatching digest both read as an invalid signature.
    pub fn verify(&self, bid_id: &str, payout: f64, bid_type: BidType, signature: &str) -> bool {
        let Ok(raw_sig) = hex::decode(signature) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(self.secret.as_bytes()) else {
            return false;
        };
        mac.update(claim_payload(bid_id, payout, bid_type).as_bytes());
        mac.verify_slice(&raw_sig).is_ok()
    }
}

fn claim_payload(bid_id: &str, payout: f64, bid_type: BidType) -> String {
    format!(
        "{}.{}.{}",
        bid_id,
        format_payout(payout),
        bid_type.as_str()
    )
}

/// Whole payouts are rendered without a fractional part so tokens agree
/// across clients that send `500` rather than `500.0`.
fn format_payout(payout: f64) -> String {
    if payout.fract() == 0.0 {
        format!("{:.0}", payout)
    } else {
        payout.to_string()
    }
}
