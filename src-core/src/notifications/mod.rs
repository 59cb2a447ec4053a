use std::time::Duration;

use log::{debug, warn};

use crate::settlement::SettlementOutcome;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(2);

/// Mirrors committed settlements to the user-facing collaborator.
///
/// Strictly best-effort: the primary settlement transaction has already
/// committed by the time this runs, so failures are logged and swallowed,
/// never rolled back.
pub struct SettlementNotifier {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl SettlementNotifier {
    /// `endpoint` of None disables mirroring entirely.
    pub fn new(endpoint: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(NOTIFY_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, endpoint }
    }

    pub async fn notify_settlement(&self, outcome: &SettlementOutcome) {
        let Some(endpoint) = &self.endpoint else {
            return;
        };

        match self.client.post(endpoint).json(outcome).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!("Mirrored settlement for trade {}", outcome.trade_id);
            }
            Ok(resp) => {
                warn!(
                    "Settlement mirror for trade {} returned {}",
                    outcome.trade_id,
                    resp.status()
                );
            }
            Err(e) => {
                warn!(
                    "Settlement mirror for trade {} failed: {}",
                    outcome.trade_id, e
                );
            }
        }
    }
}
