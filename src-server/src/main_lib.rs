use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use reverso_core::{
    advertisers::{seed_demo_catalog, AdvertiserRepository},
    auctions::{AuctionRepository, AuctionService},
    db,
    delivery::DeliveryService,
    notifications::SettlementNotifier,
    settlement::{SettlementRepository, SettlementService},
    signing::ClickSigner,
    trades::TradeRepository,
};

pub struct AppState {
    pub auction_service: AuctionService,
    pub delivery_service: DeliveryService,
    pub settlement_service: SettlementService,
    pub auction_repository: AuctionRepository,
    pub advertiser_repository: AdvertiserRepository,
    pub trade_repository: TradeRepository,
    pub settlement_repository: SettlementRepository,
    pub click_signer: ClickSigner,
    pub notifier: SettlementNotifier,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;

    if config.seed_demo {
        let seeded = seed_demo_catalog(&pool)?;
        if seeded {
            tracing::info!("Demo catalog seeded");
        }
    }

    Ok(Arc::new(AppState {
        auction_service: AuctionService::new(pool.clone()),
        delivery_service: DeliveryService::new(pool.clone()),
        settlement_service: SettlementService::new(pool.clone()),
        auction_repository: AuctionRepository::new(pool.clone()),
        advertiser_repository: AdvertiserRepository::new(pool.clone()),
        trade_repository: TradeRepository::new(pool.clone()),
        settlement_repository: SettlementRepository::new(pool),
        click_signer: ClickSigner::new(config.click_secret.clone()),
        notifier: SettlementNotifier::new(config.notify_url.clone()),
    }))
}
