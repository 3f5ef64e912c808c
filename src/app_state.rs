// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every request handler through `Arc<AppState>`. The only mutable
// part is the kline cache, which manages its own locking.
// =============================================================================

use anyhow::Result;
use tracing::info;

use crate::binance::BinanceClient;
use crate::catalog::InstrumentCatalog;
use crate::market_data::KlineCache;
use crate::runtime_config::AnalystConfig;

pub struct AppState {
    pub config: AnalystConfig,
    pub catalog: InstrumentCatalog,
    pub client: BinanceClient,
    pub cache: KlineCache,
}

impl AppState {
    pub fn new(config: AnalystConfig) -> Result<Self> {
        let client = BinanceClient::new(config.client_options())?;
        let catalog = InstrumentCatalog::new(config.instruments.clone());
        let cache = KlineCache::new(config.cache_ttl());

        info!(
            instruments = catalog.len(),
            cache_ttl_secs = config.cache_ttl_secs,
            base_url = %client.base_url(),
            "application state ready"
        );

        Ok(Self {
            config,
            catalog,
            client,
            cache,
        })
    }
}
