// =============================================================================
// Instrument Catalog — supported trading pairs and their display names
// =============================================================================

use serde::{Deserialize, Serialize};

/// One tradable pair as shown in the instrument picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Exchange ticker, e.g. "BTCUSDT".
    pub symbol: String,
    /// Human-readable name, e.g. "Bitcoin".
    pub name: String,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

const DEFAULT_PAIRS: &[(&str, &str)] = &[
    ("BTCUSDT", "Bitcoin"),
    ("ETHUSDT", "Ethereum"),
    ("BNBUSDT", "Binance Coin"),
    ("SOLUSDT", "Solana"),
    ("XRPUSDT", "Ripple"),
    ("ADAUSDT", "Cardano"),
    ("DOGEUSDT", "Dogecoin"),
    ("AVAXUSDT", "Avalanche"),
    ("DOTUSDT", "Polkadot"),
    ("LINKUSDT", "Chainlink"),
    ("POLUSDT", "Polygon"),
    ("SHIBUSDT", "Shiba Inu"),
    ("LTCUSDT", "Litecoin"),
    ("TRXUSDT", "Tron"),
    ("ATOMUSDT", "Cosmos"),
    ("UNIUSDT", "Uniswap"),
    ("XLMUSDT", "Stellar"),
    ("NEARUSDT", "Near Protocol"),
    ("APTUSDT", "Aptos"),
    ("FILUSDT", "Filecoin"),
];

pub fn default_instruments() -> Vec<Instrument> {
    DEFAULT_PAIRS
        .iter()
        .map(|(symbol, name)| Instrument::new(*symbol, *name))
        .collect()
}

/// Ordered, static symbol → display-name table.
#[derive(Debug, Clone)]
pub struct InstrumentCatalog {
    instruments: Vec<Instrument>,
}

impl InstrumentCatalog {
    /// Build a catalog; symbols are upper-cased and later duplicates dropped.
    pub fn new(instruments: Vec<Instrument>) -> Self {
        let mut unique: Vec<Instrument> = Vec::with_capacity(instruments.len());
        for mut inst in instruments {
            inst.symbol = inst.symbol.trim().to_uppercase();
            if inst.symbol.is_empty() || unique.iter().any(|u| u.symbol == inst.symbol) {
                continue;
            }
            unique.push(inst);
        }
        Self { instruments: unique }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        let symbol = symbol.trim();
        self.instruments
            .iter()
            .find(|i| i.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        Self::new(default_instruments())
    }
}
