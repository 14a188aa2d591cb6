use serde::{Deserialize, Serialize};

/// Market the user trades. Decides the units shown for size and movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingType {
    #[default]
    #[serde(alias = "futuros")]
    Futures,
    Forex,
    Cfds,
}

impl TradingType {
    pub fn size_unit(&self) -> &'static str {
        match self {
            TradingType::Futures => "contracts",
            TradingType::Forex | TradingType::Cfds => "lots",
        }
    }

    pub fn movement_unit(&self) -> &'static str {
        match self {
            TradingType::Futures => "points",
            TradingType::Forex => "pips",
            TradingType::Cfds => "ticks",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradingType::Futures => "futures",
            TradingType::Forex => "forex",
            TradingType::Cfds => "cfds",
        }
    }
}

impl std::str::FromStr for TradingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "futures" | "futuros" => Ok(TradingType::Futures),
            "forex" => Ok(TradingType::Forex),
            "cfds" | "cfd" => Ok(TradingType::Cfds),
            other => Err(format!("Unknown trading type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub trading_type: TradingType,
    #[serde(default)]
    pub custom_setups: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettingsInput {
    pub trading_type: Option<TradingType>,
    pub custom_setups: Option<Vec<String>>,
}
