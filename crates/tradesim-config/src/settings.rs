//! Configuration structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradesim_core::{Pair, TradingError, TradingResult};
use tradesim_risk::{Account, RiskRule};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub account: Account,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Check settings that deserialization alone cannot catch.
    pub fn validate(&self) -> TradingResult<()> {
        if self.account.precision > 28 {
            return Err(TradingError::Config(format!(
                "account precision {} exceeds 28 decimal places",
                self.account.precision
            )));
        }

        let conversion = self.simulation.conversion_pair()?;
        if conversion.base_currency() != self.account.currency {
            return Err(TradingError::Config(format!(
                "conversion pair {} does not convert into account currency {}",
                conversion, self.account.currency
            )));
        }

        if let RiskRule::Trailing { step_size } = self.simulation.risk_rule {
            if step_size <= Decimal::ZERO {
                return Err(TradingError::Config(format!(
                    "trailing step size must be positive (got: {})",
                    step_size
                )));
            }
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "compact" | "json") {
            return Err(TradingError::Config(format!(
                "unknown log format: {}",
                self.logging.format
            )));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "tradesim".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Simulation defaults handed to the risk engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Technical name of the series used to convert into account currency
    pub conversion_pair: String,
    /// Rule applied to newly opened positions
    #[serde(default)]
    pub risk_rule: RiskRule,
}

impl SimulationSettings {
    /// Resolve the conversion pair in the instrument registry.
    pub fn conversion_pair(&self) -> TradingResult<Pair> {
        Ok(Pair::from_technical_name(&self.conversion_pair)?)
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            conversion_pair: Pair::eur_usd_1().technical_name().to_string(),
            risk_rule: RiskRule::HardLimit,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty`, `compact` or `json`
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}
