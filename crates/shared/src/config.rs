//! Engine configuration management.
//!
//! The reconciliation score weights, tolerances, and the statutory tax rate
//! are deliberately configuration rather than baked-in literals. The defaults
//! below are the values the engine ships with; deployments can override them
//! through `config/*.toml` files or `GROUPCLOSE__`-prefixed environment
//! variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Transaction matching configuration.
    #[serde(default)]
    pub matching: MatchConfig,
    /// Tax configuration.
    #[serde(default)]
    pub tax: TaxConfig,
}

/// Configuration for the intercompany transaction matcher.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchConfig {
    /// Maximum absolute amount difference still considered a match candidate.
    #[serde(default = "default_tolerance_amount")]
    pub tolerance_amount: Decimal,
    /// Maximum day difference still considered a match candidate.
    #[serde(default = "default_tolerance_days")]
    pub tolerance_days: i64,
    /// Whether in-tolerance differences are auto-adjusted or left for review.
    #[serde(default = "default_auto_adjust")]
    pub auto_adjust: bool,
    /// Minimum weighted score for accepting a candidate pair.
    #[serde(default = "default_min_score")]
    pub min_score: Decimal,
    /// Score weights (should sum to 1).
    #[serde(default)]
    pub weights: MatchWeights,
}

/// Weights for the candidate-pair score components.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchWeights {
    /// Weight of amount similarity.
    #[serde(default = "default_weight_amount")]
    pub amount: Decimal,
    /// Weight of date proximity.
    #[serde(default = "default_weight_date")]
    pub date: Decimal,
    /// Weight of scenario-type equality.
    #[serde(default = "default_weight_scenario")]
    pub scenario: Decimal,
    /// Weight of currency equality.
    #[serde(default = "default_weight_currency")]
    pub currency: Decimal,
}

/// Tax configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxConfig {
    /// Flat statutory rate used for deferred-tax elimination legs when the
    /// transaction does not carry its own rate.
    #[serde(default = "default_statutory_rate")]
    pub statutory_rate: Decimal,
}

fn default_tolerance_amount() -> Decimal {
    Decimal::new(100, 0)
}

fn default_tolerance_days() -> i64 {
    3
}

fn default_auto_adjust() -> bool {
    true
}

fn default_min_score() -> Decimal {
    Decimal::new(5, 1) // 0.5
}

fn default_weight_amount() -> Decimal {
    Decimal::new(50, 2) // 0.50
}

fn default_weight_date() -> Decimal {
    Decimal::new(20, 2) // 0.20
}

fn default_weight_scenario() -> Decimal {
    Decimal::new(20, 2) // 0.20
}

fn default_weight_currency() -> Decimal {
    Decimal::new(10, 2) // 0.10
}

fn default_statutory_rate() -> Decimal {
    Decimal::new(25, 2) // 0.25
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tolerance_amount: default_tolerance_amount(),
            tolerance_days: default_tolerance_days(),
            auto_adjust: default_auto_adjust(),
            min_score: default_min_score(),
            weights: MatchWeights::default(),
        }
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            amount: default_weight_amount(),
            date: default_weight_date(),
            scenario: default_weight_scenario(),
            currency: default_weight_currency(),
        }
    }
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            statutory_rate: default_statutory_rate(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("GROUPCLOSE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_matching_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.matching.tolerance_amount, dec!(100));
        assert_eq!(config.matching.tolerance_days, 3);
        assert!(config.matching.auto_adjust);
        assert_eq!(config.matching.min_score, dec!(0.5));
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = MatchWeights::default();
        assert_eq!(
            weights.amount + weights.date + weights.scenario + weights.currency,
            dec!(1.00)
        );
    }

    #[test]
    fn test_default_statutory_rate() {
        assert_eq!(TaxConfig::default().statutory_rate, dec!(0.25));
    }

    #[test]
    fn test_overrides_deserialize() {
        let config: EngineConfig = serde_json::from_value(serde_json::json!({
            "matching": { "tolerance_amount": "250", "min_score": "0.6" }
        }))
        .unwrap();
        assert_eq!(config.matching.tolerance_amount, dec!(250));
        assert_eq!(config.matching.min_score, dec!(0.6));
        // Unspecified fields keep their defaults
        assert_eq!(config.matching.tolerance_days, 3);
    }
}
