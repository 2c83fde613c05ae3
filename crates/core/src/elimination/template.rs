//! Elimination template types: formulas, conditions, legs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::{IntercompanyTransaction, ScenarioType};

use super::error::EliminationError;

/// Transaction field a formula can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountField {
    /// The transaction amount in group currency.
    TransactionAmount,
    /// The unrealized profit carried by the transaction.
    UnrealizedProfit,
    /// The transaction-specific tax rate.
    TaxRate,
}

/// Symbolic amount formula.
///
/// A closed enum evaluated by a total function; formulas are never parsed
/// from strings. A `Product` whose multiplier is [`AmountField::TaxRate`]
/// falls back to `default_multiplier` when the transaction carries no rate
/// of its own (the statutory rate); every other missing operand is an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountFormula {
    /// The named field, verbatim.
    Literal(AmountField),
    /// The product of a field and a multiplier field.
    Product {
        /// Field supplying the base amount.
        field: AmountField,
        /// Field supplying the multiplier.
        multiplier: AmountField,
        /// Fallback when the multiplier is an absent tax rate.
        default_multiplier: Decimal,
    },
}

impl AmountFormula {
    /// Evaluates the formula against a transaction.
    ///
    /// # Errors
    ///
    /// `UnresolvableField` when a required operand is absent.
    pub fn evaluate(
        &self,
        template_id: &str,
        txn: &IntercompanyTransaction,
    ) -> Result<Decimal, EliminationError> {
        match self {
            Self::Literal(field) => resolve(*field, template_id, txn),
            Self::Product {
                field,
                multiplier,
                default_multiplier,
            } => {
                let base = resolve(*field, template_id, txn)?;
                let factor = match multiplier {
                    AmountField::TaxRate => txn.tax_rate.unwrap_or(*default_multiplier),
                    other => resolve(*other, template_id, txn)?,
                };
                Ok(base * factor)
            }
        }
    }
}

fn resolve(
    field: AmountField,
    template_id: &str,
    txn: &IntercompanyTransaction,
) -> Result<Decimal, EliminationError> {
    let missing = || EliminationError::UnresolvableField {
        template_id: template_id.to_string(),
        field,
        transaction: txn.id,
    };
    match field {
        AmountField::TransactionAmount => Ok(txn.effective_amount()),
        AmountField::UnrealizedProfit => txn.unrealized_profit_amount.ok_or_else(missing),
        AmountField::TaxRate => txn.tax_rate.ok_or_else(missing),
    }
}

/// Structured applicability predicate.
///
/// Evaluated structurally against transaction attributes; there is no
/// free-text interpretation at match time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Applies unconditionally.
    Always,
    /// The transaction scenario equals the given one.
    ScenarioIs(ScenarioType),
    /// The transaction sub-scenario equals the given label.
    SubScenarioIs(String),
    /// The transaction carries a positive unrealized profit.
    HasUnrealizedProfit,
    /// Every inner condition holds.
    All(Vec<Condition>),
    /// At least one inner condition holds.
    Any(Vec<Condition>),
}

impl Condition {
    /// Whether the condition holds for a transaction.
    #[must_use]
    pub fn matches(&self, txn: &IntercompanyTransaction) -> bool {
        match self {
            Self::Always => true,
            Self::ScenarioIs(scenario) => txn.scenario == *scenario,
            Self::SubScenarioIs(label) => txn.sub_scenario.as_deref() == Some(label.as_str()),
            Self::HasUnrealizedProfit => {
                txn.has_unrealized_profit
                    && txn
                        .unrealized_profit_amount
                        .is_some_and(|amount| amount > Decimal::ZERO)
            }
            Self::All(inner) => inner.iter().all(|c| c.matches(txn)),
            Self::Any(inner) => inner.iter().any(|c| c.matches(txn)),
        }
    }

    /// Validates the condition structurally.
    ///
    /// # Errors
    ///
    /// `InvalidCondition` on an empty composite or a blank sub-scenario
    /// label.
    pub fn validate(&self, template_id: &str) -> Result<(), EliminationError> {
        match self {
            Self::Always | Self::ScenarioIs(_) | Self::HasUnrealizedProfit => Ok(()),
            Self::SubScenarioIs(label) => {
                if label.trim().is_empty() {
                    return Err(EliminationError::InvalidCondition {
                        template_id: template_id.to_string(),
                        reason: "blank sub-scenario label".to_string(),
                    });
                }
                Ok(())
            }
            Self::All(inner) | Self::Any(inner) => {
                if inner.is_empty() {
                    return Err(EliminationError::InvalidCondition {
                        template_id: template_id.to_string(),
                        reason: "empty composite condition".to_string(),
                    });
                }
                inner.iter().try_for_each(|c| c.validate(template_id))
            }
        }
    }
}

/// Additional balanced leg of a multi-entry template (e.g. the deferred-tax
/// entry accompanying an unrealized-profit elimination).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLeg {
    /// Debit account code.
    pub debit_code: String,
    /// Debit account name.
    pub debit_name: String,
    /// Credit account code.
    pub credit_code: String,
    /// Credit account name.
    pub credit_name: String,
    /// Amount formula of the leg.
    pub formula: AmountFormula,
}

/// Catalog grouping, one per elimination domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateGroup {
    /// Intercompany sale of goods.
    GoodsSale,
    /// Intercompany services.
    Service,
    /// Intercompany debt and interest.
    Debt,
    /// Intercompany asset transfers.
    AssetTransfer,
    /// Investment-versus-equity adjustments.
    Equity,
    /// Special cases.
    Special,
}

/// One elimination rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationTemplate {
    /// Stable template identifier (e.g. `GOODS_SALE_01`).
    pub id: String,
    /// Human-readable rule name.
    pub name: String,
    /// Catalog grouping.
    pub group: TemplateGroup,
    /// Transaction scenario the rule applies to.
    pub scenario: ScenarioType,
    /// Finer-grained scenario label, when the rule is sub-scenario bound.
    pub sub_scenario: Option<String>,
    /// Debit account code.
    pub debit_code: String,
    /// Debit account name.
    pub debit_name: String,
    /// Credit account code.
    pub credit_code: String,
    /// Credit account name.
    pub credit_name: String,
    /// Amount formula of the primary entry.
    pub formula: AmountFormula,
    /// Applicability predicate, checked after the scenario filter.
    pub condition: Condition,
    /// Tie-break ordering among applicable templates; lower runs first.
    pub priority: u32,
    /// Inactive templates are skipped entirely.
    pub is_active: bool,
    /// Additional balanced legs generated alongside the primary entry.
    pub additional_legs: Vec<TemplateLeg>,
}

impl EliminationTemplate {
    /// Validates the template's condition tree.
    pub fn validate(&self) -> Result<(), EliminationError> {
        self.condition.validate(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::matcher::tests::leg;
    use crate::transaction::TransactionSide;
    use groupclose_shared::types::EntityId;
    use rust_decimal_macros::dec;

    fn txn() -> IntercompanyTransaction {
        leg(
            EntityId::new(),
            EntityId::new(),
            TransactionSide::Seller,
            dec!(50_000),
            10,
        )
    }

    #[test]
    fn test_literal_transaction_amount_is_total() {
        let formula = AmountFormula::Literal(AmountField::TransactionAmount);
        assert_eq!(formula.evaluate("T", &txn()).unwrap(), dec!(50_000));
    }

    #[test]
    fn test_missing_unrealized_profit_fails_loudly() {
        let formula = AmountFormula::Literal(AmountField::UnrealizedProfit);
        let err = formula.evaluate("T", &txn()).unwrap_err();
        assert!(matches!(
            err,
            EliminationError::UnresolvableField {
                field: AmountField::UnrealizedProfit,
                ..
            }
        ));
    }

    #[test]
    fn test_product_with_default_tax_rate() {
        let formula = AmountFormula::Product {
            field: AmountField::UnrealizedProfit,
            multiplier: AmountField::TaxRate,
            default_multiplier: dec!(0.25),
        };
        let mut transaction = txn();
        transaction.unrealized_profit_amount = Some(dec!(5_000));

        // No transaction rate: the statutory default applies.
        assert_eq!(
            formula.evaluate("T", &transaction).unwrap(),
            dec!(1_250.00)
        );

        // A transaction rate overrides the default.
        transaction.tax_rate = Some(dec!(0.15));
        assert_eq!(formula.evaluate("T", &transaction).unwrap(), dec!(750.00));
    }

    #[test]
    fn test_condition_matching() {
        let mut transaction = txn();
        transaction.sub_scenario = Some("notes_payable".to_string());
        transaction.has_unrealized_profit = true;
        transaction.unrealized_profit_amount = Some(dec!(5_000));

        assert!(Condition::Always.matches(&transaction));
        assert!(Condition::ScenarioIs(ScenarioType::GoodsSale).matches(&transaction));
        assert!(!Condition::ScenarioIs(ScenarioType::Loan).matches(&transaction));
        assert!(Condition::SubScenarioIs("notes_payable".to_string()).matches(&transaction));
        assert!(Condition::HasUnrealizedProfit.matches(&transaction));
        assert!(Condition::All(vec![
            Condition::ScenarioIs(ScenarioType::GoodsSale),
            Condition::HasUnrealizedProfit,
        ])
        .matches(&transaction));
        assert!(Condition::Any(vec![
            Condition::ScenarioIs(ScenarioType::Loan),
            Condition::HasUnrealizedProfit,
        ])
        .matches(&transaction));
    }

    #[test]
    fn test_unrealized_flag_requires_positive_amount() {
        let mut transaction = txn();
        transaction.has_unrealized_profit = true;
        transaction.unrealized_profit_amount = Some(Decimal::ZERO);
        assert!(!Condition::HasUnrealizedProfit.matches(&transaction));
        transaction.unrealized_profit_amount = None;
        assert!(!Condition::HasUnrealizedProfit.matches(&transaction));
    }

    #[test]
    fn test_condition_validation() {
        assert!(Condition::Always.validate("T").is_ok());
        assert!(Condition::All(vec![]).validate("T").is_err());
        assert!(Condition::SubScenarioIs("  ".to_string())
            .validate("T")
            .is_err());
        assert!(
            Condition::Any(vec![Condition::All(vec![])]).validate("T").is_err(),
            "validation recurses into composites"
        );
    }
}
