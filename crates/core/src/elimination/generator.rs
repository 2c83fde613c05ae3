//! Instantiates balanced adjustments from a template and a transaction.

use chrono::NaiveDate;
use groupclose_shared::types::{AdjustmentId, EntityId, Period};
use rust_decimal::Decimal;
use tracing::debug;

use crate::adjustment::{Adjustment, AdjustmentOrigin};
use crate::transaction::IntercompanyTransaction;

use super::error::EliminationError;
use super::template::EliminationTemplate;

/// Generates the elimination entries a template produces for a transaction.
///
/// Evaluates the primary formula and every additional leg against the
/// transaction. A non-positive primary amount drops the whole set, legs
/// included; a non-positive leg amount drops only that leg. Every produced
/// adjustment carries [`AdjustmentOrigin::Generated`], the source
/// transaction, and the template id.
///
/// # Errors
///
/// Propagates formula evaluation failures; a missing operand is a data
/// problem that must surface, not a silent zero.
pub fn generate_entries(
    template: &EliminationTemplate,
    txn: &IntercompanyTransaction,
    parent: EntityId,
    period: Period,
    entry_date: NaiveDate,
) -> Result<Vec<Adjustment>, EliminationError> {
    let amount = template.formula.evaluate(&template.id, txn)?;
    if amount <= Decimal::ZERO {
        debug!(template = %template.id, transaction = %txn.id, "non-positive amount, skipping");
        return Ok(Vec::new());
    }

    let mut entries = vec![Adjustment {
        id: AdjustmentId::new(),
        parent_entity: parent,
        period,
        origin: AdjustmentOrigin::Generated,
        entry_date,
        debit_account_code: template.debit_code.clone(),
        debit_account_name: template.debit_name.clone(),
        credit_account_code: template.credit_code.clone(),
        credit_account_name: template.credit_name.clone(),
        amount,
        source_transaction: Some(txn.id),
        template_id: Some(template.id.clone()),
        memo: format!("{} for transaction {}", template.name, txn.id),
        reversed_by: None,
    }];

    for leg in &template.additional_legs {
        let leg_amount = leg.formula.evaluate(&template.id, txn)?;
        if leg_amount <= Decimal::ZERO {
            continue;
        }
        entries.push(Adjustment {
            id: AdjustmentId::new(),
            parent_entity: parent,
            period,
            origin: AdjustmentOrigin::Generated,
            entry_date,
            debit_account_code: leg.debit_code.clone(),
            debit_account_name: leg.debit_name.clone(),
            credit_account_code: leg.credit_code.clone(),
            credit_account_name: leg.credit_name.clone(),
            amount: leg_amount,
            source_transaction: Some(txn.id),
            template_id: Some(format!("{}_ADD", template.id)),
            memo: format!("{} (additional leg) for transaction {}", template.name, txn.id),
            reversed_by: None,
        });
    }

    Ok(entries)
}
