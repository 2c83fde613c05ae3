//! End-to-end consolidation over the in-memory store.

use chrono::NaiveDate;
use groupclose_core::consolidation::types::{ReportType, TrialBalanceRow};
use groupclose_core::consolidation::ConsolidationService;
use groupclose_core::hierarchy::service::HierarchyService;
use groupclose_core::hierarchy::types::{NewEntity, ScopeCriteria};
use groupclose_core::reconciliation::matcher::Matcher;
use groupclose_core::reconciliation::service::ReconciliationService;
use groupclose_core::repository::AdjustmentRepository;
use groupclose_core::transaction::{
    EliminationStatus, IntercompanyTransaction, ReconciliationStatus, ScenarioType,
    TransactionSide,
};
use groupclose_shared::config::EngineConfig;
use groupclose_shared::types::{EntityId, Period, TransactionId};
use groupclose_store::MemoryStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn period() -> Period {
    Period { year: 2024, month: 1 }
}

fn leg(
    entity: EntityId,
    counterparty: EntityId,
    side: TransactionSide,
    amount: Decimal,
    day: u32,
) -> IntercompanyTransaction {
    IntercompanyTransaction {
        id: TransactionId::new(),
        entity,
        counterparty,
        side,
        scenario: ScenarioType::GoodsSale,
        sub_scenario: None,
        date: NaiveDate::from_ymd_opt(2024, 1, day).expect("valid day"),
        period: period(),
        amount,
        currency: "CNY".to_string(),
        converted_amount: None,
        account_code: None,
        needs_elimination: true,
        elimination_status: EliminationStatus::Pending,
        reconciliation_status: ReconciliationStatus::Unreconciled,
        matched_with: None,
        amount_difference: None,
        date_difference_days: None,
        has_unrealized_profit: false,
        unrealized_profit_amount: None,
        tax_rate: None,
    }
}

fn row(code: &str, name: &str, debit: Decimal, credit: Decimal) -> TrialBalanceRow {
    TrialBalanceRow {
        account_code: code.to_string(),
        account_name: name.to_string(),
        debit,
        credit,
    }
}

/// Alpha owns 80% of Beta, Beta owns 75% of Gamma.
fn group_fixture(store: &MemoryStore) -> (EntityId, EntityId, EntityId) {
    let hierarchy = HierarchyService::new(store);
    let alpha = hierarchy
        .create_entity(NewEntity::root("ALPHA", "Alpha Holding"))
        .expect("root");
    let beta = hierarchy
        .create_entity(NewEntity::subsidiary(
            "BETA",
            "Beta Manufacturing",
            alpha.id,
            dec!(80),
        ))
        .expect("subsidiary");
    let gamma = hierarchy
        .create_entity(NewEntity::subsidiary(
            "GAMMA",
            "Gamma Trading",
            beta.id,
            dec!(75),
        ))
        .expect("sub-subsidiary");
    (alpha.id, beta.id, gamma.id)
}

#[test]
fn effective_ownership_multiplies_along_the_chain() {
    let store = MemoryStore::new();
    let (alpha, _beta, gamma) = group_fixture(&store);
    let hierarchy = HierarchyService::new(&store);

    let effective = hierarchy.effective_ownership(alpha, gamma).unwrap();
    assert_eq!(effective, dec!(60));

    let stranger = hierarchy
        .create_entity(NewEntity::root("OTHER", "Unrelated Group"))
        .unwrap();
    assert_eq!(
        hierarchy.effective_ownership(alpha, stranger.id).unwrap(),
        Decimal::ZERO
    );
}

#[test]
fn scope_respects_minimum_ownership() {
    let store = MemoryStore::new();
    let (alpha, _beta, gamma) = group_fixture(&store);
    let hierarchy = HierarchyService::new(&store);

    let all = hierarchy
        .consolidation_scope(alpha, &ScopeCriteria::default())
        .unwrap();
    assert_eq!(all.len(), 3);

    let tight = hierarchy
        .consolidation_scope(
            alpha,
            &ScopeCriteria {
                min_ownership: dec!(70),
                ..ScopeCriteria::default()
            },
        )
        .unwrap();
    assert_eq!(tight.len(), 2);
    assert!(tight.iter().all(|e| e.id != gamma));
}

#[test]
fn near_match_is_auto_adjusted_on_both_legs() {
    let store = MemoryStore::new();
    let (alpha, beta, _gamma) = group_fixture(&store);

    let seller = leg(alpha, beta, TransactionSide::Seller, dec!(10_000), 10);
    let buyer = leg(beta, alpha, TransactionSide::Buyer, dec!(10_050), 11);
    store.seed_transaction(seller.clone()).unwrap();
    store.seed_transaction(buyer.clone()).unwrap();

    let config = EngineConfig::default();
    let service = ReconciliationService::new(&store, Matcher::new(config.matching));
    let summary = service.auto_reconcile(&[alpha, beta], period(), None).unwrap();

    assert_eq!(summary.matched_pairs, 1);
    assert_eq!(summary.auto_adjusted, 1);
    assert_eq!(summary.total_difference, dec!(50));

    let stored_seller = store.transaction(seller.id).unwrap().unwrap();
    assert_eq!(
        stored_seller.reconciliation_status,
        ReconciliationStatus::AutoAdjusted
    );
    assert_eq!(stored_seller.matched_with, Some(buyer.id));
    assert_eq!(stored_seller.amount_difference, Some(dec!(50)));
    assert_eq!(stored_seller.date_difference_days, Some(1));

    let stored_buyer = store.transaction(buyer.id).unwrap().unwrap();
    assert_eq!(stored_buyer.matched_with, Some(seller.id));
}

#[test]
fn second_reconciliation_pass_matches_nothing_new() {
    let store = MemoryStore::new();
    let (alpha, beta, _gamma) = group_fixture(&store);
    store
        .seed_transaction(leg(alpha, beta, TransactionSide::Seller, dec!(10_000), 10))
        .unwrap();
    store
        .seed_transaction(leg(beta, alpha, TransactionSide::Buyer, dec!(10_000), 10))
        .unwrap();

    let config = EngineConfig::default();
    let service = ReconciliationService::new(&store, Matcher::new(config.matching));
    let first = service.auto_reconcile(&[alpha, beta], period(), None).unwrap();
    assert_eq!(first.matched_pairs, 1);

    let second = service.auto_reconcile(&[alpha, beta], period(), None).unwrap();
    assert_eq!(second.total_legs, 0);
    assert_eq!(second.matched_pairs, 0);
}

#[test]
fn not_required_legs_are_excluded_from_elimination() {
    let store = MemoryStore::new();
    let (alpha, beta, _gamma) = group_fixture(&store);

    let mut sale = leg(alpha, beta, TransactionSide::Seller, dec!(50_000), 10);
    sale.elimination_status = EliminationStatus::NotRequired;
    let mut purchase = leg(beta, alpha, TransactionSide::Buyer, dec!(50_000), 10);
    purchase.elimination_status = EliminationStatus::NotRequired;
    store.seed_transaction(sale).unwrap();
    store.seed_transaction(purchase).unwrap();

    let service = ConsolidationService::new(
        &store,
        &store,
        &store,
        &store,
        EngineConfig::default(),
    );
    let report = service
        .generate_consolidated_report(alpha, period(), ReportType::Full, None)
        .unwrap();

    assert_eq!(report.eliminable_transactions, 0);
    assert_eq!(report.elimination_count, 0);
    assert!(store.for_period(alpha, period()).unwrap().is_empty());
}

fn seed_consolidation_case(store: &MemoryStore) -> (EntityId, EntityId) {
    let hierarchy = HierarchyService::new(store);
    let alpha = hierarchy
        .create_entity(NewEntity::root("ALPHA", "Alpha Holding"))
        .expect("root");
    // 70% owned: a 30% minority stake remains.
    let delta = hierarchy
        .create_entity(NewEntity::subsidiary(
            "DELTA",
            "Delta Retail",
            alpha.id,
            dec!(70),
        ))
        .expect("subsidiary");

    let mut sale = leg(alpha.id, delta.id, TransactionSide::Seller, dec!(50_000), 10);
    sale.has_unrealized_profit = true;
    sale.unrealized_profit_amount = Some(dec!(5_000));
    let purchase = leg(delta.id, alpha.id, TransactionSide::Buyer, dec!(50_000), 10);
    store.seed_transaction(sale).unwrap();
    store.seed_transaction(purchase).unwrap();

    store
        .seed_trial_balance(
            alpha.id,
            period(),
            vec![
                row("1405", "Inventory", dec!(120_000), dec!(0)),
                row("6001", "Operating revenue", dec!(0), dec!(50_000)),
            ],
        )
        .unwrap();
    store
        .seed_trial_balance(
            delta.id,
            period(),
            vec![
                row("1405", "Inventory", dec!(80_000), dec!(0)),
                row("3101", "Paid-in capital", dec!(0), dec!(150_000)),
                row("3104", "Retained earnings", dec!(0), dec!(50_000)),
                row("6401", "Cost of goods sold", dec!(50_000), dec!(0)),
            ],
        )
        .unwrap();

    (alpha.id, delta.id)
}

#[test]
fn consolidated_report_eliminates_and_carves_out_minority() {
    init_tracing();
    let store = MemoryStore::new();
    let (alpha, _delta) = seed_consolidation_case(&store);

    let service = ConsolidationService::new(
        &store,
        &store,
        &store,
        &store,
        EngineConfig::default(),
    );
    let report = service
        .generate_consolidated_report(alpha, period(), ReportType::Full, None)
        .unwrap();

    assert_eq!(report.scope.len(), 2);
    assert_eq!(report.reconciliation.matched_pairs, 1);
    // Base elimination, unrealized margin, and deferred tax.
    assert_eq!(report.elimination_count, 3);

    let account = |code: &str| {
        report
            .accounts
            .iter()
            .find(|a| a.account_code == code)
            .unwrap_or_else(|| panic!("missing account {code}"))
    };

    // Internal revenue fully eliminated.
    assert_eq!(account("6001").balance, dec!(0));
    // Margin removed from inventory: 120,000 + 80,000 - 5,000.
    assert_eq!(account("1405").balance, dec!(195_000));
    // Deferred tax asset created at the statutory 25%.
    assert_eq!(account("1811").balance, dec!(1_250.00));

    // 30% of Delta's 200,000 equity.
    assert_eq!(report.minority_interest.total_amount, dec!(60_000));
    assert_eq!(report.minority_interest.stakes.len(), 1);
    assert_eq!(report.minority_interest.stakes[0].equity, dec!(200_000));

    assert_eq!(report.run.total_equity, dec!(200_000));
    assert_eq!(store.runs(alpha).unwrap().len(), 1);
}

#[test]
fn rerunning_consolidation_is_idempotent() {
    init_tracing();
    let store = MemoryStore::new();
    let (alpha, _delta) = seed_consolidation_case(&store);

    let service = ConsolidationService::new(
        &store,
        &store,
        &store,
        &store,
        EngineConfig::default(),
    );
    let first = service
        .generate_consolidated_report(alpha, period(), ReportType::Full, None)
        .unwrap();
    let second = service
        .generate_consolidated_report(alpha, period(), ReportType::Full, None)
        .unwrap();

    assert_eq!(first.accounts, second.accounts);
    assert_eq!(second.elimination_count, 3);
    // Prior generated entries replaced, not stacked.
    assert_eq!(store.for_period(alpha, period()).unwrap().len(), 3);
    // Every run leaves its own metadata row.
    assert_eq!(store.runs(alpha).unwrap().len(), 2);
}
