//! The built-in elimination template catalog.
//!
//! 62 templates in six groups: goods sale (16), services (10), intercompany
//! debt (12), asset transfers (10), equity adjustments (8), and special
//! cases (6). Account codes follow the group chart of accounts (assets 1xxx,
//! liabilities 2xxx, equity 3xxx, cost 4xxx, profit and loss 6xxx).

use groupclose_shared::config::TaxConfig;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::{IntercompanyTransaction, ScenarioType};

use super::template::{
    AmountField, AmountFormula, Condition, EliminationTemplate, TemplateGroup, TemplateLeg,
};

static BUILTIN: Lazy<TemplateCatalog> =
    Lazy::new(|| TemplateCatalog::with_tax(&TaxConfig::default()));

/// A scenario-keyed library of elimination rules.
pub struct TemplateCatalog {
    templates: Vec<EliminationTemplate>,
}

/// Aggregate statistics over the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStatistics {
    /// All templates.
    pub total: usize,
    /// Active templates.
    pub active: usize,
    /// Template count per group.
    pub by_group: Vec<(TemplateGroup, usize)>,
}

impl TemplateCatalog {
    /// The catalog with the default statutory tax rate, constructed once.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Builds the catalog with the configured statutory tax rate as the
    /// fallback multiplier of every deferred-tax formula.
    #[must_use]
    pub fn with_tax(tax: &TaxConfig) -> Self {
        let mut templates = Vec::with_capacity(62);
        templates.extend(goods_sale_templates(tax.statutory_rate));
        templates.extend(service_templates());
        templates.extend(debt_templates());
        templates.extend(asset_transfer_templates(tax.statutory_rate));
        templates.extend(equity_templates());
        templates.extend(special_templates());
        Self { templates }
    }

    /// Number of templates in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Fetches a template by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EliminationTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// All templates, for inspection and validation.
    #[must_use]
    pub fn all(&self) -> &[EliminationTemplate] {
        &self.templates
    }

    /// Searches templates by group, sub-scenario, and name keyword.
    #[must_use]
    pub fn search(
        &self,
        group: Option<TemplateGroup>,
        sub_scenario: Option<&str>,
        keyword: Option<&str>,
    ) -> Vec<&EliminationTemplate> {
        let mut results: Vec<&EliminationTemplate> = self
            .templates
            .iter()
            .filter(|t| group.is_none_or(|g| t.group == g))
            .filter(|t| {
                sub_scenario.is_none_or(|sub| t.sub_scenario.as_deref() == Some(sub))
            })
            .filter(|t| {
                keyword.is_none_or(|kw| {
                    t.name.to_lowercase().contains(&kw.to_lowercase())
                })
            })
            .collect();
        results.sort_by_key(|t| (group_rank(t.group), t.priority));
        results
    }

    /// Active templates applicable to a transaction: scenario equal and
    /// condition satisfied, ordered by ascending priority.
    #[must_use]
    pub fn applicable(&self, txn: &IntercompanyTransaction) -> Vec<&EliminationTemplate> {
        let mut results: Vec<&EliminationTemplate> = self
            .templates
            .iter()
            .filter(|t| t.is_active)
            .filter(|t| t.scenario == txn.scenario)
            .filter(|t| t.condition.matches(txn))
            .collect();
        results.sort_by_key(|t| t.priority);
        results
    }

    /// Aggregate statistics over the catalog.
    #[must_use]
    pub fn statistics(&self) -> CatalogStatistics {
        let groups = [
            TemplateGroup::GoodsSale,
            TemplateGroup::Service,
            TemplateGroup::Debt,
            TemplateGroup::AssetTransfer,
            TemplateGroup::Equity,
            TemplateGroup::Special,
        ];
        CatalogStatistics {
            total: self.templates.len(),
            active: self.templates.iter().filter(|t| t.is_active).count(),
            by_group: groups
                .into_iter()
                .map(|g| (g, self.templates.iter().filter(|t| t.group == g).count()))
                .collect(),
        }
    }

}

fn group_rank(group: TemplateGroup) -> u8 {
    match group {
        TemplateGroup::GoodsSale => 0,
        TemplateGroup::Service => 1,
        TemplateGroup::Debt => 2,
        TemplateGroup::AssetTransfer => 3,
        TemplateGroup::Equity => 4,
        TemplateGroup::Special => 5,
    }
}

#[allow(clippy::too_many_arguments)]
fn template(
    id: &str,
    name: &str,
    group: TemplateGroup,
    scenario: ScenarioType,
    sub_scenario: Option<&str>,
    debit: (&str, &str),
    credit: (&str, &str),
    formula: AmountFormula,
    condition: Condition,
    priority: u32,
) -> EliminationTemplate {
    EliminationTemplate {
        id: id.to_string(),
        name: name.to_string(),
        group,
        scenario,
        sub_scenario: sub_scenario.map(ToString::to_string),
        debit_code: debit.0.to_string(),
        debit_name: debit.1.to_string(),
        credit_code: credit.0.to_string(),
        credit_name: credit.1.to_string(),
        formula,
        condition,
        priority,
        is_active: true,
        additional_legs: Vec::new(),
    }
}

/// Sub-scenario template bound to `SubScenarioIs`, amount taken verbatim
/// from the transaction. Covers the long tail of every group.
fn sub_scenario_template(
    id: &str,
    name: &str,
    group: TemplateGroup,
    scenario: ScenarioType,
    sub: &str,
    debit: (&str, &str),
    credit: (&str, &str),
    priority: u32,
) -> EliminationTemplate {
    template(
        id,
        name,
        group,
        scenario,
        Some(sub),
        debit,
        credit,
        AmountFormula::Literal(AmountField::TransactionAmount),
        Condition::SubScenarioIs(sub.to_string()),
        priority,
    )
}

fn goods_sale_templates(statutory_rate: Decimal) -> Vec<EliminationTemplate> {
    let mut templates = vec![
        // Base elimination: internal revenue against cost of goods sold.
        template(
            "GOODS_SALE_01",
            "Intercompany goods sale base elimination",
            TemplateGroup::GoodsSale,
            ScenarioType::GoodsSale,
            None,
            ("6001", "Operating revenue"),
            ("6401", "Cost of goods sold"),
            AmountFormula::Literal(AmountField::TransactionAmount),
            Condition::ScenarioIs(ScenarioType::GoodsSale),
            1,
        ),
        // Unrealized margin still sitting in closing inventory.
        template(
            "GOODS_SALE_02",
            "Unrealized margin in closing inventory",
            TemplateGroup::GoodsSale,
            ScenarioType::GoodsSale,
            None,
            ("6401", "Cost of goods sold"),
            ("1405", "Inventory"),
            AmountFormula::Literal(AmountField::UnrealizedProfit),
            Condition::HasUnrealizedProfit,
            2,
        ),
        // Deferred tax asset on the eliminated margin.
        template(
            "GOODS_SALE_03",
            "Deferred tax on unrealized margin",
            TemplateGroup::GoodsSale,
            ScenarioType::GoodsSale,
            None,
            ("1811", "Deferred tax assets"),
            ("6801", "Income tax expense"),
            AmountFormula::Product {
                field: AmountField::UnrealizedProfit,
                multiplier: AmountField::TaxRate,
                default_multiplier: statutory_rate,
            },
            Condition::HasUnrealizedProfit,
            3,
        ),
    ];

    let tail: [(&str, &str, (&str, &str), (&str, &str)); 13] = [
        (
            "opening_margin_reversal",
            "Opening inventory margin reversal",
            ("3104", "Retained earnings"),
            ("6401", "Cost of goods sold"),
        ),
        (
            "opening_margin_deferred_tax",
            "Opening margin deferred tax reversal",
            ("3104", "Retained earnings"),
            ("6801", "Income tax expense"),
        ),
        (
            "receivables_payables",
            "Trade receivables and payables",
            ("2202", "Accounts payable"),
            ("1122", "Accounts receivable"),
        ),
        (
            "bad_debt_provision",
            "Bad debt provision on internal receivables",
            ("1231", "Bad debt provision"),
            ("6701", "Asset impairment loss"),
        ),
        (
            "vat_on_internal_sales",
            "VAT on internal sales",
            ("22211", "Taxes payable - output VAT"),
            ("22212", "Taxes payable - input VAT"),
        ),
        (
            "freight",
            "Freight on internal sales",
            ("6601", "Selling expenses"),
            ("6401", "Cost of goods sold"),
        ),
        (
            "packaging",
            "Packaging on internal sales",
            ("6601", "Selling expenses"),
            ("1412", "Revolving materials - packaging"),
        ),
        (
            "group_stock_transfer",
            "Group stock transfer",
            ("1406", "Goods dispatched"),
            ("1405", "Inventory"),
        ),
        (
            "customer_advances",
            "Advances on internal sales",
            ("2203", "Advances from customers"),
            ("1123", "Prepayments"),
        ),
        (
            "retention_money",
            "Retention money on internal sales",
            ("2241", "Other payables - retention"),
            ("1221", "Other receivables - retention"),
        ),
        (
            "sales_returns",
            "Internal sales returns",
            ("6001", "Operating revenue"),
            ("6401", "Cost of goods sold"),
        ),
        (
            "discounts_allowances",
            "Discounts and allowances on internal sales",
            ("6001", "Operating revenue"),
            ("6603", "Finance costs"),
        ),
        (
            "fx_differences",
            "Exchange differences on cross-border internal sales",
            ("6603", "Finance costs - exchange differences"),
            ("1221", "Other receivables"),
        ),
    ];

    for (index, (sub, name, debit, credit)) in tail.into_iter().enumerate() {
        let number = index + 4;
        templates.push(sub_scenario_template(
            &format!("GOODS_SALE_{number:02}"),
            name,
            TemplateGroup::GoodsSale,
            ScenarioType::GoodsSale,
            sub,
            debit,
            credit,
            u32::try_from(number).unwrap_or(u32::MAX),
        ));
    }

    templates
}

fn service_templates() -> Vec<EliminationTemplate> {
    let mut templates = vec![template(
        "SERVICE_01",
        "Intercompany service revenue base elimination",
        TemplateGroup::Service,
        ScenarioType::Service,
        None,
        ("6001", "Operating revenue"),
        ("6602", "Administrative expenses"),
        AmountFormula::Literal(AmountField::TransactionAmount),
        Condition::ScenarioIs(ScenarioType::Service),
        1,
    )];

    let tail: [(&str, &str, (&str, &str)); 9] = [
        (
            "consulting",
            "Intercompany consulting services",
            ("6602", "Administrative expenses - consulting fees"),
        ),
        (
            "technical_service",
            "Intercompany technical services",
            ("6602", "Administrative expenses - technical service fees"),
        ),
        (
            "leasing",
            "Intercompany leasing",
            ("6602", "Administrative expenses - lease fees"),
        ),
        (
            "transport",
            "Intercompany transport services",
            ("6601", "Selling expenses - freight"),
        ),
        (
            "handling",
            "Intercompany handling services",
            ("6601", "Selling expenses - handling fees"),
        ),
        (
            "treasury",
            "Intercompany treasury services",
            ("6603", "Finance costs - handling fees"),
        ),
        (
            "it_services",
            "Intercompany IT services",
            ("6602", "Administrative expenses - information technology"),
        ),
        (
            "hr_services",
            "Intercompany HR services",
            ("6602", "Administrative expenses - human resources"),
        ),
        (
            "legal_services",
            "Intercompany legal services",
            ("6602", "Administrative expenses - legal fees"),
        ),
    ];

    for (index, (sub, name, credit)) in tail.into_iter().enumerate() {
        let number = index + 2;
        templates.push(sub_scenario_template(
            &format!("SERVICE_{number:02}"),
            name,
            TemplateGroup::Service,
            ScenarioType::Service,
            sub,
            ("6001", "Operating revenue"),
            credit,
            u32::try_from(number).unwrap_or(u32::MAX),
        ));
    }

    templates
}

fn debt_templates() -> Vec<EliminationTemplate> {
    let mut templates = vec![template(
        "DEBT_01",
        "Intercompany loan base elimination",
        TemplateGroup::Debt,
        ScenarioType::Loan,
        None,
        ("2001", "Short-term borrowings"),
        ("1221", "Other receivables"),
        AmountFormula::Literal(AmountField::TransactionAmount),
        Condition::ScenarioIs(ScenarioType::Loan),
        1,
    )];

    let tail: [(&str, &str, (&str, &str), (&str, &str)); 11] = [
        (
            "long_term_borrowings",
            "Intercompany long-term borrowings",
            ("2501", "Long-term borrowings"),
            ("1211", "Non-current assets due within one year"),
        ),
        (
            "notes_payable",
            "Intercompany notes",
            ("2201", "Notes payable"),
            ("1121", "Notes receivable"),
        ),
        (
            "interest_accruals",
            "Intercompany interest accruals",
            ("2231", "Interest payable"),
            ("1132", "Interest receivable"),
        ),
        (
            "interest_income_expense",
            "Intercompany interest income and expense",
            ("6051", "Other operating income - interest"),
            ("6603", "Finance costs - interest"),
        ),
        (
            "funds_occupation_fee",
            "Intercompany funds occupation fees",
            ("6051", "Other operating income"),
            ("6603", "Finance costs"),
        ),
        (
            "current_accounts",
            "Intercompany current accounts",
            ("2241", "Other payables"),
            ("1221", "Other receivables"),
        ),
        (
            "security_deposits",
            "Intercompany security deposits",
            ("2241", "Other payables - deposits"),
            ("1221", "Other receivables - deposits"),
        ),
        (
            "rental_deposits",
            "Intercompany rental deposits",
            ("2241", "Other payables - rental deposits"),
            ("1221", "Other receivables - rental deposits"),
        ),
        (
            "advances_on_behalf",
            "Advances paid on behalf of group entities",
            ("2241", "Other payables - advances on behalf"),
            ("1221", "Other receivables - advances on behalf"),
        ),
        (
            "loan_bad_debt_provision",
            "Bad debt provision on internal loans",
            ("1231", "Bad debt provision - other receivables"),
            ("6701", "Asset impairment loss"),
        ),
        (
            "dividends_payable",
            "Intercompany dividends declared",
            ("2232", "Dividends payable"),
            ("1131", "Dividends receivable"),
        ),
    ];

    for (index, (sub, name, debit, credit)) in tail.into_iter().enumerate() {
        let number = index + 2;
        templates.push(sub_scenario_template(
            &format!("DEBT_{number:02}"),
            name,
            TemplateGroup::Debt,
            ScenarioType::Loan,
            sub,
            debit,
            credit,
            u32::try_from(number).unwrap_or(u32::MAX),
        ));
    }

    templates
}

fn asset_transfer_templates(statutory_rate: Decimal) -> Vec<EliminationTemplate> {
    // The base fixed-asset template carries the deferred-tax leg: the
    // unrealized gain eliminated from the asset also moves tax.
    let mut fixed_assets = template(
        "ASSET_01",
        "Unrealized gain on fixed asset transfer",
        TemplateGroup::AssetTransfer,
        ScenarioType::AssetTransfer,
        None,
        ("6301", "Non-operating income"),
        ("1601", "Fixed assets"),
        AmountFormula::Literal(AmountField::UnrealizedProfit),
        Condition::All(vec![
            Condition::ScenarioIs(ScenarioType::AssetTransfer),
            Condition::HasUnrealizedProfit,
        ]),
        1,
    );
    fixed_assets.additional_legs = vec![TemplateLeg {
        debit_code: "1811".to_string(),
        debit_name: "Deferred tax assets".to_string(),
        credit_code: "6801".to_string(),
        credit_name: "Income tax expense".to_string(),
        formula: AmountFormula::Product {
            field: AmountField::UnrealizedProfit,
            multiplier: AmountField::TaxRate,
            default_multiplier: statutory_rate,
        },
    }];

    let mut templates = vec![fixed_assets];

    let tail: [(&str, &str, (&str, &str)); 9] = [
        (
            "accumulated_depreciation",
            "Depreciation adjustment on transferred fixed assets",
            ("1602", "Accumulated depreciation"),
        ),
        (
            "intangible_assets",
            "Unrealized gain on intangible asset transfer",
            ("1701", "Intangible assets"),
        ),
        (
            "accumulated_amortization",
            "Amortization adjustment on transferred intangibles",
            ("1702", "Accumulated amortization"),
        ),
        (
            "equity_investment_transfer",
            "Unrealized gain on equity investment transfer",
            ("1411", "Long-term equity investments"),
        ),
        (
            "investment_property",
            "Unrealized gain on investment property transfer",
            ("1531", "Investment property"),
        ),
        (
            "construction_in_progress",
            "Unrealized gain on construction in progress transfer",
            ("1604", "Construction in progress"),
        ),
        (
            "bearer_biological_assets",
            "Unrealized gain on bearer biological asset transfer",
            ("1621", "Bearer biological assets"),
        ),
        (
            "oil_and_gas_assets",
            "Unrealized gain on oil and gas asset transfer",
            ("1631", "Oil and gas assets"),
        ),
        (
            "right_of_use_assets",
            "Unrealized gain on right-of-use asset transfer",
            ("1661", "Right-of-use assets"),
        ),
    ];

    for (index, (sub, name, credit)) in tail.into_iter().enumerate() {
        let number = index + 2;
        templates.push(template(
            &format!("ASSET_{number:02}"),
            name,
            TemplateGroup::AssetTransfer,
            ScenarioType::AssetTransfer,
            Some(sub),
            ("6301", "Non-operating income"),
            credit,
            AmountFormula::Literal(AmountField::UnrealizedProfit),
            Condition::All(vec![
                Condition::SubScenarioIs(sub.to_string()),
                Condition::HasUnrealizedProfit,
            ]),
            u32::try_from(number).unwrap_or(u32::MAX),
        ));
    }

    templates
}

fn equity_templates() -> Vec<EliminationTemplate> {
    let tail: [(&str, &str, (&str, &str), (&str, &str)); 8] = [
        (
            "investment_vs_equity",
            "Investment against subsidiary equity",
            ("3101", "Paid-in capital"),
            ("1411", "Long-term equity investments"),
        ),
        (
            "minority_equity_recognition",
            "Minority interest recognition",
            ("3104", "Retained earnings"),
            ("3501", "Minority interest"),
        ),
        (
            "minority_profit_recognition",
            "Minority interest in profit",
            ("3104", "Retained earnings"),
            ("6901", "Profit attributable to minority shareholders"),
        ),
        (
            "capital_reserve_elimination",
            "Capital reserve elimination",
            ("3111", "Capital reserve"),
            ("1411", "Long-term equity investments"),
        ),
        (
            "oci_elimination",
            "Other comprehensive income elimination",
            ("3301", "Other comprehensive income"),
            ("1411", "Long-term equity investments"),
        ),
        (
            "internal_dividends",
            "Internal dividend elimination",
            ("6111", "Investment income"),
            ("3104", "Retained earnings"),
        ),
        (
            "goodwill_recognition",
            "Goodwill recognition on consolidation",
            ("1801", "Goodwill"),
            ("1411", "Long-term equity investments"),
        ),
        (
            "goodwill_impairment",
            "Goodwill impairment at group level",
            ("6701", "Asset impairment loss"),
            ("1801", "Goodwill"),
        ),
    ];

    tail.into_iter()
        .enumerate()
        .map(|(index, (sub, name, debit, credit))| {
            sub_scenario_template(
                &format!("EQUITY_{:02}", index + 1),
                name,
                TemplateGroup::Equity,
                ScenarioType::Other,
                sub,
                debit,
                credit,
                u32::try_from(index + 1).unwrap_or(u32::MAX),
            )
        })
        .collect()
}

fn special_templates() -> Vec<EliminationTemplate> {
    let mut templates = vec![template(
        "SPECIAL_01",
        "Intercompany guarantee fee elimination",
        TemplateGroup::Special,
        ScenarioType::Guarantee,
        None,
        ("6051", "Other operating income"),
        ("6602", "Administrative expenses"),
        AmountFormula::Literal(AmountField::TransactionAmount),
        Condition::Always,
        1,
    )];

    let tail: [(&str, &str, (&str, &str), (&str, &str)); 5] = [
        (
            "intragroup_insurance",
            "Intercompany insurance premium elimination",
            ("6051", "Other operating income"),
            ("6602", "Administrative expenses"),
        ),
        (
            "intragroup_donations",
            "Intercompany donation elimination",
            ("6711", "Non-operating expenses"),
            ("6301", "Non-operating income"),
        ),
        (
            "intragroup_fines",
            "Intercompany fine elimination",
            ("6711", "Non-operating expenses"),
            ("6301", "Non-operating income"),
        ),
        (
            "rd_services",
            "Intercompany R&D service elimination",
            ("4301", "Research and development expenditure"),
            ("6001", "Operating revenue"),
        ),
        (
            "scope_change_adjustment",
            "Consolidation scope change adjustment",
            ("3104", "Retained earnings"),
            ("1411", "Long-term equity investments"),
        ),
    ];

    for (index, (sub, name, debit, credit)) in tail.into_iter().enumerate() {
        let number = index + 2;
        templates.push(sub_scenario_template(
            &format!("SPECIAL_{number:02}"),
            name,
            TemplateGroup::Special,
            ScenarioType::Other,
            sub,
            debit,
            credit,
            u32::try_from(number).unwrap_or(u32::MAX),
        ));
    }

    templates
}
