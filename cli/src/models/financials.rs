use serde::{Deserialize, Serialize};

/// Latest reported financial statement fields for one company.
///
/// Every field is optional: the upstream reports leave gaps and the
/// metrics layer decides how each gap is filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatement {
    pub code: String,
    pub report_date: Option<String>,
    // Balance sheet
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub total_equity: Option<f64>,
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub cash: Option<f64>,
    pub inventory: Option<f64>,
    pub accounts_receivable: Option<f64>,
    // Income statement
    pub revenue: Option<f64>,
    pub cost_of_goods_sold: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub interest_expense: Option<f64>,
    pub ebitda: Option<f64>,
    // Cash flow statement
    pub operating_cash_flow: Option<f64>,
    pub capital_expenditures: Option<f64>,
    pub net_borrowing: Option<f64>,
    // Share capital
    pub shares_outstanding: Option<f64>,
}

impl FinancialStatement {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            ..Default::default()
        }
    }

    /// True when none of the core balance sheet and income fields arrived
    pub fn is_empty(&self) -> bool {
        self.total_assets.is_none() && self.revenue.is_none() && self.net_income.is_none()
    }
}

/// Industry reference values used by relative scorers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndustryBenchmarks {
    pub inventory_turnover: Option<f64>,
}
