//! Financial health score from the latest reported statements.
//!
//! Ratios are derived with safe division, each ratio is banded into a 30-90
//! style score, and the weighted sum gives a 0-100 total. A ratio that cannot
//! be computed falls through every band check and lands in the lowest band.

use crate::ask_ai::Language;
use crate::models::{FinancialStatement, IndustryBenchmarks};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_TAX_RATE: f64 = 0.25;
pub const DEFAULT_INVENTORY_TURNOVER: f64 = 5.0;

fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d).filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Ratios derived from one statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    // Solvency
    pub debt_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub cash_ratio: Option<f64>,
    pub interest_coverage: Option<f64>,
    // Profitability
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub net_profit_margin: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_invested_capital: Option<f64>,
    // Efficiency
    pub asset_turnover: Option<f64>,
    pub inventory_turnover: Option<f64>,
    pub receivables_turnover: Option<f64>,
    // Cash flow
    pub operating_cash_flow_ratio: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub fcfe: Option<f64>,
    // Per share
    pub eps: Option<f64>,
    pub book_value_per_share: Option<f64>,
    pub cash_flow_per_share: Option<f64>,
}

impl FinancialMetrics {
    pub fn from_statement(stmt: &FinancialStatement) -> Self {
        let inventory = stmt.inventory.unwrap_or(0.0);
        let receivables = stmt.accounts_receivable.filter(|v| *v != 0.0).unwrap_or(1.0);
        let cogs = stmt.cost_of_goods_sold.unwrap_or(0.0);
        let capex = stmt.capital_expenditures.unwrap_or(0.0);
        let net_borrowing = stmt.net_borrowing.unwrap_or(0.0);
        let ebit = stmt.ebitda.or(stmt.operating_income);
        let operating_income = stmt.operating_income.or(stmt.ebitda);

        let free_cash_flow = stmt.operating_cash_flow.map(|ocf| ocf - capex);
        let fcfe = free_cash_flow.map(|fcf| {
            fcf - stmt.interest_expense.unwrap_or(0.0) * (1.0 - DEFAULT_TAX_RATE) + net_borrowing
        });

        let invested_capital = match (stmt.total_assets, stmt.current_liabilities) {
            (Some(assets), Some(cl)) => Some(assets - cl),
            _ => None,
        };

        Self {
            debt_ratio: safe_div(stmt.total_liabilities, stmt.total_assets),
            debt_to_equity: safe_div(stmt.total_liabilities, stmt.total_equity),
            current_ratio: safe_div(stmt.current_assets, stmt.current_liabilities),
            quick_ratio: safe_div(
                stmt.current_assets.map(|ca| ca - inventory),
                stmt.current_liabilities,
            ),
            cash_ratio: safe_div(stmt.cash, stmt.current_liabilities),
            interest_coverage: safe_div(ebit, stmt.interest_expense),
            gross_margin: safe_div(stmt.revenue.map(|r| r - cogs), stmt.revenue),
            operating_margin: safe_div(operating_income, stmt.revenue),
            net_profit_margin: safe_div(stmt.net_income, stmt.revenue),
            return_on_assets: safe_div(stmt.net_income, stmt.total_assets),
            return_on_equity: safe_div(stmt.net_income, stmt.total_equity),
            return_on_invested_capital: safe_div(ebit, invested_capital),
            asset_turnover: safe_div(stmt.revenue, stmt.total_assets),
            inventory_turnover: safe_div(
                stmt.cost_of_goods_sold.or(stmt.revenue),
                Some(if inventory == 0.0 { 1.0 } else { inventory }),
            ),
            receivables_turnover: safe_div(stmt.revenue, Some(receivables)),
            operating_cash_flow_ratio: safe_div(stmt.operating_cash_flow, stmt.current_liabilities),
            free_cash_flow,
            fcfe,
            eps: safe_div(stmt.net_income, stmt.shares_outstanding),
            book_value_per_share: safe_div(stmt.total_equity, stmt.shares_outstanding),
            cash_flow_per_share: safe_div(stmt.operating_cash_flow, stmt.shares_outstanding),
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::DebtRatio => self.debt_ratio,
            Metric::DebtToEquity => self.debt_to_equity,
            Metric::CurrentRatio => self.current_ratio,
            Metric::QuickRatio => self.quick_ratio,
            Metric::CashRatio => self.cash_ratio,
            Metric::InterestCoverage => self.interest_coverage,
            Metric::GrossMargin => self.gross_margin,
            Metric::OperatingMargin => self.operating_margin,
            Metric::NetProfitMargin => self.net_profit_margin,
            Metric::ReturnOnAssets => self.return_on_assets,
            Metric::ReturnOnEquity => self.return_on_equity,
            Metric::ReturnOnInvestedCapital => self.return_on_invested_capital,
            Metric::AssetTurnover => self.asset_turnover,
            Metric::InventoryTurnover => self.inventory_turnover,
            Metric::ReceivablesTurnover => self.receivables_turnover,
            Metric::OperatingCashFlowRatio => self.operating_cash_flow_ratio,
            Metric::FreeCashFlow => self.free_cash_flow,
            Metric::Fcfe => self.fcfe,
            Metric::Eps => self.eps,
            Metric::BookValuePerShare => self.book_value_per_share,
            Metric::CashFlowPerShare => self.cash_flow_per_share,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Solvency,
    Profitability,
    Efficiency,
    CashFlow,
    MarketValue,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Solvency,
        Category::Profitability,
        Category::Efficiency,
        Category::CashFlow,
        Category::MarketValue,
    ];

    pub fn label(&self, language: &Language) -> &'static str {
        match (self, language) {
            (Category::Solvency, Language::Chinese) => "偿债能力",
            (Category::Profitability, Language::Chinese) => "盈利能力",
            (Category::Efficiency, Language::Chinese) => "运营效率",
            (Category::CashFlow, Language::Chinese) => "现金流状况",
            (Category::MarketValue, Language::Chinese) => "市场价值",
            (Category::Solvency, Language::English) => "Solvency",
            (Category::Profitability, Language::English) => "Profitability",
            (Category::Efficiency, Language::English) => "Operating efficiency",
            (Category::CashFlow, Language::English) => "Cash flow",
            (Category::MarketValue, Language::English) => "Market value",
        }
    }

    /// Advice for a weak (< 50) or middling (< 70) category average
    fn advice(&self, weak: bool, language: &Language) -> &'static str {
        match (self, weak, language) {
            (Category::Solvency, true, Language::Chinese) => "偿债能力较弱，建议关注债务水平，考虑优化资本结构，降低财务风险。",
            (Category::Solvency, false, Language::Chinese) => "偿债能力一般，可适当控制负债规模，提高流动性水平。",
            (Category::Profitability, true, Language::Chinese) => "盈利能力较差，建议分析成本结构，寻找提高利润率的途径，如降低成本或提高售价。",
            (Category::Profitability, false, Language::Chinese) => "盈利能力有待提高，可以通过优化产品线或提高运营效率来增加利润。",
            (Category::Efficiency, true, Language::Chinese) => "运营效率较低，建议优化供应链管理，减少库存积压，提高资产利用效率。",
            (Category::Efficiency, false, Language::Chinese) => "运营效率一般，可以进一步优化业务流程，提高资产周转速度。",
            (Category::CashFlow, true, Language::Chinese) => "现金流状况不佳，需加强应收账款管理，提高现金流稳定性，确保有足够资金支持运营。",
            (Category::CashFlow, false, Language::Chinese) => "现金流状况一般，建议关注经营活动现金流，确保资金能够满足短期债务需求。",
            (Category::MarketValue, true, Language::Chinese) => "市场价值指标较弱，需提升公司盈利能力和市场表现，增强投资者信心。",
            (Category::MarketValue, false, Language::Chinese) => "市场价值有待提升，可以通过提高盈利水平和分红政策来增强股东回报。",
            (Category::Solvency, true, Language::English) => "Solvency is weak: watch the debt level, consider optimising the capital structure and lowering financial risk.",
            (Category::Solvency, false, Language::English) => "Solvency is average: keep liabilities in check and improve liquidity.",
            (Category::Profitability, true, Language::English) => "Profitability is poor: analyse the cost structure and look for ways to lift margins.",
            (Category::Profitability, false, Language::English) => "Profitability could improve through a better product line or more efficient operations.",
            (Category::Efficiency, true, Language::English) => "Operating efficiency is low: tighten supply chain management, reduce inventory and use assets better.",
            (Category::Efficiency, false, Language::English) => "Operating efficiency is average: streamline processes to turn assets over faster.",
            (Category::CashFlow, true, Language::English) => "Cash flow is poor: strengthen receivables management so operations stay funded.",
            (Category::CashFlow, false, Language::English) => "Cash flow is average: make sure operating cash flow covers short-term debt.",
            (Category::MarketValue, true, Language::English) => "Per-share value is weak: earnings and market performance need to improve.",
            (Category::MarketValue, false, Language::English) => "Per-share value could improve through higher earnings and dividends.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(&Language::English))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    DebtRatio,
    DebtToEquity,
    CurrentRatio,
    QuickRatio,
    CashRatio,
    InterestCoverage,
    GrossMargin,
    OperatingMargin,
    NetProfitMargin,
    ReturnOnAssets,
    ReturnOnEquity,
    ReturnOnInvestedCapital,
    AssetTurnover,
    InventoryTurnover,
    ReceivablesTurnover,
    OperatingCashFlowRatio,
    FreeCashFlow,
    Fcfe,
    Eps,
    BookValuePerShare,
    CashFlowPerShare,
}

impl Metric {
    pub const ALL: [Metric; 21] = [
        Metric::DebtRatio,
        Metric::DebtToEquity,
        Metric::CurrentRatio,
        Metric::QuickRatio,
        Metric::CashRatio,
        Metric::InterestCoverage,
        Metric::GrossMargin,
        Metric::OperatingMargin,
        Metric::NetProfitMargin,
        Metric::ReturnOnAssets,
        Metric::ReturnOnEquity,
        Metric::ReturnOnInvestedCapital,
        Metric::AssetTurnover,
        Metric::InventoryTurnover,
        Metric::ReceivablesTurnover,
        Metric::OperatingCashFlowRatio,
        Metric::FreeCashFlow,
        Metric::Fcfe,
        Metric::Eps,
        Metric::BookValuePerShare,
        Metric::CashFlowPerShare,
    ];

    pub fn category(&self) -> Category {
        use Metric::*;
        match self {
            DebtRatio | DebtToEquity | CurrentRatio | QuickRatio | CashRatio | InterestCoverage => {
                Category::Solvency
            }
            GrossMargin | OperatingMargin | NetProfitMargin | ReturnOnAssets | ReturnOnEquity
            | ReturnOnInvestedCapital => Category::Profitability,
            AssetTurnover | InventoryTurnover | ReceivablesTurnover => Category::Efficiency,
            OperatingCashFlowRatio | FreeCashFlow | Fcfe => Category::CashFlow,
            Eps | BookValuePerShare | CashFlowPerShare => Category::MarketValue,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Metric::AssetTurnover | Metric::InventoryTurnover => 0.07,
            Metric::ReceivablesTurnover => 0.06,
            Metric::Eps | Metric::BookValuePerShare => 0.02,
            Metric::CashFlowPerShare => 0.01,
            _ => 0.05,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::DebtRatio => "debt_ratio",
            Metric::DebtToEquity => "debt_to_equity",
            Metric::CurrentRatio => "current_ratio",
            Metric::QuickRatio => "quick_ratio",
            Metric::CashRatio => "cash_ratio",
            Metric::InterestCoverage => "interest_coverage",
            Metric::GrossMargin => "gross_margin",
            Metric::OperatingMargin => "operating_margin",
            Metric::NetProfitMargin => "net_profit_margin",
            Metric::ReturnOnAssets => "return_on_assets",
            Metric::ReturnOnEquity => "return_on_equity",
            Metric::ReturnOnInvestedCapital => "return_on_invested_capital",
            Metric::AssetTurnover => "asset_turnover",
            Metric::InventoryTurnover => "inventory_turnover",
            Metric::ReceivablesTurnover => "receivables_turnover",
            Metric::OperatingCashFlowRatio => "operating_cash_flow_ratio",
            Metric::FreeCashFlow => "free_cash_flow",
            Metric::Fcfe => "fcfe",
            Metric::Eps => "eps",
            Metric::BookValuePerShare => "book_value_per_share",
            Metric::CashFlowPerShare => "cash_flow_per_share",
        }
    }

    /// Band score for this metric; `None` takes the lowest band
    pub fn score(&self, value: Option<f64>, benchmarks: &IndustryBenchmarks) -> f64 {
        // NaN fails every comparison, like a missing report field
        let v = value.unwrap_or(f64::NAN);
        use Metric::*;
        match self {
            DebtRatio => descending(v, [0.4, 0.6, 0.8]),
            DebtToEquity => descending(v, [1.0, 1.5, 2.0]),
            CurrentRatio => centred(v, (1.5, 2.5), (1.0, 3.0), (0.5, 4.0)),
            QuickRatio => centred(v, (0.8, 1.2), (0.5, 1.5), (0.2, 2.0)),
            CashRatio => centred(v, (0.5, 1.0), (0.3, 1.5), (0.1, 2.0)),
            InterestCoverage => ascending(v, [5.0, 3.0, 1.5]),
            GrossMargin | OperatingMargin | NetProfitMargin => ascending(v, [0.25, 0.15, 0.05]),
            ReturnOnAssets | ReturnOnEquity | ReturnOnInvestedCapital => {
                ascending(v, [0.15, 0.10, 0.05])
            }
            AssetTurnover | ReceivablesTurnover => ascending(v, [1.5, 1.0, 0.5]),
            InventoryTurnover => {
                let avg = benchmarks
                    .inventory_turnover
                    .unwrap_or(DEFAULT_INVENTORY_TURNOVER);
                centred(v, (avg * 0.7, avg * 1.3), (avg * 0.5, avg * 1.5), (avg * 0.3, avg * 2.0))
            }
            OperatingCashFlowRatio | FreeCashFlow | Fcfe => cash_flow(v),
            Eps | BookValuePerShare | CashFlowPerShare => ascending(v, [5.0, 2.0, 0.0]),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower is better: < t0 → 90, < t1 → 70, < t2 → 50, else 30
fn descending(v: f64, t: [f64; 3]) -> f64 {
    if v < t[0] {
        90.0
    } else if v < t[1] {
        70.0
    } else if v < t[2] {
        50.0
    } else {
        30.0
    }
}

/// Higher is better: > t0 → 90, > t1 → 70, > t2 → 50, else 30
fn ascending(v: f64, t: [f64; 3]) -> f64 {
    if v > t[0] {
        90.0
    } else if v > t[1] {
        70.0
    } else if v > t[2] {
        50.0
    } else {
        30.0
    }
}

/// Best inside `best`, then widening rings
fn centred(v: f64, best: (f64, f64), good: (f64, f64), fair: (f64, f64)) -> f64 {
    if best.0 <= v && v <= best.1 {
        90.0
    } else if good.0 <= v && v <= good.1 {
        70.0
    } else if fair.0 <= v && v <= fair.1 {
        50.0
    } else {
        30.0
    }
}

fn cash_flow(v: f64) -> f64 {
    if v > 0.0 {
        80.0 + (v / 10.0).min(20.0)
    } else if v > -5.0 {
        40.0 + (v / 10.0).min(40.0)
    } else {
        20.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub total: f64,
    pub trend: String,
    pub category_scores: BTreeMap<Category, f64>,
    pub detail_scores: BTreeMap<Metric, f64>,
    pub advice: Vec<String>,
}

fn trend_text(total: f64, language: &Language) -> &'static str {
    let band = if total >= 85.0 {
        0
    } else if total >= 70.0 {
        1
    } else if total >= 55.0 {
        2
    } else if total >= 40.0 {
        3
    } else {
        4
    };

    match language {
        Language::Chinese => [
            "强烈推荐买入，财务状况极佳，投资价值高",
            "推荐买入，财务状况良好，投资价值较高",
            "谨慎买入，财务状况一般，存在一定风险",
            "建议观望，财务状况较差，风险较高",
            "不建议投资，财务状况不佳，风险很大",
        ][band],
        Language::English => [
            "Strong buy: excellent financial condition, high investment value",
            "Buy: good financial condition, fairly high investment value",
            "Cautious buy: average financial condition with some risk",
            "Wait and see: weak financial condition, high risk",
            "Avoid: poor financial condition, very high risk",
        ][band],
    }
}

fn build_advice(detail: &BTreeMap<Metric, f64>, language: &Language) -> Vec<String> {
    let mut advice: Vec<String> = Category::ALL
        .iter()
        .filter_map(|category| {
            let scores: Vec<f64> = detail
                .iter()
                .filter(|(m, _)| m.category() == *category)
                .map(|(_, s)| *s)
                .collect();
            let avg = scores.iter().sum::<f64>() / scores.len().max(1) as f64;
            if avg < 50.0 {
                Some(category.advice(true, language).to_string())
            } else if avg < 70.0 {
                Some(category.advice(false, language).to_string())
            } else {
                None
            }
        })
        .collect();

    if advice.is_empty() {
        advice.push(
            match language {
                Language::Chinese => "公司财务状况良好，各方面指标表现均衡，建议继续保持当前经营策略。",
                Language::English => "The company is financially healthy and balanced across all categories; keep the current strategy.",
            }
            .to_string(),
        );
    } else {
        advice.insert(
            0,
            match language {
                Language::Chinese => "综合财务分析，公司存在以下改进空间：",
                Language::English => "Overall financial analysis shows room for improvement in:",
            }
            .to_string(),
        );
    }

    advice
}

/// Score a metrics set against industry benchmarks
pub fn health_report(
    metrics: &FinancialMetrics,
    benchmarks: &IndustryBenchmarks,
    language: &Language,
) -> HealthReport {
    let detail_scores: BTreeMap<Metric, f64> = Metric::ALL
        .iter()
        .map(|m| (*m, m.score(metrics.value(*m), benchmarks)))
        .collect();

    let total: f64 = detail_scores.iter().map(|(m, s)| s * m.weight()).sum();

    let category_scores = Category::ALL
        .iter()
        .map(|category| {
            let (weighted, weights) = detail_scores
                .iter()
                .filter(|(m, _)| m.category() == *category)
                .fold((0.0, 0.0), |(acc, w), (m, s)| (acc + s * m.weight(), w + m.weight()));
            (*category, if weights > 0.0 { weighted / weights } else { 0.0 })
        })
        .collect();

    HealthReport {
        total: (total * 100.0).round() / 100.0,
        trend: trend_text(total, language).to_string(),
        category_scores,
        advice: build_advice(&detail_scores, language),
        detail_scores,
    }
}

/// Statement in, health report out
pub fn assess(
    stmt: &FinancialStatement,
    benchmarks: &IndustryBenchmarks,
    language: &Language,
) -> HealthReport {
    health_report(&FinancialMetrics::from_statement(stmt), benchmarks, language)
}
