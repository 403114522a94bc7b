// ==========================================
// 销售执行人业绩分析 - 复合指标引擎
// ==========================================
// 职责: 基于执行人汇总 + 月度聚合 + 原始业务行计算全局/进阶指标
// 输入: 范围内汇总 (SummaryMap)、范围内月度聚合、范围内业务行
// 输出: GlobalKpis / AdvancedKpis 快照 (每次调用全量重算)
// ==========================================
// 红线: 任何比率都不产生 NaN/inf
//   - 全局比率分母 <= 0 时取 0
//   - 增长类指标上期 <= 0 或缺失时取 None
// ==========================================

use crate::config::ReportConfig;
use crate::domain::{AdvancedKpis, GlobalKpis, MonthKey, MonthlyAgg, Operation};
use crate::engine::summary::SummaryMap;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, instrument};

/// 百分比: 分母 <= 0 时取 0
fn pct_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// 占比: 分母 <= 0 时取 0,结果截断到 [0, 100]
fn share_pct(part: f64, total: f64) -> f64 {
    pct_or_zero(part, total).clamp(0.0, 100.0)
}

/// 比值: 分母 <= 0 时取 0
fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// 增长率: 上期 <= 0 时无定义
pub fn growth_pct(current: f64, previous: f64) -> Option<f64> {
    if previous > 0.0 {
        Some((current - previous) / previous * 100.0)
    } else {
        None
    }
}

/// 月度序列 (跨执行人求和,按月升序)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MonthTotals {
    income: f64,
    profit: f64,
}

fn monthly_totals(monthly: &[MonthlyAgg]) -> Vec<(MonthKey, MonthTotals)> {
    monthly
        .iter()
        .fold(BTreeMap::<MonthKey, MonthTotals>::new(), |mut acc, agg| {
            let totals = acc.entry(agg.period).or_default();
            totals.income += agg.income;
            totals.profit += agg.profit;
            acc
        })
        .into_iter()
        .collect()
}

/// 最近两期环比
fn last_two_growth(series: &[f64]) -> Option<f64> {
    match series {
        [.., previous, current] => growth_pct(*current, *previous),
        _ => None,
    }
}

/// 最近 window 期之和 vs 再往前 window 期之和（需至少 2 * window 期）
fn window_growth(series: &[f64], window: usize) -> Option<f64> {
    if window == 0 || series.len() < window * 2 {
        return None;
    }
    let split = series.len() - window;
    let current: f64 = series[split..].iter().sum();
    let previous: f64 = series[split - window..split].iter().sum();
    growth_pct(current, previous)
}

/// 变异系数 * 100（总体标准差 / 均值）;序列为空或均值 <= 0 时为 0
fn coefficient_of_variation(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = series.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean * 100.0
}

/// 范围内合计
#[derive(Debug, Default)]
struct ScopeTotals {
    income: f64,
    profit: f64,
    expense: f64,
    ops: usize,
    quotes: usize,
    clients: usize,
    executives: usize,
    top_executive_income: f64,
}

fn scope_totals(summaries: &SummaryMap) -> ScopeTotals {
    let clients: BTreeSet<&String> = summaries.values().flat_map(|s| s.clients.iter()).collect();
    let top_executive_income = summaries
        .values()
        .map(|s| s.income)
        .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
        .unwrap_or(0.0);

    ScopeTotals {
        income: summaries.values().map(|s| s.income).sum(),
        profit: summaries.values().map(|s| s.profit).sum(),
        expense: summaries.values().map(|s| s.expense).sum(),
        ops: summaries.values().map(|s| s.ops).sum(),
        quotes: summaries.values().map(|s| s.quotes).sum(),
        clients: clients.len(),
        executives: summaries.len(),
        top_executive_income,
    }
}

// ==========================================
// KpiEngine - 复合指标引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct KpiEngine {
    quarter_window_months: usize,
}

impl Default for KpiEngine {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl KpiEngine {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            quarter_window_months: config.quarter_window_months,
        }
    }

    /// 全局指标
    ///
    /// # 参数
    /// - `operations`: 范围内业务行（客户集中度按原始业务行口径,无日期行不计入）
    /// - `monthly`: 范围内月度聚合（增长序列）
    /// - `summaries`: 范围内执行人汇总
    #[instrument(skip_all, fields(executives = summaries.len()))]
    pub fn global_kpis(
        &self,
        operations: &[Operation],
        monthly: &[MonthlyAgg],
        summaries: &SummaryMap,
    ) -> GlobalKpis {
        let totals = scope_totals(summaries);

        // 客户收入: 仅统计有日期、有客户且收入非零的业务行
        let mut client_revenue: HashMap<&str, f64> = HashMap::new();
        for op in operations.iter().filter(|op| op.date.is_some()) {
            if let (Some(client), Some(income)) = (op.client.as_deref(), op.income) {
                if income != 0.0 {
                    *client_revenue.entry(client).or_insert(0.0) += income;
                }
            }
        }
        let top_client_revenue = client_revenue
            .values()
            .copied()
            .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
            .unwrap_or(0.0);

        let series = monthly_totals(monthly);
        let incomes: Vec<f64> = series.iter().map(|(_, t)| t.income).collect();
        let profits: Vec<f64> = series.iter().map(|(_, t)| t.profit).collect();

        let kpis = GlobalKpis {
            total_income: totals.income,
            total_profit: totals.profit,
            total_expenses: totals.expense,
            total_ops: totals.ops,
            total_clients: totals.clients,
            executive_count: totals.executives,
            avg_profit_margin: pct_or_zero(totals.profit, totals.income),
            avg_deal_size: ratio_or_zero(totals.income, totals.ops as f64),
            roi: pct_or_zero(totals.profit, totals.expense),
            operational_efficiency: ratio_or_zero(totals.profit, totals.expense),
            top_client_revenue,
            client_concentration_risk: share_pct(top_client_revenue, totals.income),
            revenue_growth: last_two_growth(&incomes),
            profit_growth: last_two_growth(&profits),
        };

        debug!(
            total_income = kpis.total_income,
            total_ops = kpis.total_ops,
            months = series.len(),
            "全局指标计算完成"
        );
        kpis
    }

    /// 进阶指标
    #[instrument(skip_all, fields(executives = summaries.len()))]
    pub fn advanced_kpis(&self, monthly: &[MonthlyAgg], summaries: &SummaryMap) -> AdvancedKpis {
        let totals = scope_totals(summaries);
        let executives = totals.executives as f64;

        let incomes: Vec<f64> = monthly_totals(monthly)
            .into_iter()
            .map(|(_, t)| t.income)
            .collect();

        AdvancedKpis {
            revenue_per_executive: ratio_or_zero(totals.income, executives),
            profit_per_executive: ratio_or_zero(totals.profit, executives),
            ops_per_executive: ratio_or_zero(totals.ops as f64, executives),
            clients_per_executive: ratio_or_zero(totals.clients as f64, executives),
            avg_margin_per_deal: pct_or_zero(totals.profit, totals.income),
            deal_success_rate: pct_or_zero(totals.ops as f64, (totals.ops + totals.quotes) as f64),
            month_over_month_growth: last_two_growth(&incomes),
            quarter_over_quarter_growth: window_growth(&incomes, self.quarter_window_months),
            executive_concentration: share_pct(totals.top_executive_income, totals.income),
            monthly_volatility: coefficient_of_variation(&incomes),
        }
    }
}
