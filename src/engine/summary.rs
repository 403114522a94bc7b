// ==========================================
// 销售执行人业绩分析 - 汇总引擎
// ==========================================
// 职责: 执行人汇总、排行、图表序列、明细下钻、选项列表
// 口径:
//   - 原始口径: 直接折叠业务行 (含报价与无日期行)
//   - 范围口径: 折叠按 AnalyticsScope 过滤后的月度聚合
// ==========================================

use crate::domain::{
    AnalyticsScope, ExecutiveSummary, MonthKey, MonthlyAgg, Operation, PeriodAgg, PeriodKey,
    PeriodPoint, TopPerformer,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::instrument;

/// 执行人 → 汇总 (按执行人名排序)
pub type SummaryMap = BTreeMap<String, ExecutiveSummary>;

// ==========================================
// SummaryEngine - 汇总引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryEngine;

impl SummaryEngine {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 汇总
    // ==========================================

    /// 原始口径汇总: 每条业务行都计入 ops
    pub fn summarize_operations(&self, operations: &[Operation]) -> SummaryMap {
        operations.iter().fold(SummaryMap::new(), |mut acc, op| {
            let entry = acc.entry(op.executive.clone()).or_default();
            entry.ops += 1;
            entry.income += op.income.unwrap_or(0.0);
            entry.expense += op.expense.unwrap_or(0.0);
            entry.profit += op.profit.unwrap_or(0.0);
            entry.commission += op.commission.unwrap_or(0.0);
            if let Some(client) = &op.client {
                entry.clients.insert(client.clone());
            }
            acc
        })
    }

    /// 范围口径汇总: 折叠落在范围内的月度聚合
    #[instrument(skip(self, monthly), fields(buckets = monthly.len()))]
    pub fn summarize_scope(&self, monthly: &[MonthlyAgg], scope: &AnalyticsScope) -> SummaryMap {
        monthly
            .iter()
            .filter(|agg| scope.matches(agg))
            .fold(SummaryMap::new(), |mut acc, agg| {
                let entry = acc.entry(agg.executive.clone()).or_default();
                entry.ops += agg.ops;
                entry.quotes += agg.quotes;
                entry.income += agg.income;
                entry.expense += agg.expense;
                entry.profit += agg.profit;
                entry.commission += agg.commission;
                entry.clients.extend(agg.clients.iter().cloned());
                acc
            })
    }

    /// 执行人排行（按利润降序,空名排除）
    pub fn top_performers(&self, summaries: &SummaryMap) -> Vec<TopPerformer> {
        let mut performers: Vec<TopPerformer> = summaries
            .iter()
            .filter(|(name, _)| !name.trim().is_empty())
            .map(|(name, s)| TopPerformer {
                executive: name.clone(),
                profit: s.profit,
                profit_margin: s.profit_margin(),
                income: s.income,
                ops: s.ops,
            })
            .collect();

        performers.sort_by(|a, b| b.profit.partial_cmp(&a.profit).unwrap_or(Ordering::Equal));
        performers
    }

    /// 图表序列: 范围内每月的收入/利润/笔数/利润率
    pub fn period_series(&self, monthly: &[MonthlyAgg], scope: &AnalyticsScope) -> Vec<PeriodPoint> {
        let by_month = monthly
            .iter()
            .filter(|agg| scope.matches(agg))
            .fold(BTreeMap::<MonthKey, PeriodPoint>::new(), |mut acc, agg| {
                let point = acc.entry(agg.period).or_insert_with(|| PeriodPoint {
                    month: agg.period,
                    income: 0.0,
                    profit: 0.0,
                    ops: 0,
                    profit_pct: 0.0,
                });
                point.income += agg.income;
                point.profit += agg.profit;
                point.ops += agg.ops;
                acc
            });

        by_month
            .into_values()
            .map(|mut point| {
                point.profit_pct = if point.income > 0.0 {
                    point.profit / point.income * 100.0
                } else {
                    0.0
                };
                point
            })
            .collect()
    }

    // ==========================================
    // 明细下钻
    // ==========================================

    /// 按月份过滤业务行（无日期行不属于任何月份）
    pub fn filter_operations_by_month<'a>(
        &self,
        operations: &'a [Operation],
        month: MonthKey,
    ) -> Vec<&'a Operation> {
        operations
            .iter()
            .filter(|op| op.date.is_some_and(|d| month.contains(d)))
            .collect()
    }

    /// 单个执行人的业务行,可选限定月份
    ///
    /// 按日期降序,无日期行排在最后
    pub fn executive_operations(
        &self,
        operations: &[Operation],
        executive: &str,
        month: Option<MonthKey>,
    ) -> Vec<Operation> {
        let mut selected: Vec<Operation> = operations
            .iter()
            .filter(|op| op.executive == executive)
            .filter(|op| match month {
                Some(m) => op.date.is_some_and(|d| m.contains(d)),
                None => true,
            })
            .cloned()
            .collect();

        // Option<NaiveDate> 中 None < Some,倒序比较即把 None 放到末尾
        selected.sort_by(|a, b| b.date.cmp(&a.date));
        selected
    }

    // ==========================================
    // 选项列表
    // ==========================================

    /// 聚合中出现过的周期（升序去重）
    pub fn available_periods<K: PeriodKey>(&self, aggregates: &[PeriodAgg<K>]) -> Vec<K> {
        aggregates
            .iter()
            .map(|agg| agg.period.clone())
            .collect::<BTreeSet<K>>()
            .into_iter()
            .collect()
    }

    /// 执行人名单（首次出现顺序,空白名排除）
    pub fn executive_options(&self, operations: &[Operation]) -> Vec<String> {
        let mut seen = HashSet::new();
        operations
            .iter()
            .map(|op| op.executive.as_str())
            .filter(|name| !name.trim().is_empty())
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }
}
