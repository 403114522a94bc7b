// ==========================================
// 销售执行人业绩分析 - 周期聚合引擎
// ==========================================
// 职责: 按 (执行人, 周期) 分组业务行,生成 MonthlyAgg / WeeklyAgg
// 输入: 业务行集合 + 周期键策略 (月/周,同一泛型算法)
// 输出: 按执行人、周期升序排列的聚合记录
// ==========================================
// 红线: 无日期业务行不参与聚合;
//       报价只计 quotes,金额合计只累加成交行
// ==========================================

use crate::domain::{MonthKey, MonthlyAgg, Operation, PeriodAgg, PeriodKey, WeekKey, WeeklyAgg};
use crate::perf::PerfGuard;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

// ==========================================
// PeriodAggregator - 周期聚合引擎
// ==========================================
// 无状态,所有方法都是纯函数
#[derive(Debug, Default, Clone, Copy)]
pub struct PeriodAggregator;

impl PeriodAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 月度聚合
    pub fn aggregate_monthly(&self, operations: &[Operation]) -> Vec<MonthlyAgg> {
        let _perf = PerfGuard::new("engine.aggregate_monthly");
        self.aggregate::<MonthKey>(operations)
    }

    /// 周度聚合
    pub fn aggregate_weekly(&self, operations: &[Operation]) -> Vec<WeeklyAgg> {
        let _perf = PerfGuard::new("engine.aggregate_weekly");
        self.aggregate::<WeekKey>(operations)
    }

    /// 按周期键策略聚合
    ///
    /// # 规则
    /// - 每条有日期的业务行恰好落入一个桶
    /// - profit_pct: 收入为 0 时为 None
    /// - winrate: 成交 + 报价为 0 时为 None
    #[instrument(skip_all, fields(granularity = %K::GRANULARITY, operations = operations.len()))]
    pub fn aggregate<K: PeriodKey>(&self, operations: &[Operation]) -> Vec<PeriodAgg<K>> {
        // BTreeMap 键 (执行人, 周期) 的自然序即输出顺序
        let mut buckets: BTreeMap<(String, K), PeriodAgg<K>> = BTreeMap::new();
        let mut undated = 0usize;

        for op in operations {
            let Some(date) = op.date else {
                undated += 1;
                continue;
            };
            let period = K::from_date(date);

            let agg = buckets
                .entry((op.executive.clone(), period.clone()))
                .or_insert_with(|| PeriodAgg::empty(op.executive.clone(), period));

            if op.is_quote() {
                agg.quotes += 1;
                continue;
            }

            agg.ops += 1;
            agg.income += op.income.unwrap_or(0.0);
            agg.expense += op.expense.unwrap_or(0.0);
            agg.profit += op.profit.unwrap_or(0.0);
            agg.commission += op.commission.unwrap_or(0.0);
            if let Some(client) = &op.client {
                agg.clients.insert(client.clone());
            }
        }

        let out: Vec<PeriodAgg<K>> = buckets.into_values().map(finalize).collect();
        debug!(buckets = out.len(), undated, "周期聚合完成");
        out
    }
}

/// 计算派生比率
fn finalize<K>(mut agg: PeriodAgg<K>) -> PeriodAgg<K> {
    agg.profit_pct = if agg.income != 0.0 {
        Some(agg.profit / agg.income * 100.0)
    } else {
        None
    };

    let attempts = agg.attempts();
    agg.winrate = if attempts > 0 {
        Some(agg.ops as f64 / attempts as f64 * 100.0)
    } else {
        None
    };

    agg.active_clients = agg.clients.len();
    agg
}
