// ==========================================
// 销售执行人业绩分析 - 趋势引擎
// ==========================================
// 职责: 执行人周期对比与趋势分类
// 口径: pct = (本期 - 上期) / |上期| * 100
// 分类: 无上期或上期利润为 0 → New
//       |pct| < 阈值 → Stable;pct > 0 → Up;否则 → Down
// ==========================================

use crate::config::ReportConfig;
use crate::domain::{ExecutiveTrend, PeriodAgg, PeriodKey, TrendDirection};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

// ==========================================
// TrendEngine - 趋势引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct TrendEngine {
    stable_threshold_pct: f64,
}

impl Default for TrendEngine {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl TrendEngine {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            stable_threshold_pct: config.trend_stable_threshold_pct,
        }
    }

    /// 按利润变化百分比分类（None 表示没有可比的上期）
    pub fn classify(&self, profit_pct_change: Option<f64>) -> TrendDirection {
        match profit_pct_change {
            None => TrendDirection::New,
            Some(pct) if pct.abs() < self.stable_threshold_pct => TrendDirection::Stable,
            Some(pct) if pct > 0.0 => TrendDirection::Up,
            Some(_) => TrendDirection::Down,
        }
    }

    /// 构造单个执行人的对比结果
    pub fn build_trend<K: PeriodKey>(
        &self,
        executive: &str,
        current: Option<&PeriodAgg<K>>,
        previous: Option<&PeriodAgg<K>>,
    ) -> ExecutiveTrend<K> {
        let profit_change = current.zip(previous).map(|(c, p)| c.profit - p.profit);
        let ops_change = current
            .zip(previous)
            .map(|(c, p)| c.ops as i64 - p.ops as i64);

        // 本期缺失时按 0 计,上期利润为 0 时无定义
        let profit_pct_change = previous.filter(|p| p.profit != 0.0).map(|p| {
            let current_profit = current.map_or(0.0, |c| c.profit);
            (current_profit - p.profit) / p.profit.abs() * 100.0
        });

        ExecutiveTrend {
            executive: executive.to_string(),
            current: current.cloned(),
            previous: previous.cloned(),
            profit_change,
            profit_pct_change,
            ops_change,
            trend: self.classify(profit_pct_change),
        }
    }

    /// 每个执行人最近两期的对比（按执行人排序）
    ///
    /// 只有一期数据的执行人也会返回,趋势为 New
    #[instrument(skip_all, fields(granularity = %K::GRANULARITY, buckets = aggregates.len()))]
    pub fn latest_trends<K: PeriodKey>(&self, aggregates: &[PeriodAgg<K>]) -> Vec<ExecutiveTrend<K>> {
        let mut by_executive: BTreeMap<&str, Vec<&PeriodAgg<K>>> = BTreeMap::new();
        for agg in aggregates {
            by_executive.entry(agg.executive.as_str()).or_default().push(agg);
        }

        by_executive
            .into_iter()
            .map(|(executive, mut history)| {
                history.sort_by(|a, b| a.period.cmp(&b.period));
                let (current, previous) = match history.as_slice() {
                    [.., previous, current] => (Some(*current), Some(*previous)),
                    [only] => (Some(*only), None),
                    [] => (None, None),
                };
                self.build_trend(executive, current, previous)
            })
            .collect()
    }

    /// 解析对比周期
    ///
    /// # 参数
    /// - `current`: None 表示最新周期
    /// - `previous`: None 表示本期的前一个周期
    ///
    /// # 返回
    /// - None: 没有数据,或本期已是最早周期
    pub fn resolve_periods<K: PeriodKey>(
        &self,
        aggregates: &[PeriodAgg<K>],
        current: Option<K>,
        previous: Option<K>,
    ) -> Option<(K, K)> {
        let available: Vec<K> = aggregates
            .iter()
            .map(|a| a.period.clone())
            .collect::<BTreeSet<K>>()
            .into_iter()
            .collect();

        let current = match current {
            Some(k) => k,
            None => available.last()?.clone(),
        };
        let previous = match previous {
            Some(k) => k,
            None => {
                let idx = available.iter().position(|k| *k == current)?;
                available.get(idx.checked_sub(1)?)?.clone()
            }
        };
        Some((current, previous))
    }

    /// 指定两期对比: 在任一期有数据的执行人各返回一条（按执行人排序）
    #[instrument(skip(self, aggregates), fields(granularity = %K::GRANULARITY))]
    pub fn compare_periods<K: PeriodKey>(
        &self,
        aggregates: &[PeriodAgg<K>],
        current: Option<K>,
        previous: Option<K>,
    ) -> Vec<ExecutiveTrend<K>> {
        let Some((current, previous)) = self.resolve_periods(aggregates, current, previous) else {
            debug!("无可对比周期");
            return Vec::new();
        };

        let find = |executive: &str, period: &K| {
            aggregates
                .iter()
                .find(|a| a.executive == executive && a.period == *period)
        };

        let executives: BTreeSet<&str> = aggregates.iter().map(|a| a.executive.as_str()).collect();
        let trends: Vec<ExecutiveTrend<K>> = executives
            .into_iter()
            .filter_map(|executive| {
                let cur = find(executive, &current);
                let prev = find(executive, &previous);
                if cur.is_none() && prev.is_none() {
                    return None;
                }
                Some(self.build_trend(executive, cur, prev))
            })
            .collect();

        debug!(current = %current, previous = %previous, executives = trends.len(), "周期对比完成");
        trends
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MonthKey, MonthlyAgg, WeekKey, WeeklyAgg};

    fn month(m: u32) -> MonthKey {
        MonthKey::new(2024, m).unwrap()
    }

    fn agg(exec: &str, m: u32, profit: f64, ops: usize) -> MonthlyAgg {
        MonthlyAgg {
            profit,
            ops,
            ..MonthlyAgg::empty(exec, month(m))
        }
    }

    #[test]
    fn test_classify_thresholds() {
        let engine = TrendEngine::default();
        assert_eq!(engine.classify(None), TrendDirection::New);
        assert_eq!(engine.classify(Some(4.99)), TrendDirection::Stable);
        assert_eq!(engine.classify(Some(-4.99)), TrendDirection::Stable);
        assert_eq!(engine.classify(Some(5.0)), TrendDirection::Up);
        assert_eq!(engine.classify(Some(-5.0)), TrendDirection::Down);
    }

    #[test]
    fn test_latest_trends_up() {
        let aggs = vec![agg("Ana", 1, 100.0, 2), agg("Ana", 2, 150.0, 3)];
        let trends = TrendEngine::default().latest_trends(&aggs);

        assert_eq!(trends.len(), 1);
        let t = &trends[0];
        assert_eq!(t.trend, TrendDirection::Up);
        assert_eq!(t.profit_change, Some(50.0));
        assert_eq!(t.profit_pct_change, Some(50.0));
        assert_eq!(t.ops_change, Some(1));
    }

    #[test]
    fn test_latest_trends_previous_zero_is_new() {
        let aggs = vec![agg("Ana", 1, 0.0, 1), agg("Ana", 2, 80.0, 1)];
        let t = &TrendEngine::default().latest_trends(&aggs)[0];

        assert_eq!(t.trend, TrendDirection::New);
        assert_eq!(t.profit_pct_change, None);
        assert_eq!(t.profit_change, Some(80.0));
    }

    #[test]
    fn test_latest_trends_single_period_and_negative_base() {
        let aggs = vec![
            agg("Luis", 3, 10.0, 1),
            agg("Ana", 10, -50.0, 1),
            agg("Ana", 2, -100.0, 1),
        ];
        let trends = TrendEngine::default().latest_trends(&aggs);

        // Ana: 2 月 -100 → 10 月 -50,以 |上期| 为基数 → +50%
        assert_eq!(trends[0].executive, "Ana");
        assert_eq!(trends[0].previous.as_ref().map(|p| p.period), Some(month(2)));
        assert_eq!(trends[0].profit_pct_change, Some(50.0));
        assert_eq!(trends[0].trend, TrendDirection::Up);

        assert_eq!(trends[1].executive, "Luis");
        assert_eq!(trends[1].trend, TrendDirection::New);
        assert_eq!(trends[1].ops_change, None);
    }

    #[test]
    fn test_compare_periods_latest_vs_previous() {
        let aggs = vec![
            agg("Ana", 1, 100.0, 1),
            agg("Ana", 3, 104.0, 1),
            agg("Luis", 2, 50.0, 1),
            agg("Pia", 3, 10.0, 1),
        ];
        let trends = TrendEngine::default().compare_periods(&aggs, None, None);

        // 最新 3 月,前一期 2 月
        let names: Vec<&str> = trends.iter().map(|t| t.executive.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Luis", "Pia"]);

        // Ana 2 月无数据 → New
        assert_eq!(trends[0].trend, TrendDirection::New);
        // Luis 3 月无数据: 按 0 计 → -100%
        assert_eq!(trends[1].profit_pct_change, Some(-100.0));
        assert_eq!(trends[1].trend, TrendDirection::Down);
        assert_eq!(trends[1].profit_change, None);
    }

    #[test]
    fn test_compare_periods_explicit() {
        let aggs = vec![agg("Ana", 1, 100.0, 1), agg("Ana", 3, 104.0, 1)];
        let trends =
            TrendEngine::default().compare_periods(&aggs, Some(month(3)), Some(month(1)));

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].trend, TrendDirection::Stable);
    }

    #[test]
    fn test_compare_periods_without_previous_is_empty() {
        let aggs = vec![agg("Ana", 1, 100.0, 1)];
        let engine = TrendEngine::default();
        assert!(engine.compare_periods(&aggs, None, None).is_empty());
        assert!(engine.compare_periods::<MonthKey>(&[], None, None).is_empty());
    }

    #[test]
    fn test_weekly_trends() {
        let week = |w| WeekKey::new(2024, w).unwrap();
        let aggs = vec![
            WeeklyAgg { profit: 200.0, ..WeeklyAgg::empty("Ana", week(9)) },
            WeeklyAgg { profit: 100.0, ..WeeklyAgg::empty("Ana", week(10)) },
        ];
        let t = &TrendEngine::default().latest_trends(&aggs)[0];
        assert_eq!(t.trend, TrendDirection::Down);
        assert_eq!(t.profit_pct_change, Some(-50.0));
    }
}
