// ==========================================
// 销售执行人业绩分析 - 引擎层
// ==========================================
// 职责: 周期聚合、汇总、复合指标、趋势对比
// 红线: 引擎无状态,每次调用从输入全量重算,不修改上游输出
// ==========================================

pub mod aggregator;
pub mod format;
pub mod kpi;
pub mod summary;
pub mod trend;

// 重导出核心引擎
pub use aggregator::PeriodAggregator;
pub use kpi::{growth_pct, KpiEngine};
pub use summary::{SummaryEngine, SummaryMap};
pub use trend::TrendEngine;
