// ==========================================
// 销售执行人业绩分析 - 领域模型层
// ==========================================
// 职责: 定义业务行、周期键、聚合结果与指标快照
// 红线: 不含解析逻辑,不含引擎逻辑,全部为不可变值对象
// ==========================================

pub mod aggregate;
pub mod kpi;
pub mod operation;
pub mod period;
pub mod types;

// 重导出核心类型
pub use aggregate::{AnalyticsScope, ExecutiveSummary, MonthlyAgg, PeriodAgg, WeeklyAgg};
pub use kpi::{AdvancedKpis, ExecutiveTrend, GlobalKpis, PeriodPoint, TopPerformer};
pub use operation::Operation;
pub use period::{MonthKey, PeriodKey, PeriodKeyParseError, WeekKey};
pub use types::{PeriodGranularity, TrendDirection};
