// ==========================================
// 销售执行人业绩分析 - 核心库
// ==========================================
// 流程: 原始行 → Operation → 周期聚合 → 复合指标
// 系统定位: 纯库（无持久化、无界面、无命令行）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 报表解析与业务行抽取
pub mod importer;

// 引擎层 - 周期聚合与指标计算
pub mod engine;

// 配置层 - 列布局与分析参数
pub mod config;

// API 层 - 当前数据集与查询接口
pub mod api;

// 日志系统
pub mod logging;

// 耗时统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AdvancedKpis, AnalyticsScope, ExecutiveSummary, ExecutiveTrend, GlobalKpis, MonthKey,
    MonthlyAgg, Operation, PeriodAgg, PeriodKey, PeriodPoint, TopPerformer, TrendDirection,
    WeekKey, WeeklyAgg,
};

// 导入
pub use importer::{
    CsvParser, ImportError, ImportResult, OperationExtractor, ReportImporter, ReportImporterImpl,
};

// 引擎
pub use engine::{KpiEngine, PeriodAggregator, SummaryEngine, TrendEngine};

// 配置
pub use config::{ColumnLayout, ReportConfig};

// API
pub use api::{ApiError, ApiResult, DashboardApi, LoadResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "销售执行人业绩分析";
