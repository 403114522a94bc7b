// ==========================================
// 销售执行人业绩分析 - API 层
// ==========================================
// 职责: 提供当前数据集的加载与分析查询接口,供外部视图调用
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, Dataset, LoadResponse, LATEST_PERIOD, PREVIOUS_PERIOD};
pub use error::{ApiError, ApiResult};
