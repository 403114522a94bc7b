// ==========================================
// 销售执行人业绩分析 - 配置层
// ==========================================
// 职责: 报表列布局与分析参数
// 来源: 默认值 / JSON 覆写
// ==========================================

pub mod column_layout;
pub mod report_config;

// 重导出核心配置
pub use column_layout::ColumnLayout;
pub use report_config::ReportConfig;

// ==========================================
// 配置键 (用于校验错误定位)
// ==========================================
pub mod config_keys {
    // 列布局
    pub const MARKER_COL: &str = "marker_col";
    pub const DATE_COL: &str = "date_col";
    pub const CLIENT_COL: &str = "client_col";
    pub const INCOME_COL: &str = "income_col";
    pub const EXPENSE_COL: &str = "expense_col";
    pub const PROFIT_COL: &str = "profit_col";
    pub const COMMISSION_COL: &str = "commission_col";
    pub const BANNER_KEYWORD: &str = "banner_keyword";

    // 分析参数
    pub const TREND_STABLE_THRESHOLD_PCT: &str = "trend_stable_threshold_pct";
    pub const QUARTER_WINDOW_MONTHS: &str = "quarter_window_months";
}
