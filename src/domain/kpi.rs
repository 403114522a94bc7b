// ==========================================
// 销售执行人业绩分析 - 指标快照领域模型
// ==========================================
// 职责: 全局指标、进阶指标、趋势、排行与图表序列
// 红线: 纯值对象,按需重算,不跨请求缓存
// ==========================================
// 比率约定: 全局指标分母为 0 时取 0;
//           增长类指标上期为 0/负/缺失时取 None
// ==========================================

use crate::domain::aggregate::PeriodAgg;
use crate::domain::period::MonthKey;
use crate::domain::types::TrendDirection;
use serde::{Deserialize, Serialize};

// ==========================================
// GlobalKpis - 全局指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalKpis {
    // ===== 合计 =====
    pub total_income: f64,
    pub total_profit: f64,
    pub total_expenses: f64,
    pub total_ops: usize,
    pub total_clients: usize,       // 跨执行人客户并集大小
    pub executive_count: usize,

    // ===== 比率 =====
    pub avg_profit_margin: f64,     // 利润 / 收入 * 100
    pub avg_deal_size: f64,         // 收入 / 成交笔数
    pub roi: f64,                   // 利润 / 成本 * 100
    pub operational_efficiency: f64, // 利润 / 成本 (原始比值)

    // ===== 集中度 =====
    pub top_client_revenue: f64,    // 单一客户最高收入 (原始业务行口径)
    pub client_concentration_risk: f64, // 最高客户收入 / 总收入 * 100

    // ===== 增长 =====
    pub revenue_growth: Option<f64>, // 最近两个月收入环比
    pub profit_growth: Option<f64>,  // 最近两个月利润环比
}

// ==========================================
// AdvancedKpis - 进阶指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedKpis {
    // ===== 人效 =====
    pub revenue_per_executive: f64,
    pub profit_per_executive: f64,
    pub ops_per_executive: f64,
    pub clients_per_executive: f64,

    // ===== 质量 =====
    pub avg_margin_per_deal: f64,
    pub deal_success_rate: f64,     // ops / (ops + quotes) * 100

    // ===== 增长 =====
    pub month_over_month_growth: Option<f64>,
    pub quarter_over_quarter_growth: Option<f64>,

    // ===== 风险 =====
    pub executive_concentration: f64, // 最高执行人收入 / 总收入 * 100
    pub monthly_volatility: f64,      // 月收入变异系数 * 100
}

// ==========================================
// ExecutiveTrend - 执行人周期对比
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveTrend<K> {
    pub executive: String,
    pub current: Option<PeriodAgg<K>>,
    pub previous: Option<PeriodAgg<K>>,
    pub profit_change: Option<f64>,     // 利润差值 (带符号)
    pub profit_pct_change: Option<f64>, // 利润变化百分比 (以 |上期| 为基数)
    pub ops_change: Option<i64>,        // 成交笔数差值 (带符号)
    pub trend: TrendDirection,
}

// ==========================================
// TopPerformer - 执行人排行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformer {
    pub executive: String,
    pub profit: f64,
    pub profit_margin: f64,
    pub income: f64,
    pub ops: usize,
}

// ==========================================
// PeriodPoint - 月度序列点 (图表数据)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPoint {
    pub month: MonthKey,
    pub income: f64,
    pub profit: f64,
    pub ops: usize,
    pub profit_pct: f64,            // 收入 <= 0 时为 0
}
