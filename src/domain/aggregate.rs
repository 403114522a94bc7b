// ==========================================
// 销售执行人业绩分析 - 聚合结果领域模型
// ==========================================
// 职责: (执行人, 周期) 聚合记录、执行人汇总、分析范围
// 生命周期: 每次请求从当前 Operation 集全量重算,不做增量维护
// ==========================================

use crate::domain::operation::Operation;
use crate::domain::period::{MonthKey, PeriodKeyParseError, WeekKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// PeriodAgg - 周期聚合
// ==========================================
// 红线: 金额合计只统计成交行; ops 与 quotes 互斥
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAgg<K> {
    pub period: K,                  // 周期键
    pub executive: String,          // 执行人

    // ===== 成交合计 =====
    pub income: f64,
    pub expense: f64,
    pub profit: f64,
    pub commission: f64,

    // ===== 计数 =====
    pub ops: usize,                 // 成交笔数
    pub quotes: usize,              // 报价笔数
    pub active_clients: usize,      // 成交客户去重数

    // ===== 派生比率 (分母为 0 时为 None) =====
    pub profit_pct: Option<f64>,    // profit / income * 100
    pub winrate: Option<f64>,       // ops / (ops + quotes) * 100

    #[serde(skip)]
    pub clients: BTreeSet<String>,  // 成交客户集合 (跨桶去重用)
}

/// 月度聚合
pub type MonthlyAgg = PeriodAgg<MonthKey>;

/// 周度聚合
pub type WeeklyAgg = PeriodAgg<WeekKey>;

impl<K> PeriodAgg<K> {
    /// 创建空桶
    pub fn empty(executive: impl Into<String>, period: K) -> Self {
        Self {
            period,
            executive: executive.into(),
            income: 0.0,
            expense: 0.0,
            profit: 0.0,
            commission: 0.0,
            ops: 0,
            quotes: 0,
            active_clients: 0,
            profit_pct: None,
            winrate: None,
            clients: BTreeSet::new(),
        }
    }

    /// 尝试次数（成交 + 报价）
    pub fn attempts(&self) -> usize {
        self.ops + self.quotes
    }
}

// ==========================================
// ExecutiveSummary - 执行人汇总
// ==========================================
// 来源: 周期聚合折叠 (按范围过滤后),或原始业务行折叠
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub ops: usize,
    pub quotes: usize,
    pub income: f64,
    pub expense: f64,
    pub profit: f64,
    pub commission: f64,
    pub clients: BTreeSet<String>,
}

impl ExecutiveSummary {
    /// 利润率（收入 <= 0 时为 0）
    pub fn profit_margin(&self) -> f64 {
        if self.income > 0.0 {
            self.profit / self.income * 100.0
        } else {
            0.0
        }
    }
}

// ==========================================
// AnalyticsScope - 分析范围
// ==========================================
// None 表示"全部"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsScope {
    pub executive: Option<String>,  // 选定执行人
    pub month: Option<MonthKey>,    // 选定月份
}

impl AnalyticsScope {
    /// 全部执行人、全部月份
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_executive(executive: impl Into<String>) -> Self {
        Self {
            executive: Some(executive.into()),
            month: None,
        }
    }

    pub fn for_month(month: MonthKey) -> Self {
        Self {
            executive: None,
            month: Some(month),
        }
    }

    /// 从下拉框选择值构造（"all" 或空串表示不过滤）
    pub fn from_selection(executive: &str, month: &str) -> Result<Self, PeriodKeyParseError> {
        let executive = match executive.trim() {
            "" | "all" => None,
            name => Some(name.to_string()),
        };
        let month = match month.trim() {
            "" | "all" => None,
            key => Some(key.parse::<MonthKey>()?),
        };
        Ok(Self { executive, month })
    }

    /// 月度聚合是否落在范围内
    pub fn matches(&self, agg: &MonthlyAgg) -> bool {
        let executive_ok = self
            .executive
            .as_deref()
            .map_or(true, |name| agg.executive == name);
        let month_ok = self.month.map_or(true, |month| agg.period == month);
        executive_ok && month_ok
    }

    /// 业务行是否落在范围内（无日期行不属于任何月份,一律不计入）
    pub fn contains(&self, op: &Operation) -> bool {
        let Some(month) = op.month_key() else {
            return false;
        };
        let executive_ok = self
            .executive
            .as_deref()
            .map_or(true, |name| op.executive == name);
        executive_ok && self.month.map_or(true, |selected| selected == month)
    }

    /// 是否未做任何过滤
    pub fn is_unfiltered(&self) -> bool {
        self.executive.is_none() && self.month.is_none()
    }
}
