// ==========================================
// 销售执行人业绩分析 - 业务行领域模型
// ==========================================
// 职责: 描述从报表中抽取出的单条成交/报价记录
// 红线: 金额字段 None 表示"源单元格非数值",不等同于 0
// ==========================================

use crate::domain::period::{MonthKey, PeriodKey, WeekKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Operation - 业务行
// ==========================================
// 生命周期: 抽取时创建一次,此后不可变;每次加载新文件整体替换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub executive: String,          // 所属执行人 (扫描到该行时的上下文)
    pub date: Option<NaiveDate>,    // 业务日期 (无法解析时为 None)
    pub client: Option<String>,     // 客户
    pub invoice_ref: String,        // 触发识别的单据号
    pub income: Option<f64>,        // 收入
    pub expense: Option<f64>,       // 成本
    pub profit: Option<f64>,        // 利润
    pub commission: Option<f64>,    // 佣金
}

impl Operation {
    /// 报价行: 收入/成本/利润三者皆缺失（未成交的尝试）
    pub fn is_quote(&self) -> bool {
        self.income.is_none() && self.expense.is_none() && self.profit.is_none()
    }

    /// 成交行: 三者至少一个存在
    pub fn is_closed(&self) -> bool {
        !self.is_quote()
    }

    /// 所属月键（无日期时为 None）
    pub fn month_key(&self) -> Option<MonthKey> {
        self.date.map(MonthKey::from_date)
    }

    /// 所属周键（无日期时为 None）
    pub fn week_key(&self) -> Option<WeekKey> {
        self.date.map(WeekKey::from_date)
    }

    /// 单笔利润率: 收入与利润均为非零数值时才有定义
    pub fn margin_pct(&self) -> Option<f64> {
        match (self.income, self.profit) {
            (Some(income), Some(profit)) if income != 0.0 && profit != 0.0 => {
                Some(profit / income * 100.0)
            }
            _ => None,
        }
    }
}
