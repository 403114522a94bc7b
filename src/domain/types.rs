// ==========================================
// 销售执行人业绩分析 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 趋势方向 (Trend Direction)
// ==========================================
// 序列化格式: lowercase (与展示层约定一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,     // 利润环比上升 (>= 5%)
    Down,   // 利润环比下降 (<= -5%)
    Stable, // 变化幅度 < 5%
    New,    // 无上期或上期利润为 0,百分比无定义
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
            TrendDirection::Stable => write!(f, "stable"),
            TrendDirection::New => write!(f, "new"),
        }
    }
}

// ==========================================
// 周期粒度 (Period Granularity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodGranularity {
    Monthly, // 自然月
    Weekly,  // 日历日偏移周 (非 ISO 周)
}

impl fmt::Display for PeriodGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodGranularity::Monthly => write!(f, "MONTHLY"),
            PeriodGranularity::Weekly => write!(f, "WEEKLY"),
        }
    }
}
