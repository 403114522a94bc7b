// ==========================================
// 销售执行人业绩分析 - 周期键
// ==========================================
// 职责: 从日历日期派生月键 / 周键
// 参照系: NaiveDate (无时区日历日期),与日期解析保持一致
// ==========================================
// 排序: 键按 (年, 月) / (年, 周) 数值排序,不依赖字符串排序
// 展示: 月键 "2024-1" (不补零), 周键 "2024-W3"
// ==========================================

use crate::domain::types::PeriodGranularity;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use thiserror::Error;

/// 周期键解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodKeyParseError {
    #[error("月键格式错误: {0}（期望 YYYY-M）")]
    InvalidMonthKey(String),

    #[error("周键格式错误: {0}（期望 YYYY-W<n>）")]
    InvalidWeekKey(String),
}

// ==========================================
// PeriodKey Trait
// ==========================================
// 用途: 聚合器按周期分桶的统一接口
// 实现者: MonthKey, WeekKey
pub trait PeriodKey:
    Clone + Ord + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static
{
    /// 周期粒度
    const GRANULARITY: PeriodGranularity;

    /// 从日历日期派生周期键
    fn from_date(date: NaiveDate) -> Self;
}

// ==========================================
// MonthKey - 月键
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MonthKey {
    year: i32,  // 年
    month: u32, // 月 (1-12)
}

impl MonthKey {
    /// 创建月键,月份越界返回 None
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// 判断日期是否落在本月
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl PeriodKey for MonthKey {
    const GRANULARITY: PeriodGranularity = PeriodGranularity::Monthly;

    fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = PeriodKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodKeyParseError::InvalidMonthKey(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for MonthKey {
    type Error = PeriodKeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ==========================================
// WeekKey - 周键 (日历日偏移周)
// ==========================================
// 规则: n = ceil(年内第几天 / 7),1 月 1 日为第 1 周第 1 天
// 红线: 不是 ISO-8601 周,周边界一般不对齐周一/周日,不跨年延续
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct WeekKey {
    year: i32, // 年
    week: u32, // 周序号 (1-53)
}

impl WeekKey {
    /// 创建周键,周序号越界返回 None
    pub fn new(year: i32, week: u32) -> Option<Self> {
        if (1..=53).contains(&week) {
            Some(Self { year, week })
        } else {
            None
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }
}

impl PeriodKey for WeekKey {
    const GRANULARITY: PeriodGranularity = PeriodGranularity::Weekly;

    fn from_date(date: NaiveDate) -> Self {
        // ordinal() 从 1 开始
        let day_of_year = date.ordinal();
        Self {
            year: date.year(),
            week: day_of_year.div_ceil(7),
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = PeriodKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodKeyParseError::InvalidWeekKey(s.to_string());
        let (year, week) = s.trim().split_once("-W").ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let week = week.parse::<u32>().map_err(|_| invalid())?;
        WeekKey::new(year, week).ok_or_else(invalid)
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for WeekKey {
    type Error = PeriodKeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
