// ==========================================
// 销售执行人业绩分析 - 数据清洗器实现
// ==========================================
// 职责: NULL 标准化 / 千分位数值解析 / 美式日期解析
// 数值与日期按单元格原文整串匹配,不做 TRIM
// 红线: 不抛错,不合法即缺失
// ==========================================

use crate::importer::report_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::{Days, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 去掉千分位后整串匹配
    static ref AMOUNT_PATTERN: Regex = Regex::new(r"^-?\d+(?:\.\d+)?$").unwrap();
    // 月/日 1-2 位,年 2 或 4 位
    static ref US_DATE_PATTERN: Regex =
        Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").unwrap();
}

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_amount(&self, value: Option<&str>) -> Option<f64> {
        let stripped = value?.replace(',', "");
        if !AMOUNT_PATTERN.is_match(&stripped) {
            return None;
        }
        stripped.parse::<f64>().ok()
    }

    fn parse_us_date(&self, value: Option<&str>) -> Option<NaiveDate> {
        let caps = US_DATE_PATTERN.captures(value?)?;

        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year_raw = &caps[3];
        let year: i32 = match year_raw.len() {
            // 两位年份一律按 20YY,不做 19xx 窗口
            2 => 2000 + year_raw.parse::<i32>().ok()?,
            _ => year_raw.parse().ok()?,
        };

        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }

        // 只做区间校验: 超出当月天数的日期顺延到下月 (如 4/31 → 5/1)
        NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(day - 1)))
    }
}
