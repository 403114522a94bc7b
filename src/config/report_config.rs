// ==========================================
// 销售执行人业绩分析 - 报表配置
// ==========================================
// 职责: 列布局 + 分析参数,支持 JSON 覆写
// 默认值: 与上游导出格式的固定约定一致
// ==========================================

use crate::config::column_layout::ColumnLayout;
use crate::config::config_keys;
use crate::importer::error::{ImportError, ImportResult};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 报表配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 列布局
    pub layout: ColumnLayout,

    /// 趋势"持平"阈值（百分比，|变化| 小于该值视为持平）
    pub trend_stable_threshold_pct: f64,

    /// 季度环比窗口（月数），需至少 2 倍窗口的月度序列才计算
    pub quarter_window_months: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            layout: ColumnLayout::default(),
            trend_stable_threshold_pct: 5.0,
            quarter_window_months: 3,
        }
    }
}

impl ReportConfig {
    /// 从 JSON 字符串加载（缺省字段取默认值）并校验
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let config: ReportConfig =
            serde_json::from_str(raw).context("报表配置 JSON 解析失败")?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载并校验
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("读取报表配置失败: {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("报表配置无效: {}", path.display()))
    }

    /// 校验配置
    pub fn validate(&self) -> ImportResult<()> {
        self.layout.validate()?;

        if !self.trend_stable_threshold_pct.is_finite() || self.trend_stable_threshold_pct < 0.0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::TREND_STABLE_THRESHOLD_PCT.to_string(),
                value: self.trend_stable_threshold_pct.to_string(),
                message: "阈值必须为非负有限数".to_string(),
            });
        }

        if self.quarter_window_months == 0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::QUARTER_WINDOW_MONTHS.to_string(),
                value: "0".to_string(),
                message: "窗口至少为 1 个月".to_string(),
            });
        }

        Ok(())
    }
}
