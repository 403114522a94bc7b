use crate::config::config_keys;
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};

/// 报表列布局（与上游导出格式的固定约定，0 起始列号）
///
/// 报表没有可靠的表头行，因此按固定列位置取值，不在运行时探测
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    /// 执行人标题 / 单据号所在列
    pub marker_col: usize,

    /// 业务日期列（MM/DD/YY[YY]）
    pub date_col: usize,

    /// 客户列
    pub client_col: usize,

    /// 收入列
    pub income_col: usize,

    /// 成本列
    pub expense_col: usize,

    /// 利润列
    pub profit_col: usize,

    /// 佣金列
    pub commission_col: usize,

    /// 分区横幅关键字（大小写不敏感的子串匹配，检查候选标题的下一行）
    pub banner_keyword: String,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            marker_col: 2,
            date_col: 5,
            client_col: 17,
            income_col: 24,
            expense_col: 27,
            profit_col: 28,
            commission_col: 33,
            banner_keyword: "SHIPMENT".to_string(),
        }
    }
}

impl ColumnLayout {
    /// 所有业务列（标记列除外）
    fn data_columns(&self) -> [(&'static str, usize); 6] {
        [
            (config_keys::DATE_COL, self.date_col),
            (config_keys::CLIENT_COL, self.client_col),
            (config_keys::INCOME_COL, self.income_col),
            (config_keys::EXPENSE_COL, self.expense_col),
            (config_keys::PROFIT_COL, self.profit_col),
            (config_keys::COMMISSION_COL, self.commission_col),
        ]
    }

    /// 完整读取一行所需的最小列数
    pub fn required_width(&self) -> usize {
        self.data_columns()
            .iter()
            .map(|(_, col)| *col)
            .chain(std::iter::once(self.marker_col))
            .max()
            .unwrap_or(0)
            + 1
    }

    /// 校验布局
    ///
    /// # 规则
    /// - banner_keyword 非空
    /// - 各列互不重叠
    pub fn validate(&self) -> ImportResult<()> {
        if self.banner_keyword.trim().is_empty() {
            return Err(ImportError::ConfigValueError {
                key: config_keys::BANNER_KEYWORD.to_string(),
                value: self.banner_keyword.clone(),
                message: "分区横幅关键字不能为空".to_string(),
            });
        }

        let mut seen: Vec<(&'static str, usize)> = vec![(config_keys::MARKER_COL, self.marker_col)];
        for (key, col) in self.data_columns() {
            if let Some((other, _)) = seen.iter().find(|(_, c)| *c == col) {
                return Err(ImportError::ConfigValueError {
                    key: key.to_string(),
                    value: col.to_string(),
                    message: format!("与 {} 使用了同一列", other),
                });
            }
            seen.push((key, col));
        }

        Ok(())
    }
}
