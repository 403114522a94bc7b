// ==========================================
// 销售执行人业绩分析 - 报表导入 Trait
// ==========================================
// 职责: 定义报表导入接口（不包含实现）
// 管道: 文件解析 → 行扫描抽取 → 结果校验
// ==========================================

use crate::domain::Operation;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 原始行: 按列顺序的单元格文本
pub type RawRow = Vec<String>;

// ==========================================
// ImportOutcome - 单次导入结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub batch_id: String,               // 批次 ID (数据集代号)
    pub source: Option<String>,         // 来源文件路径
    pub imported_at: DateTime<Utc>,     // 导入时间
    pub rows_scanned: usize,            // 扫描行数
    pub operations: Vec<Operation>,     // 抽取出的业务行 (保持源顺序)
    pub undated_operations: usize,      // 日期缺失的业务行数
    pub elapsed_ms: i64,                // 导入耗时 (毫秒)
}

// ==========================================
// ReportImporter Trait
// ==========================================
// 用途: 报表导入主接口
// 实现者: ReportImporterImpl
#[async_trait]
pub trait ReportImporter: Send + Sync {
    /// 从 CSV 文件导入
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 至少抽取到一条业务行
    /// - Err(NoOperationsFound): 文件可读但没有可用数据
    /// - Err(其他): 文件不可读/不可解码
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportOutcome>;

    /// 从已解析的原始行导入（同步）
    fn import_rows(&self, rows: &[RawRow], source: Option<String>) -> ImportResult<ImportOutcome>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser
// 文件存在性与扩展名检查由 ReportImporter 负责
pub trait FileParser: Send + Sync {
    /// 解析内存中的文件内容为原始行
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗接口（阶段 1）
// 实现者: data_cleaner::DataCleaner
// 红线: 不返回错误,格式不合法一律视为缺失
pub trait DataCleaner: Send + Sync {
    /// 标准化 NULL 值（空字符串/空白 → None）
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 解析带千分位逗号的数值
    ///
    /// # 返回
    /// - Some(f64): 去掉逗号后整串匹配 `-?数字(.数字)?`（首尾空白视为不合法）
    /// - None: 空值或格式不合法
    fn parse_amount(&self, value: Option<&str>) -> Option<f64>;

    /// 解析美式日期（MM/DD/YYYY 或 MM/DD/YY）
    ///
    /// # 返回
    /// - Some(NaiveDate): 解析成功
    /// - None: 空值、格式不合法或月/日越界
    fn parse_us_date(&self, value: Option<&str>) -> Option<NaiveDate>;
}
