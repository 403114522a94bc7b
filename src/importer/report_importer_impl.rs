// ==========================================
// 销售执行人业绩分析 - 报表导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到业务行集合
// 流程: 解析 → 列宽检查 → 行扫描抽取 → 空结果校验
// ==========================================

use crate::config::ReportConfig;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::operation_extractor::OperationExtractor;
use crate::importer::report_importer_trait::{
    FileParser, ImportOutcome, RawRow, ReportImporter,
};
use crate::importer::file_parser::CsvParser;
use crate::perf::PerfGuard;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ReportImporterImpl - 报表导入器实现
// ==========================================
pub struct ReportImporterImpl {
    // 导入组件
    file_parser: Arc<dyn FileParser>,
    extractor: Arc<OperationExtractor>,
}

impl Default for ReportImporterImpl {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl ReportImporterImpl {
    /// 按配置创建（CSV 解析器 + 默认清洗器）
    pub fn new(config: &ReportConfig) -> Self {
        Self::with_components(
            Arc::new(CsvParser),
            OperationExtractor::new(config.layout.clone()),
        )
    }

    /// 注入自定义组件
    pub fn with_components(file_parser: Arc<dyn FileParser>, extractor: OperationExtractor) -> Self {
        Self {
            file_parser,
            extractor: Arc::new(extractor),
        }
    }

    /// 检查源数据列宽是否覆盖布局所需列（仅告警，不阻断）
    fn check_source_width(&self, rows: &[RawRow]) {
        let required = self.extractor.layout().required_width();
        let widest = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        if !rows.is_empty() && widest < required {
            warn!(
                widest,
                required, "源文件列数不足，金额/客户列将全部视为缺失"
            );
        }
    }
}

#[async_trait::async_trait]
impl ReportImporter for ReportImporterImpl {
    /// 从 CSV 文件导入
    ///
    /// 文件读取走 tokio，解析与抽取在阻塞线程池中完成
    #[instrument(skip(self, file_path))]
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportOutcome> {
        let path = file_path.as_ref().to_path_buf();
        let source = path.display().to_string();
        info!(file_path = %source, "开始导入报表");

        // === 步骤 1: 读取文件 ===
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            error!(file_path = %source, "文件不存在");
            return Err(ImportError::FileNotFound(source));
        }
        if let Some(ext) = path.extension().filter(|ext| !ext.eq_ignore_ascii_case("csv")) {
            error!(file_path = %source, "文件格式不支持");
            return Err(ImportError::UnsupportedFormat(ext.to_string_lossy().to_string()));
        }
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            error!(error = %e, "文件读取失败");
            ImportError::from(e)
        })?;
        debug!(bytes = bytes.len(), "文件读取完成");

        // === 步骤 2: 解析为原始行 ===
        let parser = Arc::clone(&self.file_parser);
        let rows = tokio::task::spawn_blocking(move || parser.parse_bytes(&bytes))
            .await
            .map_err(|e| ImportError::InternalError(format!("解析任务失败: {}", e)))??;

        // === 步骤 3: 抽取 ===
        self.import_rows(&rows, Some(source))
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    fn import_rows(&self, rows: &[RawRow], source: Option<String>) -> ImportResult<ImportOutcome> {
        let _perf = PerfGuard::new("importer.import_rows");
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();

        self.check_source_width(rows);

        let operations = self.extractor.extract(rows);
        if operations.is_empty() {
            warn!(batch_id = %batch_id, rows = rows.len(), "未识别到任何业务行");
            return Err(ImportError::NoOperationsFound {
                rows_scanned: rows.len(),
            });
        }

        let undated_operations = operations.iter().filter(|op| op.date.is_none()).count();
        if undated_operations > 0 {
            warn!(undated_operations, "部分业务行日期缺失，将不参与周期聚合");
        }

        info!(
            batch_id = %batch_id,
            operations = operations.len(),
            undated_operations,
            "报表导入完成"
        );

        Ok(ImportOutcome {
            batch_id,
            source,
            imported_at: Utc::now(),
            rows_scanned: rows.len(),
            operations,
            undated_operations,
            elapsed_ms: start_time.elapsed().as_millis() as i64,
        })
    }
}
