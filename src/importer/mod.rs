// ==========================================
// 销售执行人业绩分析 - 导入层
// ==========================================
// 职责: 外部报表导入,生成业务行集合
// 支持: CSV (Latin-1, 无表头, 行长不一)
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod operation_extractor;
pub mod report_importer_impl;
pub mod report_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use file_parser::CsvParser;
pub use operation_extractor::{is_operation_ref, OperationExtractor, RowKind};
pub use report_importer_impl::ReportImporterImpl;

// 重导出 Trait 接口
pub use report_importer_trait::{DataCleaner, FileParser, ImportOutcome, RawRow, ReportImporter};
