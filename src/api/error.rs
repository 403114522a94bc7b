// ==========================================
// 销售执行人业绩分析 - API层错误类型
// ==========================================
// 职责: 将导入层/领域层错误转换为调用方可区分的信号
// 约定: "文件可读但无数据" 与 "文件不可读" 必须是两种错误
// ==========================================

use crate::domain::PeriodKeyParseError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 数据集状态错误
    // ==========================================
    /// 尚未加载任何报表
    #[error("尚未加载报表数据")]
    NoDataLoaded,

    /// 文件可读,但未识别到任何业务行
    #[error("报表中未找到可用的业务数据 (共扫描 {rows_scanned} 行)")]
    NoOperationsFound { rows_scanned: usize },

    /// 文件不可读/不可解码
    #[error("报表文件无法读取: {0}")]
    FileUnreadable(String),

    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::NoOperationsFound { rows_scanned } => {
                ApiError::NoOperationsFound { rows_scanned }
            }
            ImportError::FileNotFound(_)
            | ImportError::UnsupportedFormat(_)
            | ImportError::FileReadError(_)
            | ImportError::CsvParseError(_) => ApiError::FileUnreadable(err.to_string()),
            ImportError::ConfigValueError { .. } => ApiError::InvalidInput(err.to_string()),
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
        }
    }
}

// 周期选择值解析失败
impl From<PeriodKeyParseError> for ApiError {
    fn from(err: PeriodKeyParseError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
