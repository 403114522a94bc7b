// ==========================================
// 销售执行人业绩分析 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 格式: 逗号分隔 / 无表头 / 行长不一 / Latin-1 单字节编码
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::report_importer_trait::{FileParser, RawRow};
use csv::ReaderBuilder;
use tracing::debug;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

/// Latin-1 解码: 每个字节即对应的 Unicode 码位，任何字节序列都可解码
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(false) // 报表没有可靠的表头行
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        // 空行由 csv 读取器跳过；仅含分隔符的行保留，行扫描依赖相邻行关系
        let mut rows = Vec::new();
        for result in reader.byte_records() {
            let record = result?;
            rows.push(record.iter().map(decode_latin1).collect::<RawRow>());
        }

        debug!(rows = rows.len(), "CSV 解析完成");
        Ok(rows)
    }
}
