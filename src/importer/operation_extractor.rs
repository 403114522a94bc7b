// ==========================================
// 销售执行人业绩分析 - 业务行抽取器
// ==========================================
// 职责: 顺序扫描原始行,识别执行人标题与业务行,生成 Operation
// 状态: 仅"当前执行人"一项,作为左折叠的累加器传递,不保留到下次调用
// ==========================================
// 行分类 (按固定列位置 + 固定模式,互斥):
// 1) 执行人标题: 标记列非空、非单据号,且下一行含分区横幅关键字
// 2) 业务行: 标记列为单据号 (INV+数字 或 3 位以上纯数字)
// 3) 其他: 跳过
// ==========================================

use crate::config::ColumnLayout;
use crate::domain::Operation;
use crate::importer::data_cleaner::DataCleaner as DefaultCleaner;
use crate::importer::report_importer_trait::DataCleaner;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, instrument, warn};

lazy_static! {
    static ref INVOICE_REF_PATTERN: Regex = Regex::new(r"^INV\d+").unwrap();
    static ref NUMERIC_ID_PATTERN: Regex = Regex::new(r"^\d{3,}$").unwrap();
}

/// 单元格取值，越界视为空串（容忍行长不一）
fn cell<S: AsRef<str>>(row: &[S], idx: usize) -> &str {
    row.get(idx).map(|c| c.as_ref()).unwrap_or("")
}

/// 是否为单据号（发票号或纯数字编号）
pub fn is_operation_ref(value: &str) -> bool {
    INVOICE_REF_PATTERN.is_match(value) || NUMERIC_ID_PATTERN.is_match(value)
}

/// 行分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// 执行人标题（新的当前执行人）
    ExecutiveHeader(String),
    /// 业务行（触发识别的单据号）
    Operation(String),
    /// 无关行
    Skip,
}

/// 扫描累加器
#[derive(Debug, Default)]
struct ScanState {
    current_executive: String,
    operations: Vec<Operation>,
    headers: usize,
    orphans: usize,
}

// ==========================================
// OperationExtractor - 业务行抽取器
// ==========================================
pub struct OperationExtractor {
    layout: ColumnLayout,
    cleaner: Box<dyn DataCleaner>,
    banner_upper: String,
}

impl Default for OperationExtractor {
    fn default() -> Self {
        Self::new(ColumnLayout::default())
    }
}

impl OperationExtractor {
    /// 使用默认清洗器创建
    pub fn new(layout: ColumnLayout) -> Self {
        Self::with_cleaner(layout, Box::new(DefaultCleaner))
    }

    /// 注入自定义清洗器
    pub fn with_cleaner(layout: ColumnLayout, cleaner: Box<dyn DataCleaner>) -> Self {
        let banner_upper = layout.banner_keyword.trim().to_uppercase();
        if banner_upper.is_empty() {
            warn!("分区横幅关键字为空，将不会识别任何执行人标题");
        }
        Self {
            layout,
            cleaner,
            banner_upper,
        }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// 行内是否有单元格包含分区横幅关键字（大小写不敏感;空关键字不匹配任何行）
    fn has_banner<S: AsRef<str>>(&self, row: &[S]) -> bool {
        !self.banner_upper.is_empty()
            && row
                .iter()
                .any(|c| c.as_ref().to_uppercase().contains(&self.banner_upper))
    }

    /// 对单行分类（需要下一行判断执行人标题）
    pub fn classify<S: AsRef<str>>(&self, row: &[S], next_row: Option<&[S]>) -> RowKind {
        let marker = cell(row, self.layout.marker_col).trim();
        if marker.is_empty() {
            return RowKind::Skip;
        }

        if is_operation_ref(marker) {
            return RowKind::Operation(marker.to_string());
        }

        match next_row {
            Some(next) if self.has_banner(next) => RowKind::ExecutiveHeader(marker.to_string()),
            _ => RowKind::Skip,
        }
    }

    /// 由业务行构造 Operation
    fn build_operation<S: AsRef<str>>(
        &self,
        row: &[S],
        executive: &str,
        invoice_ref: String,
    ) -> Operation {
        let layout = &self.layout;
        let amount = |col: usize| self.cleaner.parse_amount(Some(cell(row, col)));

        Operation {
            executive: executive.to_string(),
            date: self.cleaner.parse_us_date(Some(cell(row, layout.date_col))),
            client: self.cleaner.normalize_null(Some(cell(row, layout.client_col))),
            invoice_ref,
            income: amount(layout.income_col),
            expense: amount(layout.expense_col),
            profit: amount(layout.profit_col),
            commission: amount(layout.commission_col),
        }
    }

    /// 抽取业务行
    ///
    /// # 规则
    /// - 输出顺序与输入行顺序一致
    /// - 出现任何执行人标题之前的业务行直接丢弃
    /// - 纯函数: 同一输入多次调用结果相同
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn extract<R, S>(&self, rows: &[R]) -> Vec<Operation>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let state = rows
            .iter()
            .enumerate()
            .fold(ScanState::default(), |mut state, (idx, row)| {
                let next_row = rows.get(idx + 1).map(|r| r.as_ref());
                match self.classify(row.as_ref(), next_row) {
                    RowKind::ExecutiveHeader(name) => {
                        debug!(row = idx + 1, executive = %name, "识别到执行人标题");
                        state.current_executive = name;
                        state.headers += 1;
                    }
                    RowKind::Operation(invoice_ref) if !state.current_executive.is_empty() => {
                        let op =
                            self.build_operation(row.as_ref(), &state.current_executive, invoice_ref);
                        state.operations.push(op);
                    }
                    RowKind::Operation(invoice_ref) => {
                        debug!(row = idx + 1, invoice_ref = %invoice_ref, "执行人未确定，丢弃业务行");
                        state.orphans += 1;
                    }
                    RowKind::Skip => {}
                }
                state
            });

        info!(
            operations = state.operations.len(),
            headers = state.headers,
            orphans = state.orphans,
            "业务行抽取完成"
        );
        state.operations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// 构造一行: 在指定列填值，其余为空
    fn row(cells: &[(usize, &str)]) -> Vec<String> {
        let width = cells.iter().map(|(c, _)| *c).max().unwrap_or(0) + 1;
        let mut r = vec![String::new(); width];
        for (c, v) in cells {
            r[*c] = v.to_string();
        }
        r
    }

    fn header(name: &str) -> Vec<String> {
        row(&[(2, name)])
    }

    fn banner() -> Vec<String> {
        row(&[(0, "Shipment"), (3, "Date")])
    }

    #[test]
    fn test_classify_patterns() {
        let extractor = OperationExtractor::default();
        let next = banner();

        assert_eq!(
            extractor.classify(&header("Ana"), Some(next.as_slice())),
            RowKind::ExecutiveHeader("Ana".to_string())
        );
        assert_eq!(extractor.classify(&header("Ana"), None), RowKind::Skip);
        assert_eq!(
            extractor.classify(&header("INV001"), Some(next.as_slice())),
            RowKind::Operation("INV001".to_string())
        );
        assert_eq!(
            extractor.classify(&header(" 12345 "), None),
            RowKind::Operation("12345".to_string())
        );
        // 两位数字既不是单据号，也没有横幅 → 跳过
        assert_eq!(extractor.classify(&header("12"), None), RowKind::Skip);
        assert_eq!(extractor.classify(&row(&[(0, "x")]), Some(next.as_slice())), RowKind::Skip);
    }

    #[test]
    fn test_extract_basic_operation() {
        let rows = vec![
            header("Ana"),
            banner(),
            row(&[
                (2, "INV001"),
                (5, "1/15/24"),
                (17, " Acme "),
                (24, "1,000"),
                (27, "400"),
                (28, "600"),
                (33, "60"),
            ]),
        ];

        let ops = OperationExtractor::default().extract(&rows);

        assert_eq!(ops.len(), 1);
        let op = &ops[0];
        assert_eq!(op.executive, "Ana");
        assert_eq!(op.date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(op.client.as_deref(), Some("Acme"));
        assert_eq!(op.invoice_ref, "INV001");
        assert_eq!(op.income, Some(1000.0));
        assert_eq!(op.expense, Some(400.0));
        assert_eq!(op.profit, Some(600.0));
        assert_eq!(op.commission, Some(60.0));
    }

    #[test]
    fn test_extract_drops_orphan_rows() {
        let rows = vec![
            row(&[(2, "INV000"), (24, "10")]),
            header("Ana"),
            banner(),
            row(&[(2, "INV001"), (24, "20")]),
        ];

        let ops = OperationExtractor::default().extract(&rows);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].invoice_ref, "INV001");
    }

    #[test]
    fn test_extract_switches_executive() {
        let rows = vec![
            header("Ana"),
            banner(),
            row(&[(2, "INV001")]),
            header("Luis"),
            banner(),
            row(&[(2, "4500")]),
            row(&[(2, "INV003")]),
        ];

        let ops = OperationExtractor::default().extract(&rows);
        let owners: Vec<(&str, &str)> = ops
            .iter()
            .map(|o| (o.executive.as_str(), o.invoice_ref.as_str()))
            .collect();
        assert_eq!(
            owners,
            vec![("Ana", "INV001"), ("Luis", "4500"), ("Luis", "INV003")]
        );
    }

    #[test]
    fn test_extract_tolerates_short_rows() {
        // 业务行只有 3 列: 金额与日期全部缺失 → 报价
        let rows = vec![header("Ana"), banner(), row(&[(2, "INV002")])];

        let ops = OperationExtractor::default().extract(&rows);
        assert_eq!(ops.len(), 1);
        assert!(ops[0].is_quote());
        assert_eq!(ops[0].date, None);
        assert_eq!(ops[0].client, None);
    }

    #[test]
    fn test_extract_is_restartable() {
        let rows = vec![
            header("Ana"),
            banner(),
            row(&[(2, "INV001"), (24, "5")]),
        ];
        let extractor = OperationExtractor::default();

        let first = extractor.extract(&rows);
        let second = extractor.extract(&rows);
        assert_eq!(first, second);

        // 单独扫描业务行: 上一轮的执行人不会残留
        let tail = extractor.extract(&rows[2..]);
        assert!(tail.is_empty());
    }

    #[test]
    fn test_extract_custom_banner_keyword() {
        let layout = ColumnLayout {
            banner_keyword: "embarque".to_string(),
            ..Default::default()
        };
        let rows = vec![
            header("Ana"),
            row(&[(1, "EMBARQUE N°")]),
            row(&[(2, "INV001")]),
        ];

        let ops = OperationExtractor::new(layout).extract(&rows);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].executive, "Ana");
    }

    #[test]
    fn test_extract_accepts_str_rows() {
        let rows: Vec<Vec<&str>> = vec![vec!["", "", "Ana"], vec!["SHIPMENT"], vec!["", "", "INV9"]];
        let ops = OperationExtractor::default().extract(&rows);
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn test_empty_banner_keyword_matches_nothing() {
        let layout = ColumnLayout {
            banner_keyword: "  ".to_string(),
            ..Default::default()
        };
        let rows = vec![
            header("Ana"),
            row(&[(0, "Shipment"), (2, "Total")]),
            row(&[(2, "INV001"), (24, "10")]),
        ];

        let extractor = OperationExtractor::new(layout);
        assert_eq!(extractor.classify(&rows[0], Some(rows[1].as_slice())), RowKind::Skip);
        assert!(extractor.extract(&rows).is_empty());
    }

    #[test]
    fn test_padded_amount_cells_make_a_quote() {
        let rows = vec![
            header("Ana"),
            banner(),
            row(&[(2, "INV001"), (5, "1/15/24"), (24, " 100 "), (27, " 40"), (28, "60 ")]),
        ];

        let ops = OperationExtractor::default().extract(&rows);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].income, None);
        assert!(ops[0].is_quote());
    }
}
