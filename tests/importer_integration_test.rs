// ==========================================
// ReportImporter 集成测试
// ==========================================
// 测试目标: 验证 CSV 文件 → 业务行的完整导入流程
// ==========================================


use chrono::NaiveDate;
use executive_kpi::config::{ColumnLayout, ReportConfig};
use executive_kpi::importer::{ImportError, OperationExtractor, ReportImporter, ReportImporterImpl};
use executive_kpi::logging;
use test_helpers::{standard_report, write_csv_bytes, OpRow, ReportBuilder};

#[tokio::test]
async fn test_import_standard_report() {
    logging::init_test();

    let temp_file = standard_report().write_csv().unwrap();
    let importer = ReportImporterImpl::default();
    let outcome = importer.import_from_csv(temp_file.path()).await.unwrap();

    // 孤儿行被丢弃: Ana 4 + Luis 3 + Pia 1
    assert_eq!(outcome.operations.len(), 8);
    assert_eq!(outcome.undated_operations, 1);
    assert!(outcome.source.is_some());

    let first = &outcome.operations[0];
    assert_eq!(first.executive, "Ana");
    assert_eq!(first.invoice_ref, "INV001");
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 10));
    assert_eq!(first.client.as_deref(), Some("Acme"));
    assert_eq!(first.income, Some(1000.0));
    assert_eq!(first.expense, Some(600.0));
    assert_eq!(first.profit, Some(400.0));
    assert_eq!(first.commission, Some(40.0));

    // 纯数字编号 + 四位年份
    let numeric = outcome
        .operations
        .iter()
        .find(|op| op.invoice_ref == "4501")
        .unwrap();
    assert_eq!(numeric.date, NaiveDate::from_ymd_opt(2024, 3, 15));

    let executives: Vec<&str> = outcome
        .operations
        .iter()
        .map(|op| op.executive.as_str())
        .collect();
    assert_eq!(
        executives,
        vec!["Ana", "Ana", "Ana", "Ana", "Luis", "Luis", "Luis", "Pia"]
    );
}

#[tokio::test]
async fn test_import_quote_rows() {
    let temp_file = standard_report().write_csv().unwrap();
    let outcome = ReportImporterImpl::default()
        .import_from_csv(temp_file.path())
        .await
        .unwrap();

    let quotes: Vec<&str> = outcome
        .operations
        .iter()
        .filter(|op| op.is_quote())
        .map(|op| op.invoice_ref.as_str())
        .collect();
    assert_eq!(quotes, vec!["INV003", "INV020"]);
}

#[tokio::test]
async fn test_import_latin1_client_names() {
    // "Peñalolén" 以 Latin-1 单字节编码写入
    let mut bytes = b",,Ana\nSHIPMENT\n,,INV001,,,1/15/24".to_vec();
    bytes.extend_from_slice(&[b','; 12]);
    bytes.extend_from_slice(b"Pe\xf1alol\xe9n\n");
    let temp_file = write_csv_bytes(&bytes).unwrap();

    let outcome = ReportImporterImpl::default()
        .import_from_csv(temp_file.path())
        .await
        .unwrap();
    assert_eq!(outcome.operations[0].client.as_deref(), Some("Peñalolén"));
}

#[tokio::test]
async fn test_import_file_without_operations_is_no_data() {
    let report = ReportBuilder::new()
        .title("Reporte vacío")
        .executive("Ana")
        .subtotal(0.0);
    let temp_file = report.write_csv().unwrap();

    let result = ReportImporterImpl::default()
        .import_from_csv(temp_file.path())
        .await;

    match result {
        Err(err) => assert!(err.is_no_data(), "期望无数据错误，实际: {}", err),
        Ok(outcome) => panic!("不应导入成功: {} 行", outcome.operations.len()),
    }
}

#[tokio::test]
async fn test_import_missing_file_is_unreadable() {
    let result = ReportImporterImpl::default()
        .import_from_csv("/definitely/not/here.csv")
        .await;

    match result {
        Err(err) => {
            assert!(!err.is_no_data());
            assert!(matches!(err, ImportError::FileNotFound(_)));
        }
        Ok(_) => panic!("不存在的文件不应导入成功"),
    }
}

#[test]
fn test_import_rows_with_custom_layout() {
    // 紧凑布局: 标记 0 / 日期 1 / 客户 2 / 收入 3 / 成本 4 / 利润 5 / 佣金 6
    let layout = ColumnLayout {
        marker_col: 0,
        date_col: 1,
        client_col: 2,
        income_col: 3,
        expense_col: 4,
        profit_col: 5,
        commission_col: 6,
        banner_keyword: "EMBARQUE".to_string(),
    };
    let config = ReportConfig {
        layout: layout.clone(),
        ..Default::default()
    };
    config.validate().unwrap();

    let rows: Vec<Vec<String>> = vec![
        vec!["Ana".into()],
        vec!["Embarque".into(), "Fecha".into()],
        vec!["INV7".into(), "5/5/24".into(), "Acme".into(), "10".into(), "4".into(), "6".into(), "1".into()],
    ];

    let importer = ReportImporterImpl::with_components(
        std::sync::Arc::new(executive_kpi::CsvParser),
        OperationExtractor::new(layout),
    );
    let outcome = importer.import_rows(&rows, None).unwrap();

    assert_eq!(outcome.operations.len(), 1);
    assert_eq!(outcome.operations[0].profit, Some(6.0));
    assert_eq!(outcome.operations[0].commission, Some(1.0));
}

#[test]
fn test_extraction_is_idempotent() {
    let rows = standard_report()
        .op(OpRow::closed("INV099", "12/31/24", "Zeta", 10.0, 5.0))
        .rows();
    let extractor = OperationExtractor::default();

    assert_eq!(extractor.extract(&rows), extractor.extract(&rows));
}
