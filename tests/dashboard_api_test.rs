// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试目标: 数据集槽位生命周期 + 范围查询
// ==========================================


use executive_kpi::api::{ApiError, DashboardApi};
use executive_kpi::config::ReportConfig;
use executive_kpi::{logging, AnalyticsScope, MonthKey, TrendDirection};
use test_helpers::{standard_report, write_csv_bytes, OpRow, ReportBuilder};

async fn loaded_api() -> (DashboardApi, tempfile::NamedTempFile) {
    logging::init_test();
    let temp_file = standard_report().write_csv().unwrap();
    let api = DashboardApi::default();
    api.load_csv(temp_file.path()).await.unwrap();
    (api, temp_file)
}

#[tokio::test]
async fn test_load_csv_response() {
    let temp_file = standard_report().write_csv().unwrap();
    let api = DashboardApi::default();

    let response = api.load_csv(temp_file.path()).await.unwrap();

    assert_eq!(response.operations, 8);
    assert_eq!(response.undated_operations, 1);
    assert_eq!(response.executives, 3);
    assert!(!response.generation_id.is_empty());
    assert_eq!(api.executive_options().unwrap(), vec!["Ana", "Luis", "Pia"]);
}

#[tokio::test]
async fn test_failed_loads_keep_current_dataset() {
    let (api, _file) = loaded_api().await;
    let generation = api.generation_id().unwrap();

    // 文件不存在 → 不可读
    let missing = api.load_csv("/no/such/report.csv").await;
    assert!(matches!(missing, Err(ApiError::FileUnreadable(_))));

    // 文件可读但无数据
    let empty = ReportBuilder::new().title("nada").write_csv().unwrap();
    let no_data = api.load_csv(empty.path()).await;
    assert!(matches!(no_data, Err(ApiError::NoOperationsFound { .. })));

    // 扩展名不支持
    let other = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let unsupported = api.load_csv(other.path()).await;
    assert!(matches!(unsupported, Err(ApiError::FileUnreadable(_))));

    assert_eq!(api.generation_id().unwrap(), generation);
    assert_eq!(api.operations().unwrap().len(), 8);
}

#[tokio::test]
async fn test_new_load_replaces_dataset_wholesale() {
    let (api, _file) = loaded_api().await;

    let replacement = ReportBuilder::new()
        .executive("Rosa")
        .op(OpRow::closed("INV500", "6/01/24", "Omega", 10.0, 5.0));
    let temp_file = replacement.write_csv().unwrap();
    api.load_csv(temp_file.path()).await.unwrap();

    assert_eq!(api.executive_options().unwrap(), vec!["Rosa"]);
    let months: Vec<String> = api
        .available_months()
        .unwrap()
        .iter()
        .map(|m| m.to_string())
        .collect();
    assert_eq!(months, vec!["2024-6"]);
}

#[tokio::test]
async fn test_scoped_queries() {
    let (api, _file) = loaded_api().await;

    let all = api.executive_summaries(&AnalyticsScope::all()).unwrap();
    assert_eq!(all["Ana"].income, 4500.0);
    assert_eq!(all["Ana"].commission, 40.0);

    let march = AnalyticsScope::from_selection("all", "2024-3").unwrap();
    let global = api.global_kpis(&march).unwrap();
    assert_eq!(global.total_income, 2800.0);
    assert_eq!(global.executive_count, 3);
    // 只有一个月 → 无环比
    assert_eq!(global.revenue_growth, None);

    let ana = AnalyticsScope::for_executive("Ana");
    let series = api.chart_series(&ana).unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series[2].month, MonthKey::new(2024, 3).unwrap());
    assert_eq!(series[2].profit_pct, 40.0);

    let top = api.top_performers(&AnalyticsScope::all()).unwrap();
    assert_eq!(top[0].executive, "Ana");
    assert_eq!(top.last().map(|p| p.executive.as_str()), Some("Pia"));

    let advanced = api.advanced_kpis(&ana).unwrap();
    assert_eq!(advanced.executive_concentration, 100.0);
}

#[test]
fn test_client_concentration_follows_scope() {
    let rows = ReportBuilder::new()
        .executive("Ana")
        .op(OpRow::closed("INV001", "1/15/24", "Acme", 900.0, 500.0))
        .op(OpRow::closed("INV002", "2/15/24", "Acme", 100.0, 50.0))
        .rows();
    let api = DashboardApi::default();
    api.load_rows(&rows, None).unwrap();

    let february = AnalyticsScope::for_month(MonthKey::new(2024, 2).unwrap());
    let global = api.global_kpis(&february).unwrap();
    assert_eq!(global.total_income, 100.0);
    assert_eq!(global.top_client_revenue, 100.0);
    assert_eq!(global.client_concentration_risk, 100.0);

    let all = api.global_kpis(&AnalyticsScope::all()).unwrap();
    assert_eq!(all.top_client_revenue, 1000.0);
    assert_eq!(all.client_concentration_risk, 100.0);
}

#[test]
fn test_undated_income_excluded_from_client_concentration() {
    let rows = ReportBuilder::new()
        .executive("Ana")
        .op(OpRow::closed("INV001", "bad", "Acme", 900.0, 500.0))
        .op(OpRow::closed("INV002", "2/15/24", "Acme", 100.0, 50.0))
        .rows();
    let api = DashboardApi::default();
    api.load_rows(&rows, None).unwrap();

    let global = api.global_kpis(&AnalyticsScope::all()).unwrap();
    assert_eq!(global.total_income, 100.0);
    assert_eq!(global.top_client_revenue, 100.0);
    assert_eq!(global.client_concentration_risk, 100.0);
}

#[tokio::test]
async fn test_raw_totals_include_quotes_and_undated() {
    let (api, _file) = loaded_api().await;
    let raw = api.raw_totals().unwrap();

    assert_eq!(raw["Ana"].ops, 4);
    assert_eq!(raw["Luis"].ops, 3);
    assert_eq!(raw["Luis"].income, 1600.0);
    assert_eq!(raw["Pia"].ops, 1);
}

#[tokio::test]
async fn test_trends_and_comparisons() {
    let (api, _file) = loaded_api().await;

    let monthly = api.monthly_trends().unwrap();
    let ana = monthly.iter().find(|t| t.executive == "Ana").unwrap();
    assert_eq!(ana.trend, TrendDirection::Up);
    assert_eq!(ana.profit_change, Some(300.0));
    assert_eq!(ana.ops_change, Some(0));

    // 3 月 vs 1 月: Luis 1 月无数据 → New;Pia 仅报价
    let compared = api.compare_months("latest", "2024-1").unwrap();
    let names: Vec<&str> = compared.iter().map(|t| t.executive.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Luis", "Pia"]);
    assert_eq!(compared[0].profit_pct_change, Some(100.0));
    assert_eq!(compared[1].trend, TrendDirection::New);

    let weeks = api.available_weeks().unwrap();
    assert!(!weeks.is_empty());
    let weekly = api.compare_weeks("latest", "previous").unwrap();
    assert!(!weekly.is_empty());

    assert!(matches!(api.compare_weeks("2024-9", "previous"), Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_executive_operations_drill_down() {
    let (api, _file) = loaded_api().await;

    let luis = api.executive_operations("Luis", "all").unwrap();
    let refs: Vec<&str> = luis.iter().map(|o| o.invoice_ref.as_str()).collect();
    assert_eq!(refs, vec!["INV011", "INV010", "INV012"]);

    let ana_feb = api.executive_operations("Ana", "2024-2").unwrap();
    assert_eq!(ana_feb.len(), 2);

    assert!(api.executive_operations("Nadie", "all").unwrap().is_empty());
}

#[tokio::test]
async fn test_custom_config_threshold() {
    let config = ReportConfig::from_json_str(r#"{ "trend_stable_threshold_pct": 70.0 }"#).unwrap();
    let api = DashboardApi::new(&config);
    let temp_file = standard_report().write_csv().unwrap();
    api.load_csv(temp_file.path()).await.unwrap();

    // Ana +60% 低于 70% 阈值 → 持平
    let trends = api.monthly_trends().unwrap();
    let ana = trends.iter().find(|t| t.executive == "Ana").unwrap();
    assert_eq!(ana.trend, TrendDirection::Stable);
}

#[test]
fn test_clear_then_query() {
    let api = DashboardApi::default();
    let rows = standard_report().rows();
    api.load_rows(&rows, Some("memory".to_string())).unwrap();
    assert_eq!(api.dataset().unwrap().source.as_deref(), Some("memory"));

    api.clear().unwrap();
    assert!(matches!(api.monthly(), Err(ApiError::NoDataLoaded)));
    assert!(matches!(api.executive_options(), Err(ApiError::NoDataLoaded)));
}

#[tokio::test]
async fn test_undecodable_bytes_still_load() {
    // Latin-1 下任意字节都可解码
    let bytes = b",,Ana\n\xff\xfeSHIPMENT\n,,INV1,,,1/1/24\n".to_vec();
    let temp_file = write_csv_bytes(&bytes).unwrap();
    let api = DashboardApi::default();

    let response = api.load_csv(temp_file.path()).await.unwrap();
    assert_eq!(response.operations, 1);
}
