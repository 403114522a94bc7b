// ==========================================
// 销售执行人业绩分析 - 驾驶舱 API
// ==========================================
// 职责: 持有"当前数据集"槽位,对外提供加载与全部分析查询
// 状态: 同一时刻只存在一个数据集代 (generation),加载成功后整体替换
// 红线: 加载失败不影响已有数据集;查询结果每次全量重算,不缓存
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ReportConfig;
use crate::domain::{
    AdvancedKpis, AnalyticsScope, ExecutiveTrend, GlobalKpis, MonthKey, MonthlyAgg, Operation,
    PeriodKey, PeriodPoint, TopPerformer, WeekKey, WeeklyAgg,
};
use crate::engine::{KpiEngine, PeriodAggregator, SummaryEngine, SummaryMap, TrendEngine};
use crate::importer::{ImportOutcome, RawRow, ReportImporter, ReportImporterImpl};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{info, instrument, warn};

/// 周期选择值: 最新周期
pub const LATEST_PERIOD: &str = "latest";

/// 周期选择值: 本期的前一个周期
pub const PREVIOUS_PERIOD: &str = "previous";

// ==========================================
// Dataset - 当前数据集
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub generation_id: String,      // 数据集代号 (每次加载新生成)
    pub source: Option<String>,     // 来源
    pub loaded_at: DateTime<Utc>,   // 加载时间
    pub rows_scanned: usize,
    pub undated_operations: usize,
    pub operations: Vec<Operation>,
}

impl From<ImportOutcome> for Dataset {
    fn from(outcome: ImportOutcome) -> Self {
        Self {
            generation_id: outcome.batch_id,
            source: outcome.source,
            loaded_at: outcome.imported_at,
            rows_scanned: outcome.rows_scanned,
            undated_operations: outcome.undated_operations,
            operations: outcome.operations,
        }
    }
}

/// 加载响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResponse {
    /// 数据集代号
    pub generation_id: String,
    /// 来源
    pub source: Option<String>,
    /// 扫描行数
    pub rows_scanned: usize,
    /// 业务行数
    pub operations: usize,
    /// 日期缺失的业务行数
    pub undated_operations: usize,
    /// 执行人数
    pub executives: usize,
    /// 加载耗时（毫秒）
    pub elapsed_ms: i64,
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    importer: ReportImporterImpl,
    aggregator: PeriodAggregator,
    summary: SummaryEngine,
    kpi: KpiEngine,
    trend: TrendEngine,
    current: RwLock<Option<Arc<Dataset>>>,
}

impl Default for DashboardApi {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl DashboardApi {
    /// 按配置创建（初始无数据集）
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            importer: ReportImporterImpl::new(config),
            aggregator: PeriodAggregator::new(),
            summary: SummaryEngine::new(),
            kpi: KpiEngine::new(config),
            trend: TrendEngine::new(config),
            current: RwLock::new(None),
        }
    }

    // ==========================================
    // 数据集槽位
    // ==========================================

    /// 加载 CSV 报表,成功后替换当前数据集
    ///
    /// # 返回
    /// - Err(NoOperationsFound): 文件可读但无可用数据
    /// - Err(FileUnreadable): 文件不存在/不可解码
    #[instrument(skip(self, file_path))]
    pub async fn load_csv<P: AsRef<Path> + Send>(&self, file_path: P) -> ApiResult<LoadResponse> {
        let outcome = self.importer.import_from_csv(file_path).await.map_err(|e| {
            warn!(error = %e, "报表加载失败，保留当前数据集");
            ApiError::from(e)
        })?;
        self.install(outcome)
    }

    /// 加载已解析的原始行,成功后替换当前数据集
    pub fn load_rows(&self, rows: &[RawRow], source: Option<String>) -> ApiResult<LoadResponse> {
        let outcome = self.importer.import_rows(rows, source).map_err(|e| {
            warn!(error = %e, "报表加载失败，保留当前数据集");
            ApiError::from(e)
        })?;
        self.install(outcome)
    }

    /// 清空当前数据集
    pub fn clear(&self) -> ApiResult<()> {
        let mut slot = self.current.write().map_err(lock_error)?;
        if let Some(previous) = slot.take() {
            info!(generation_id = %previous.generation_id, "当前数据集已清空");
        }
        Ok(())
    }

    /// 当前数据集（未加载时返回 NoDataLoaded）
    pub fn dataset(&self) -> ApiResult<Arc<Dataset>> {
        let slot = self.current.read().map_err(lock_error)?;
        slot.clone().ok_or(ApiError::NoDataLoaded)
    }

    /// 当前数据集代号
    pub fn generation_id(&self) -> ApiResult<String> {
        Ok(self.dataset()?.generation_id.clone())
    }

    fn install(&self, outcome: ImportOutcome) -> ApiResult<LoadResponse> {
        let elapsed_ms = outcome.elapsed_ms;
        let dataset = Dataset::from(outcome);
        let response = LoadResponse {
            generation_id: dataset.generation_id.clone(),
            source: dataset.source.clone(),
            rows_scanned: dataset.rows_scanned,
            operations: dataset.operations.len(),
            undated_operations: dataset.undated_operations,
            executives: self.summary.executive_options(&dataset.operations).len(),
            elapsed_ms,
        };

        let mut slot = self.current.write().map_err(lock_error)?;
        *slot = Some(Arc::new(dataset));

        info!(
            generation_id = %response.generation_id,
            operations = response.operations,
            executives = response.executives,
            "当前数据集已替换"
        );
        Ok(response)
    }

    // ==========================================
    // 基础数据
    // ==========================================

    /// 全部业务行（源顺序）
    pub fn operations(&self) -> ApiResult<Vec<Operation>> {
        Ok(self.dataset()?.operations.clone())
    }

    /// 月度聚合
    pub fn monthly(&self) -> ApiResult<Vec<MonthlyAgg>> {
        Ok(self.aggregator.aggregate_monthly(&self.dataset()?.operations))
    }

    /// 周度聚合
    pub fn weekly(&self) -> ApiResult<Vec<WeeklyAgg>> {
        Ok(self.aggregator.aggregate_weekly(&self.dataset()?.operations))
    }

    /// 原始口径执行人合计（含报价与无日期行）
    pub fn raw_totals(&self) -> ApiResult<SummaryMap> {
        Ok(self.summary.summarize_operations(&self.dataset()?.operations))
    }

    // ==========================================
    // 范围分析
    // ==========================================

    /// 范围内执行人汇总
    pub fn executive_summaries(&self, scope: &AnalyticsScope) -> ApiResult<SummaryMap> {
        let monthly = self.monthly()?;
        Ok(self.summary.summarize_scope(&monthly, scope))
    }

    /// 全局指标
    #[instrument(skip(self))]
    pub fn global_kpis(&self, scope: &AnalyticsScope) -> ApiResult<GlobalKpis> {
        let dataset = self.dataset()?;
        let (monthly, summaries) = self.scoped(&dataset, scope);
        let operations: Vec<Operation> = dataset
            .operations
            .iter()
            .filter(|op| scope.contains(op))
            .cloned()
            .collect();
        Ok(self.kpi.global_kpis(&operations, &monthly, &summaries))
    }

    /// 进阶指标
    #[instrument(skip(self))]
    pub fn advanced_kpis(&self, scope: &AnalyticsScope) -> ApiResult<AdvancedKpis> {
        let dataset = self.dataset()?;
        let (monthly, summaries) = self.scoped(&dataset, scope);
        Ok(self.kpi.advanced_kpis(&monthly, &summaries))
    }

    /// 执行人排行
    pub fn top_performers(&self, scope: &AnalyticsScope) -> ApiResult<Vec<TopPerformer>> {
        let summaries = self.executive_summaries(scope)?;
        Ok(self.summary.top_performers(&summaries))
    }

    /// 图表序列
    pub fn chart_series(&self, scope: &AnalyticsScope) -> ApiResult<Vec<PeriodPoint>> {
        let monthly = self.monthly()?;
        Ok(self.summary.period_series(&monthly, scope))
    }

    fn scoped(&self, dataset: &Dataset, scope: &AnalyticsScope) -> (Vec<MonthlyAgg>, SummaryMap) {
        let monthly: Vec<MonthlyAgg> = self
            .aggregator
            .aggregate_monthly(&dataset.operations)
            .into_iter()
            .filter(|agg| scope.matches(agg))
            .collect();
        let summaries = self.summary.summarize_scope(&monthly, &AnalyticsScope::all());
        (monthly, summaries)
    }

    // ==========================================
    // 趋势
    // ==========================================

    /// 每个执行人最近两个月的对比
    pub fn monthly_trends(&self) -> ApiResult<Vec<ExecutiveTrend<MonthKey>>> {
        Ok(self.trend.latest_trends(&self.monthly()?))
    }

    /// 每个执行人最近两周的对比
    pub fn weekly_trends(&self) -> ApiResult<Vec<ExecutiveTrend<WeekKey>>> {
        Ok(self.trend.latest_trends(&self.weekly()?))
    }

    /// 月度两期对比
    ///
    /// # 参数
    /// - `current`: "latest" 或月键 (如 "2024-3")
    /// - `previous`: "previous" 或月键
    pub fn compare_months(
        &self,
        current: &str,
        previous: &str,
    ) -> ApiResult<Vec<ExecutiveTrend<MonthKey>>> {
        let current = parse_selection::<MonthKey>(current, LATEST_PERIOD)?;
        let previous = parse_selection::<MonthKey>(previous, PREVIOUS_PERIOD)?;
        Ok(self.trend.compare_periods(&self.monthly()?, current, previous))
    }

    /// 周度两期对比（参数同 compare_months,周键如 "2024-W9"）
    pub fn compare_weeks(
        &self,
        current: &str,
        previous: &str,
    ) -> ApiResult<Vec<ExecutiveTrend<WeekKey>>> {
        let current = parse_selection::<WeekKey>(current, LATEST_PERIOD)?;
        let previous = parse_selection::<WeekKey>(previous, PREVIOUS_PERIOD)?;
        Ok(self.trend.compare_periods(&self.weekly()?, current, previous))
    }

    // ==========================================
    // 明细与选项
    // ==========================================

    /// 执行人业务行明细（month: "all" 或月键）,按日期降序
    pub fn executive_operations(&self, executive: &str, month: &str) -> ApiResult<Vec<Operation>> {
        let executive = executive.trim();
        if executive.is_empty() {
            return Err(ApiError::InvalidInput("执行人不能为空".to_string()));
        }
        let month = AnalyticsScope::from_selection("all", month)?.month;
        let dataset = self.dataset()?;
        Ok(self
            .summary
            .executive_operations(&dataset.operations, executive, month))
    }

    /// 可选月份（升序）
    pub fn available_months(&self) -> ApiResult<Vec<MonthKey>> {
        Ok(self.summary.available_periods(&self.monthly()?))
    }

    /// 可选周（升序）
    pub fn available_weeks(&self) -> ApiResult<Vec<WeekKey>> {
        Ok(self.summary.available_periods(&self.weekly()?))
    }

    /// 执行人名单（首次出现顺序）
    pub fn executive_options(&self) -> ApiResult<Vec<String>> {
        Ok(self.summary.executive_options(&self.dataset()?.operations))
    }
}

/// 解析周期选择值: 关键字 (或空串) → None,否则按周期键解析
fn parse_selection<K>(value: &str, keyword: &str) -> ApiResult<Option<K>>
where
    K: PeriodKey + std::str::FromStr<Err = crate::domain::PeriodKeyParseError>,
{
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(keyword) {
        return Ok(None);
    }
    Ok(Some(value.parse::<K>()?))
}

fn lock_error<T>(err: std::sync::PoisonError<T>) -> ApiError {
    ApiError::InternalError(format!("数据集锁获取失败: {}", err))
}
