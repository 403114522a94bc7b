use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Once;
use std::time::Instant;

/// 慢阶段阈值环境变量（毫秒）
pub const SLOW_STAGE_ENV: &str = "EXECUTIVE_KPI_SLOW_STAGE_MS";

static SLOW_STAGE_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);
static THRESHOLD_INIT: Once = Once::new();

/// 读取慢阶段阈值
///
/// - `EXECUTIVE_KPI_SLOW_STAGE_MS=200` 配置阈值（毫秒）
/// - 未配置时 Debug 默认 500，Release 默认 2000
/// - 配置为 0 时关闭慢阶段告警
pub fn slow_stage_threshold_ms() -> u64 {
    THRESHOLD_INIT.call_once(|| {
        let ms = std::env::var(SLOW_STAGE_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 500 } else { 2000 });
        SLOW_STAGE_THRESHOLD_MS.store(ms, Ordering::Relaxed);
    });
    SLOW_STAGE_THRESHOLD_MS.load(Ordering::Relaxed)
}

/// 性能统计 Guard：记录阶段耗时，超过阈值时额外输出 warn
///
/// 使用方式：
/// ```ignore
/// let _perf = executive_kpi::perf::PerfGuard::new("engine.aggregate_monthly");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
        }
    }

    /// 已耗时（毫秒）
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();

        tracing::info!(target: "perf", op = self.op, elapsed_ms, "done");

        let threshold = slow_stage_threshold_ms();
        if threshold > 0 && elapsed_ms >= threshold {
            tracing::warn!(
                target: "slow_stage",
                op = self.op,
                elapsed_ms,
                threshold_ms = threshold,
                "slow stage"
            );
        }
    }
}
