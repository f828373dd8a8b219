//! 배치 스케줄러
//!
//! 전체 브랜드 목록을 고정 크기 배치로 나누어 오케스트레이터에 흘려
//! 보냅니다. 브랜드 간/배치 간 대기, 배치 결과 기록, 주기적 체크포인트,
//! 재시작 필터링, 쿼터 소진 시 중단을 책임집니다.
//!
//! 브랜드 하나의 장애는 배치를 중단시키지 않습니다. 쿼터 소진만이
//! 런을 끝내며, 그 경우에도 누적 상태는 체크포인트로 보존됩니다.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::orchestrator::DiscoveryOrchestrator;
use crate::application::reporting::CollectionReport;
use crate::application::run_state::RunContext;
use crate::domain::brand::{BrandInput, DiscoveryResult};
use crate::domain::constants::{batching, naver};
use crate::domain::error::CollectorError;
use crate::domain::services::CheckpointStore;

/// 스케줄러 동작 파라미터
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub batch_size: usize,
    /// 브랜드 간 대기 (검색 초당 제한에서 유도: ceil(1000/rps))
    pub inter_brand_delay: Duration,
    /// 배치 간 최소 대기
    pub min_batch_delay: Duration,
    /// 배치 간 대기 = max(inter_brand_delay x factor, min_batch_delay)
    pub batch_delay_factor: u32,
    /// 전체 체크포인트 저장 주기 (완료 배치 수 기준)
    pub checkpoint_interval_batches: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_size: batching::DEFAULT_BATCH_SIZE,
            inter_brand_delay: Duration::from_millis(
                (1000 + u64::from(naver::REQUESTS_PER_SECOND) - 1)
                    / u64::from(naver::REQUESTS_PER_SECOND),
            ),
            min_batch_delay: Duration::from_millis(batching::MIN_BATCH_DELAY_MS),
            batch_delay_factor: batching::BATCH_DELAY_FACTOR as u32,
            checkpoint_interval_batches: batching::CHECKPOINT_INTERVAL_BATCHES,
        }
    }
}

impl SchedulerConfig {
    fn batch_delay(&self) -> Duration {
        self.inter_brand_delay
            .saturating_mul(self.batch_delay_factor)
            .max(self.min_batch_delay)
    }
}

/// 이미 처리된 브랜드(정규화 키 기준)를 작업 목록에서 제외합니다.
pub fn filter_unprocessed(
    brands: Vec<BrandInput>,
    processed_keys: &HashSet<String>,
) -> Vec<BrandInput> {
    let total = brands.len();
    let remaining: Vec<BrandInput> = brands
        .into_iter()
        .filter(|b| !processed_keys.contains(&b.identity_key()))
        .collect();

    info!(
        "🔄 필터링 결과: 전체 {total}개 / 이미 처리됨 {}개 / 남은 브랜드 {}개",
        total - remaining.len(),
        remaining.len()
    );
    remaining
}

pub struct BatchScheduler {
    orchestrator: DiscoveryOrchestrator,
    store: Arc<dyn CheckpointStore>,
    config: SchedulerConfig,
}

impl BatchScheduler {
    pub fn new(
        orchestrator: DiscoveryOrchestrator,
        store: Arc<dyn CheckpointStore>,
        config: SchedulerConfig,
    ) -> Self {
        Self { orchestrator, store, config }
    }

    /// 남은 브랜드 전체를 배치 단위로 처리합니다.
    ///
    /// 중단 신호는 브랜드 경계에서만 확인합니다 (진행 중인 브랜드는
    /// 끝까지 처리). 정상 종료/중단 모두 마지막에 체크포인트를 남기고
    /// 집계 보고서를 돌려줍니다. `Err`은 쿼터 소진뿐이며, 그때도 상태는
    /// 먼저 체크포인트됩니다.
    pub async fn run(
        &self,
        ctx: &RunContext,
        brands: Vec<BrandInput>,
        cancel: &CancellationToken,
    ) -> Result<CollectionReport, CollectorError> {
        let processed = ctx.processed_keys().await;
        let work = filter_unprocessed(brands, &processed);

        if work.is_empty() {
            info!("🎉 모든 브랜드가 이미 처리되었습니다. 보고서만 재생성합니다.");
            let state = ctx.snapshot().await;
            return Ok(CollectionReport::build(&state, ctx.elapsed_secs(), false));
        }

        let batches: Vec<&[BrandInput]> = work.chunks(self.config.batch_size).collect();
        info!(
            "🚀 {}개 브랜드 배치 처리 시작 (배치 {}개, 크기 {})",
            work.len(),
            batches.len(),
            self.config.batch_size
        );

        let mut interrupted = false;

        'batches: for (batch_offset, batch) in batches.iter().enumerate() {
            debug!("📦 배치 {}/{} 시작", batch_offset + 1, batches.len());
            let mut batch_results: Vec<DiscoveryResult> = Vec::new();

            for (i, brand) in batch.iter().enumerate() {
                if cancel.is_cancelled() {
                    warn!("🛑 중단 신호 수신, 남은 브랜드를 건너뜁니다");
                    interrupted = true;
                    break 'batches;
                }

                match self.orchestrator.discover(ctx, brand).await {
                    Ok(result) => {
                        ctx.record(result.clone()).await;
                        batch_results.push(result);
                    }
                    Err(err) if err.is_run_fatal() => {
                        error!("🛑 일일 쿼터 소진, 런을 종료합니다: {err}");
                        self.checkpoint(ctx, "쿼터 소진").await;
                        return Err(err);
                    }
                    Err(err) => {
                        // 분류되지 않은 브랜드 단위 장애: 기록하고 계속
                        warn!("❌ {} 처리 실패: {err}", brand.brand_name);
                        let result =
                            DiscoveryResult::errored(brand, Vec::new(), err.to_string());
                        ctx.record(result.clone()).await;
                        batch_results.push(result);
                    }
                }

                if i + 1 < batch.len() {
                    tokio::time::sleep(self.config.inter_brand_delay).await;
                }
            }

            let completed = ctx.note_batch_completed();

            if let Err(err) =
                self.store.save_batch(completed, &batch_results, ctx.request_count()).await
            {
                warn!("⚠️ 배치 결과 저장 실패 (계속 진행): {err:#}");
            }

            if completed % self.config.checkpoint_interval_batches == 0 {
                self.checkpoint(ctx, "주기 저장").await;
            }

            info!(
                "📊 배치 {} 완료: 누적 성공 {} / 실패 {} / API {}/{}",
                completed,
                ctx.success_count().await,
                ctx.failed_count().await,
                ctx.request_count(),
                ctx.daily_quota_limit()
            );

            if batch_offset + 1 < batches.len() {
                let delay = self.config.batch_delay();
                debug!("⏰ 다음 배치까지 {}ms 대기", delay.as_millis());
                tokio::time::sleep(delay).await;
            }
        }

        self.checkpoint(ctx, if interrupted { "중단" } else { "완료" }).await;
        let state = ctx.snapshot().await;
        Ok(CollectionReport::build(&state, ctx.elapsed_secs(), interrupted))
    }

    /// 최선 노력 체크포인트 (실패해도 런 진행에는 영향 없음)
    async fn checkpoint(&self, ctx: &RunContext, reason: &str) {
        let state = ctx.snapshot().await;
        match self.store.save_snapshot(&state).await {
            Ok(()) => info!(
                "💾 체크포인트 저장 ({reason}): 처리 {}건",
                state.total_processed()
            ),
            Err(err) => warn!("⚠️ 체크포인트 저장 실패 ({reason}): {err:#}"),
        }
    }
}
