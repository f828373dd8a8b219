//! 수집기 실행 진입점
//!
//! 사용법: `naver-brand-collector <brands.json> [config.json]`
//!
//! 시작 시 가장 최근 체크포인트를 복원해 이미 처리된 브랜드를 건너뛰고,
//! Ctrl-C를 받으면 진행 중인 브랜드까지 처리한 뒤 체크포인트를 남기고
//! 종료합니다.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use naver_brand_collector::application::reporting::CollectionReport;
use naver_brand_collector::application::run_state::RunContext;
use naver_brand_collector::collector::{BatchScheduler, DiscoveryOrchestrator};
use naver_brand_collector::domain::services::CheckpointStore;
use naver_brand_collector::infrastructure::brand_loader::load_brands;
use naver_brand_collector::infrastructure::logging::init_logging;
use naver_brand_collector::infrastructure::{
    AppConfig, FileCheckpointStore, HttpDomainProber, NaverSearchClient, ReportExporter,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let brands_path =
        args.get(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("./brands.json"));
    let config_path = args.get(2).map(PathBuf::from);

    let config = AppConfig::load(config_path.as_deref()).await?;

    let log_dir = config.output.file_logging.then(|| config.output.output_dir.join("logs"));
    init_logging(log_dir.as_deref())?;

    config.validate()?;

    info!("🎯 네이버 검색 API 브랜드 홈페이지 수집기 시작");
    let brands = load_brands(&brands_path).await?;

    let store = Arc::new(FileCheckpointStore::open(&config.output.output_dir).await?);

    let ctx = match store.load_latest().await? {
        Some(state) => {
            info!(
                "📋 이전 작업 상태 복원: 성공 {} / 실패 {} / API {}/{}",
                state.success_results.len(),
                state.failed_results.len(),
                state.request_count,
                state.daily_quota_limit
            );
            RunContext::restore(state)
        }
        None => RunContext::new(config.limits.daily_quota_limit),
    };

    let search = Arc::new(NaverSearchClient::new(&config.api, &config.limits)?);
    let prober = Arc::new(HttpDomainProber::new(&config.probe)?);
    let orchestrator =
        DiscoveryOrchestrator::new(search, prober, config.discovery_tuning());
    let scheduler =
        BatchScheduler::new(orchestrator, store.clone(), config.scheduler_config());

    // Ctrl-C는 브랜드 경계에서만 반영된다
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("🛑 중단 신호 수신, 진행 중인 브랜드까지 처리 후 종료합니다");
            signal_token.cancel();
        }
    });

    let mut fatal: Option<anyhow::Error> = None;
    let report = match scheduler.run(&ctx, brands, &cancel).await {
        Ok(report) => report,
        Err(err) => {
            // 쿼터 소진: 누적 상태는 이미 체크포인트되어 있다
            error!("🛑 런 중단: {err}");
            let state = ctx.snapshot().await;
            let report = CollectionReport::build(&state, ctx.elapsed_secs(), true);
            fatal = Some(err.into());
            report
        }
    };

    let state = ctx.snapshot().await;
    let exporter = ReportExporter::new(config.output.output_dir.clone());
    exporter.export_final(&report, &state).await?;

    info!(
        "📊 최종 결과: 총 {}개 / 발견 {}개 / 실패 {}개 ({}) / API {}건 ({}) / {}초",
        report.summary.total_brands,
        report.summary.found_websites,
        report.summary.failed_searches,
        report.summary.success_rate,
        report.api_usage.total_requests,
        report.api_usage.usage_rate,
        report.processing_time_secs
    );

    match fatal {
        Some(err) => Err(err),
        None => {
            info!("✅ 모든 브랜드 홈페이지 검색이 완료되었습니다");
            Ok(())
        }
    }
}
