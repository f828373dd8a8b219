//! 브랜드 단위 수집 오케스트레이터
//!
//! 브랜드 하나를 캐시 → 도메인 추측 → 검색 폴백 순서의 명시적 상태
//! 기계로 처리합니다. 추측 단계는 영문명이 있을 때만 진입하고, 검색
//! 단계는 추측이 실패했거나 영문명이 없을 때만 진입합니다.
//!
//! 쿼터 소진만 오류로 전파되며(런 전체 중단 사유), 그 외 모든 장애는
//! 브랜드 하나의 `error` 결과로 수렴합니다.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::domain_guess::guess_brand_domain;
use super::extractor::{TOP_WEBSITE_LIMIT, extract_candidates, top_websites};
use super::queries::generate_search_queries;
use crate::application::run_state::RunContext;
use crate::domain::brand::{BrandInput, DiscoveryResult};
use crate::domain::constants::{naver, probing};
use crate::domain::error::CollectorError;
use crate::domain::services::{DomainProber, SearchProvider};

/// 오케스트레이터 동작 파라미터
#[derive(Debug, Clone)]
pub struct DiscoveryTuning {
    /// 도메인 확인 간 대기
    pub probe_delay: Duration,
    /// 429 수신 후 대기
    pub rate_limit_cooldown: Duration,
    /// 검색 결과 요청 개수
    pub search_display: u32,
}

impl Default for DiscoveryTuning {
    fn default() -> Self {
        Self {
            probe_delay: Duration::from_millis(probing::PROBE_DELAY_MS),
            rate_limit_cooldown: Duration::from_millis(naver::RATE_LIMIT_COOLDOWN_MS),
            search_display: naver::DEFAULT_DISPLAY,
        }
    }
}

/// 브랜드 하나의 처리 단계
enum DiscoveryPhase {
    Guessing,
    Searching,
    Finished(DiscoveryResult),
}

pub struct DiscoveryOrchestrator {
    search: Arc<dyn SearchProvider>,
    prober: Arc<dyn DomainProber>,
    tuning: DiscoveryTuning,
}

impl DiscoveryOrchestrator {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        prober: Arc<dyn DomainProber>,
        tuning: DiscoveryTuning,
    ) -> Self {
        Self { search, prober, tuning }
    }

    /// 브랜드 하나를 끝까지 처리해 단일 판정을 돌려줍니다.
    ///
    /// 어떤 경로로 끝나든 결과는 반환 전에 런 캐시에 기록됩니다.
    /// `Err`은 쿼터 소진뿐입니다.
    pub async fn discover(
        &self,
        ctx: &RunContext,
        brand: &BrandInput,
    ) -> Result<DiscoveryResult, CollectorError> {
        if let Some(mut cached) = ctx.cached_result(&brand.brand_name).await {
            debug!("📋 캐시에서 발견: {}", brand.brand_name);
            cached.from_cache = true;
            return Ok(cached);
        }

        info!(
            "🎯 {} {}",
            brand.brand_name,
            brand.english_name().map(|e| format!("({e})")).unwrap_or_default()
        );

        let mut phase = DiscoveryPhase::Guessing;
        loop {
            phase = match phase {
                DiscoveryPhase::Guessing => self.guess_phase(brand).await,
                DiscoveryPhase::Searching => self.search_phase(ctx, brand).await?,
                DiscoveryPhase::Finished(result) => {
                    ctx.cache_result(&brand.brand_name, result.clone()).await;
                    return Ok(result);
                }
            };
        }
    }

    /// 1단계: 영문명 기반 도메인 추측 (가장 확률 높은 경로)
    async fn guess_phase(&self, brand: &BrandInput) -> DiscoveryPhase {
        let Some(english) = brand.english_name() else {
            return DiscoveryPhase::Searching;
        };

        info!("🔮 영문명으로 도메인 추측: {english}");
        match guess_brand_domain(self.prober.as_ref(), english, self.tuning.probe_delay).await {
            Some(guess) => {
                info!("✅ 도메인 추측 성공: {}", guess.url);
                DiscoveryPhase::Finished(DiscoveryResult::guessed(brand, guess))
            }
            None => {
                debug!("도메인 추측 실패, 검색으로 보완");
                DiscoveryPhase::Searching
            }
        }
    }

    /// 2단계: Naver 검색 폴백
    ///
    /// 검색어를 순서대로 시도하고 후보를 낸 첫 검색어에서 멈춥니다.
    /// 검색어 단위 장애(429/400/전송 오류)는 다음 검색어로 넘어가고,
    /// 429는 추가로 고정 냉각 대기를 둡니다 (같은 검색어 재시도는 안 함).
    async fn search_phase(
        &self,
        ctx: &RunContext,
        brand: &BrandInput,
    ) -> Result<DiscoveryPhase, CollectorError> {
        let queries = generate_search_queries(&brand.brand_name, brand.english_name());
        let mut tried: Vec<String> = Vec::new();

        for query in &queries {
            tried.push(query.clone());

            // 쿼터 선점은 네트워크 호출 전에 실패해야 한다
            let _used = ctx.try_consume_search_quota()?;

            info!("🔍 네이버 검색: \"{query}\"");
            match self.search.search(query, self.tuning.search_display).await {
                Ok(items) => {
                    let candidates =
                        extract_candidates(&items, &brand.brand_name, brand.english_name());
                    if candidates.is_empty() {
                        debug!("\"{query}\" 결과 없음");
                        continue;
                    }

                    let websites = top_websites(&candidates, TOP_WEBSITE_LIMIT);
                    info!("✅ \"{query}\"로 {}개 웹사이트 발견", websites.len());
                    return Ok(DiscoveryPhase::Finished(DiscoveryResult::searched(
                        brand, websites, tried,
                    )));
                }
                Err(CollectorError::RateLimited { cooldown_ms }) => {
                    warn!("⚠️ API 요청 제한, {cooldown_ms}ms 대기 후 다음 검색어로");
                    tokio::time::sleep(self.tuning.rate_limit_cooldown).await;
                }
                Err(err) if err.is_run_fatal() => return Err(err),
                Err(err) if err.is_query_scoped() => {
                    warn!("❌ \"{query}\" 검색 실패: {err}");
                }
                Err(err) => {
                    return Ok(DiscoveryPhase::Finished(DiscoveryResult::errored(
                        brand,
                        tried,
                        err.to_string(),
                    )));
                }
            }
        }

        Ok(DiscoveryPhase::Finished(DiscoveryResult::not_found(brand, tried)))
    }
}
