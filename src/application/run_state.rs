//! In-memory run state management
//!
//! 런 전체에서 공유되는 가변 상태(요청 카운터, 결과 캐시, 성공/실패
//! 누적 목록)를 하나의 명시적 컨텍스트 객체로 관리합니다. 전역 상태는
//! 없으며, 모든 컴포넌트는 이 컨텍스트를 주입받습니다.
//!
//! `RunState`는 체크포인트에 통째로 영속되는 스냅샷이고, `RunContext`는
//! 그 상태의 런타임 표현입니다.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::brand::{DiscoveryResult, normalize_brand_key};
use crate::domain::error::CollectorError;

/// 체크포인트로 영속되는 런 상태 스냅샷
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    pub run_id: String,
    pub saved_at: DateTime<Utc>,
    pub completed_batches: usize,
    pub request_count: u32,
    pub daily_quota_limit: u32,
    pub success_results: Vec<DiscoveryResult>,
    pub failed_results: Vec<DiscoveryResult>,
}

impl RunState {
    pub fn total_processed(&self) -> usize {
        self.success_results.len() + self.failed_results.len()
    }
}

/// 런타임 공유 컨텍스트
///
/// 요청 카운터는 단일 원자값이고, 캐시와 결과 목록은 배타적 쓰기
/// 규율을 위해 비동기 뮤텍스 뒤에 둡니다. 체크포인트 스냅샷을 만드는
/// 동안에는 두 결과 목록의 락을 함께 쥐어 일관된 전체 복사본을 얻습니다.
pub struct RunContext {
    run_id: String,
    started_at: Instant,
    request_count: AtomicU32,
    completed_batches: AtomicUsize,
    daily_quota_limit: u32,
    /// 정규화된 브랜드명 → 결과. 프로세스 수명 동안만 유지 (영속 안 함)
    cache: Mutex<HashMap<String, DiscoveryResult>>,
    success: Mutex<Vec<DiscoveryResult>>,
    failed: Mutex<Vec<DiscoveryResult>>,
}

impl RunContext {
    /// 새 런 시작
    pub fn new(daily_quota_limit: u32) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Instant::now(),
            request_count: AtomicU32::new(0),
            completed_batches: AtomicUsize::new(0),
            daily_quota_limit,
            cache: Mutex::new(HashMap::new()),
            success: Mutex::new(Vec::new()),
            failed: Mutex::new(Vec::new()),
        }
    }

    /// 체크포인트에서 복원된 런
    ///
    /// 결과 캐시는 복원하지 않습니다. 캐시는 한 프로세스 안에서 같은
    /// 브랜드명이 반복될 때의 재계산 방지용일 뿐입니다.
    pub fn restore(state: RunState) -> Self {
        Self {
            run_id: state.run_id,
            started_at: Instant::now(),
            request_count: AtomicU32::new(state.request_count),
            completed_batches: AtomicUsize::new(state.completed_batches),
            daily_quota_limit: state.daily_quota_limit,
            cache: Mutex::new(HashMap::new()),
            success: Mutex::new(state.success_results),
            failed: Mutex::new(state.failed_results),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn request_count(&self) -> u32 {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn daily_quota_limit(&self) -> u32 {
        self.daily_quota_limit
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// 검색 호출 1건의 쿼터를 선점합니다.
    ///
    /// 한도에 도달해 있으면 네트워크 호출 없이 즉시 `QuotaExceeded`로
    /// 실패합니다. 성공 시 증가된 카운터 값을 돌려줍니다.
    pub fn try_consume_search_quota(&self) -> Result<u32, CollectorError> {
        let limit = self.daily_quota_limit;
        self.request_count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                if current >= limit { None } else { Some(current + 1) }
            })
            .map(|previous| previous + 1)
            .map_err(|current| CollectorError::QuotaExceeded { used: current, limit })
    }

    pub async fn cached_result(&self, brand_name: &str) -> Option<DiscoveryResult> {
        let cache = self.cache.lock().await;
        cache.get(&normalize_brand_key(brand_name)).cloned()
    }

    pub async fn cache_result(&self, brand_name: &str, result: DiscoveryResult) {
        let mut cache = self.cache.lock().await;
        cache.insert(normalize_brand_key(brand_name), result);
    }

    /// 결과를 성공/실패 목록에 누적합니다.
    pub async fn record(&self, result: DiscoveryResult) {
        if result.is_found() {
            self.success.lock().await.push(result);
        } else {
            self.failed.lock().await.push(result);
        }
    }

    /// 이미 처리된 브랜드의 정규화 키 집합 (성공 + 실패 합집합)
    pub async fn processed_keys(&self) -> HashSet<String> {
        let success = self.success.lock().await;
        let failed = self.failed.lock().await;
        success
            .iter()
            .chain(failed.iter())
            .map(DiscoveryResult::identity_key)
            .collect()
    }

    pub async fn success_count(&self) -> usize {
        self.success.lock().await.len()
    }

    pub async fn failed_count(&self) -> usize {
        self.failed.lock().await.len()
    }

    pub fn note_batch_completed(&self) -> usize {
        self.completed_batches.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn completed_batches(&self) -> usize {
        self.completed_batches.load(Ordering::SeqCst)
    }

    /// 현재 상태의 전체 스냅샷을 만듭니다.
    ///
    /// 스냅샷 구축 동안 두 결과 목록의 락을 함께 쥐므로 부분적으로
    /// 갱신된 상태가 찍히지 않습니다.
    pub async fn snapshot(&self) -> RunState {
        let success = self.success.lock().await;
        let failed = self.failed.lock().await;
        RunState {
            run_id: self.run_id.clone(),
            saved_at: Utc::now(),
            completed_batches: self.completed_batches(),
            request_count: self.request_count(),
            daily_quota_limit: self.daily_quota_limit,
            success_results: success.clone(),
            failed_results: failed.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::brand::BrandInput;

    fn brand(name: &str) -> BrandInput {
        BrandInput {
            brand_name: name.to_string(),
            brand_name_english: None,
            category: None,
            is_featured: false,
        }
    }

    #[test]
    fn quota_is_enforced_before_any_call() {
        let ctx = RunContext::new(2);
        assert_eq!(ctx.try_consume_search_quota().unwrap(), 1);
        assert_eq!(ctx.try_consume_search_quota().unwrap(), 2);

        let err = ctx.try_consume_search_quota().unwrap_err();
        assert!(matches!(err, CollectorError::QuotaExceeded { used: 2, limit: 2 }));
        // 실패한 시도는 카운터를 증가시키지 않는다
        assert_eq!(ctx.request_count(), 2);
    }

    #[tokio::test]
    async fn processed_keys_unify_success_and_failure() {
        let ctx = RunContext::new(100);
        ctx.record(DiscoveryResult::not_found(&brand("  Alpha "), vec![])).await;
        ctx.record(DiscoveryResult::errored(&brand("BETA"), vec![], "boom")).await;

        let keys = ctx.processed_keys().await;
        assert!(keys.contains("alpha"));
        assert!(keys.contains("beta"));
        assert_eq!(keys.len(), 2);
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_restore() {
        let ctx = RunContext::new(25_000);
        let _ = ctx.try_consume_search_quota().unwrap();
        ctx.record(DiscoveryResult::not_found(&brand("감마"), vec![])).await;
        let _ = ctx.note_batch_completed();

        let state = ctx.snapshot().await;
        let restored = RunContext::restore(state);
        assert_eq!(restored.request_count(), 1);
        assert_eq!(restored.completed_batches(), 1);
        assert_eq!(restored.failed_count().await, 1);
        // 캐시는 복원 대상이 아니다
        assert!(restored.cached_result("감마").await.is_none());
    }
}
