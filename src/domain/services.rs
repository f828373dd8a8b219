//! Collaborator traits at the system boundary
//!
//! The discovery engine talks to the outside world through these traits so
//! tests can substitute deterministic stubs for the network and the
//! filesystem.

use async_trait::async_trait;

use super::candidate::{ProbeResult, SearchItem};
use super::error::CollectorError;
use crate::application::run_state::RunState;
use crate::domain::brand::DiscoveryResult;

/// 외부 웹 검색 제공자 (Naver 웹문서 검색)
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// 검색어 하나로 결과 목록을 조회합니다.
    ///
    /// 실패 분류: 429는 `RateLimited`, 400은 `BadQuery`, 그 외 API 오류는
    /// `ApiFault`, 전송 계층 오류는 `TransientNetwork`.
    async fn search(&self, query: &str, display: u32) -> Result<Vec<SearchItem>, CollectorError>;
}

/// 도메인 존재 확인기
///
/// 존재 여부 판정은 실패하지 않습니다. 두 프로토콜 모두 실패하면
/// `ProbeResult::missing()`을 돌려주며, 재시도 정책은 호출자 몫입니다.
#[async_trait]
pub trait DomainProber: Send + Sync {
    async fn probe(&self, domain: &str) -> ProbeResult;
}

/// 체크포인트 저장소
///
/// 스냅샷은 단조 증가하는 시퀀스 번호로 정렬되며, 읽기 측은 누락되거나
/// 손상된 아티팩트를 허용해야 합니다 (복원 실패는 새 런으로 이어짐).
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// 전체 런 상태 스냅샷을 영속합니다.
    async fn save_snapshot(&self, state: &RunState) -> anyhow::Result<()>;

    /// 가장 최근에 읽을 수 있는 스냅샷을 복원합니다. 없으면 `None`.
    async fn load_latest(&self) -> anyhow::Result<Option<RunState>>;

    /// 배치 하나의 결과 묶음을 기록합니다 (진행 로그 성격).
    async fn save_batch(
        &self,
        batch_index: usize,
        results: &[DiscoveryResult],
        request_count: u32,
    ) -> anyhow::Result<()>;
}
