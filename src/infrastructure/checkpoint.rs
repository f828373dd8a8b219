//! 파일 기반 체크포인트 저장소
//!
//! 런 상태 전체를 단조 증가 시퀀스 번호가 붙은 JSON 스냅샷으로
//! 영속합니다. 파일명 정렬이나 타임스탬프에 의존하지 않고 스냅샷
//! 자체에 번호를 기록하며, 복원 시에는 번호 내림차순으로 읽을 수 있는
//! 첫 스냅샷을 택합니다. 손상된 아티팩트는 건너뜁니다 (복원 실패는
//! 새 런으로 이어질 뿐 치명적이지 않음).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::application::run_state::RunState;
use crate::domain::brand::{DiscoveryResult, DiscoveryStatus};
use crate::domain::services::CheckpointStore;

const SNAPSHOT_PREFIX: &str = "collector_checkpoint_";
const BATCH_PREFIX: &str = "collector_batch_";
const JSON_SUFFIX: &str = ".json";

/// 스냅샷 파일 포맷 (시퀀스 번호 + 런 상태)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckpointSnapshot {
    sequence: u64,
    state: RunState,
}

/// 배치 결과 기록 포맷 (진행 로그, 복원에는 쓰이지 않음)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchRecord {
    batch_index: usize,
    processed_at: DateTime<Utc>,
    request_count: u32,
    summary: BatchSummary,
    results: Vec<DiscoveryResult>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchSummary {
    total: usize,
    found: usize,
    not_found: usize,
    error: usize,
}

pub struct FileCheckpointStore {
    dir: PathBuf,
    next_sequence: AtomicU64,
}

impl FileCheckpointStore {
    /// 저장소 디렉터리를 열고 기존 스냅샷에서 다음 시퀀스 번호를 복구합니다.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create checkpoint dir: {}", dir.display()))?;

        let max_sequence = scan_snapshot_sequences(&dir)
            .await?
            .into_iter()
            .map(|(seq, _)| seq)
            .max()
            .unwrap_or(0);

        Ok(Self { dir, next_sequence: AtomicU64::new(max_sequence + 1) })
    }

    fn snapshot_path(&self, sequence: u64) -> PathBuf {
        self.dir.join(format!("{SNAPSHOT_PREFIX}{sequence:06}{JSON_SUFFIX}"))
    }
}

#[async_trait]
impl CheckpointStore for FileCheckpointStore {
    async fn save_snapshot(&self, state: &RunState) -> Result<()> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let snapshot = CheckpointSnapshot { sequence, state: state.clone() };
        let path = self.snapshot_path(sequence);

        let json = serde_json::to_vec_pretty(&snapshot)
            .context("Failed to serialize checkpoint snapshot")?;
        fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write checkpoint: {}", path.display()))?;

        debug!("💾 체크포인트 기록: {} (seq {sequence})", path.display());
        Ok(())
    }

    async fn load_latest(&self) -> Result<Option<RunState>> {
        let mut snapshots = scan_snapshot_sequences(&self.dir).await?;
        snapshots.sort_by(|a, b| b.0.cmp(&a.0));

        if snapshots.is_empty() {
            info!("💡 체크포인트가 없어 새로운 작업을 시작합니다");
            return Ok(None);
        }

        for (sequence, path) in snapshots {
            match fs::read(&path).await {
                Ok(raw) => match serde_json::from_slice::<CheckpointSnapshot>(&raw) {
                    Ok(snapshot) => {
                        info!(
                            "🔄 체크포인트 복원: {} (seq {sequence}, 처리 {}건)",
                            path.display(),
                            snapshot.state.total_processed()
                        );
                        return Ok(Some(snapshot.state));
                    }
                    Err(err) => {
                        warn!("⚠️ 손상된 체크포인트 건너뜀 {}: {err}", path.display());
                    }
                },
                Err(err) => {
                    warn!("⚠️ 체크포인트 읽기 실패 {}: {err}", path.display());
                }
            }
        }

        warn!("⚠️ 읽을 수 있는 체크포인트가 없어 새로운 작업을 시작합니다");
        Ok(None)
    }

    async fn save_batch(
        &self,
        batch_index: usize,
        results: &[DiscoveryResult],
        request_count: u32,
    ) -> Result<()> {
        let record = BatchRecord {
            batch_index,
            processed_at: Utc::now(),
            request_count,
            summary: BatchSummary {
                total: results.len(),
                found: count_status(results, DiscoveryStatus::Found),
                not_found: count_status(results, DiscoveryStatus::NotFound),
                error: count_status(results, DiscoveryStatus::Error),
            },
            results: results.to_vec(),
        };

        let path = self.dir.join(format!("{BATCH_PREFIX}{batch_index:04}{JSON_SUFFIX}"));
        let json =
            serde_json::to_vec_pretty(&record).context("Failed to serialize batch record")?;
        fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write batch record: {}", path.display()))?;

        debug!("💾 배치 결과 저장: {}", path.display());
        Ok(())
    }
}

fn count_status(results: &[DiscoveryResult], status: DiscoveryStatus) -> usize {
    results.iter().filter(|r| r.status == status).count()
}

/// 디렉터리에서 스냅샷 파일과 시퀀스 번호를 수집합니다.
async fn scan_snapshot_sequences(dir: &Path) -> Result<Vec<(u64, PathBuf)>> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read checkpoint dir: {}", dir.display()))?;

    let mut snapshots = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(stem) = name.strip_prefix(SNAPSHOT_PREFIX) else { continue };
        let Some(digits) = stem.strip_suffix(JSON_SUFFIX) else { continue };
        if let Ok(sequence) = digits.parse::<u64>() {
            snapshots.push((sequence, entry.path()));
        }
    }
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::brand::BrandInput;

    fn state_with(request_count: u32) -> RunState {
        let brand = BrandInput {
            brand_name: "테스트".to_string(),
            brand_name_english: None,
            category: None,
            is_featured: false,
        };
        RunState {
            run_id: "run-1".to_string(),
            saved_at: Utc::now(),
            completed_batches: 1,
            request_count,
            daily_quota_limit: 25_000,
            success_results: vec![],
            failed_results: vec![DiscoveryResult::not_found(&brand, vec![])],
        }
    }

    #[tokio::test]
    async fn snapshot_round_trip_restores_latest() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::open(dir.path()).await.unwrap();

        store.save_snapshot(&state_with(5)).await.unwrap();
        store.save_snapshot(&state_with(9)).await.unwrap();

        let restored = store.load_latest().await.unwrap().unwrap();
        assert_eq!(restored.request_count, 9);
        assert_eq!(restored.total_processed(), 1);
    }

    #[tokio::test]
    async fn empty_dir_restores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::open(dir.path()).await.unwrap();
        assert!(store.load_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_latest_snapshot_falls_back_to_previous() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::open(dir.path()).await.unwrap();
        store.save_snapshot(&state_with(5)).await.unwrap();

        // 가장 최근 번호의 스냅샷을 손상시킨다
        let corrupt = dir.path().join("collector_checkpoint_000999.json");
        fs::write(&corrupt, b"{ not json").await.unwrap();

        let restored = store.load_latest().await.unwrap().unwrap();
        assert_eq!(restored.request_count, 5);
    }

    #[tokio::test]
    async fn sequence_numbers_continue_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileCheckpointStore::open(dir.path()).await.unwrap();
            store.save_snapshot(&state_with(1)).await.unwrap();
        }

        let reopened = FileCheckpointStore::open(dir.path()).await.unwrap();
        reopened.save_snapshot(&state_with(2)).await.unwrap();

        let mut sequences: Vec<u64> = scan_snapshot_sequences(dir.path())
            .await
            .unwrap()
            .into_iter()
            .map(|(seq, _)| seq)
            .collect();
        sequences.sort_unstable();
        assert_eq!(sequences, vec![1, 2]);
    }

    #[tokio::test]
    async fn batch_records_summarize_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::open(dir.path()).await.unwrap();

        let brand = BrandInput {
            brand_name: "테스트".to_string(),
            brand_name_english: None,
            category: None,
            is_featured: false,
        };
        let results = vec![
            DiscoveryResult::not_found(&brand, vec![]),
            DiscoveryResult::errored(&brand, vec![], "boom"),
        ];
        store.save_batch(3, &results, 7).await.unwrap();

        let raw = fs::read(dir.path().join("collector_batch_0003.json")).await.unwrap();
        let record: BatchRecord = serde_json::from_slice(&raw).unwrap();
        assert_eq!(record.batch_index, 3);
        assert_eq!(record.summary.total, 2);
        assert_eq!(record.summary.not_found, 1);
        assert_eq!(record.summary.error, 1);
        assert_eq!(record.request_count, 7);
    }
}
