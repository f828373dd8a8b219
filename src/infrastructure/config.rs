//! Configuration infrastructure
//!
//! 설정은 JSON 파일(선택)과 환경변수에서 읽습니다. 파일이 없으면 기본값으로
//! 동작하며, 자격 증명은 환경변수(`NAVER_CLIENT_ID`/`NAVER_CLIENT_SECRET`)가
//! 파일 값을 덮어씁니다.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use super::http_prober::ProbeConfig;
use super::naver_client::{NaverApiConfig, RateLimitConfig};
use crate::collector::orchestrator::DiscoveryTuning;
use crate::collector::scheduler::SchedulerConfig;
use crate::domain::constants::batching;

/// 배치 처리 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchConfig {
    pub batch_size: usize,
    pub checkpoint_interval_batches: usize,
    pub min_batch_delay_ms: u64,
    pub batch_delay_factor: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: batching::DEFAULT_BATCH_SIZE,
            checkpoint_interval_batches: batching::CHECKPOINT_INTERVAL_BATCHES,
            min_batch_delay_ms: batching::MIN_BATCH_DELAY_MS,
            batch_delay_factor: batching::BATCH_DELAY_FACTOR as u32,
        }
    }
}

/// 출력 경로 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputConfig {
    /// 체크포인트/배치 기록/보고서가 저장되는 디렉터리
    pub output_dir: PathBuf,
    /// 로그 파일 기록 여부
    pub file_logging: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { output_dir: PathBuf::from("./output"), file_logging: true }
    }
}

/// 전체 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub api: NaverApiConfig,
    pub limits: RateLimitConfig,
    pub probe: ProbeConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// 설정 파일(있으면)과 환경변수에서 설정을 읽습니다.
    pub async fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) if fs::try_exists(path).await.unwrap_or(false) => {
                let raw = fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                let parsed: Self = serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse config: {}", path.display()))?;
                info!("📁 설정 파일 로드: {}", path.display());
                parsed
            }
            _ => Self::default(),
        };

        config.apply_credential_overrides(
            std::env::var("NAVER_CLIENT_ID").ok(),
            std::env::var("NAVER_CLIENT_SECRET").ok(),
        );
        Ok(config)
    }

    /// 환경변수로 받은 자격 증명이 파일 값을 덮어씁니다.
    pub fn apply_credential_overrides(
        &mut self,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) {
        if let Some(id) = client_id.filter(|v| !v.trim().is_empty()) {
            self.api.client_id = id;
        }
        if let Some(secret) = client_secret.filter(|v| !v.trim().is_empty()) {
            self.api.client_secret = secret;
        }
    }

    /// 자격 증명이 채워졌는지 확인합니다.
    pub fn validate(&self) -> Result<()> {
        if self.api.client_id.trim().is_empty() || self.api.client_secret.trim().is_empty() {
            anyhow::bail!(
                "Naver API 자격 증명이 없습니다. NAVER_CLIENT_ID / NAVER_CLIENT_SECRET \
                 환경변수를 설정하거나 설정 파일에 기입하세요."
            );
        }
        Ok(())
    }

    /// 브랜드 간 대기: ceil(1000 / 초당 요청 수)
    pub fn inter_brand_delay(&self) -> Duration {
        let rps = u64::from(self.limits.requests_per_second.max(1));
        Duration::from_millis((1000 + rps - 1) / rps)
    }

    pub fn discovery_tuning(&self) -> DiscoveryTuning {
        DiscoveryTuning {
            probe_delay: Duration::from_millis(self.probe.probe_delay_ms),
            rate_limit_cooldown: Duration::from_millis(self.limits.rate_limit_cooldown_ms),
            search_display: self.limits.search_display,
        }
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            batch_size: self.batch.batch_size.max(1),
            inter_brand_delay: self.inter_brand_delay(),
            min_batch_delay: Duration::from_millis(self.batch.min_batch_delay_ms),
            batch_delay_factor: self.batch.batch_delay_factor,
            checkpoint_interval_batches: self.batch.checkpoint_interval_batches.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_naver_policy() {
        let config = AppConfig::default();
        assert_eq!(config.limits.daily_quota_limit, 25_000);
        assert_eq!(config.limits.requests_per_second, 8);
        assert_eq!(config.batch.batch_size, 50);
        assert_eq!(config.batch.checkpoint_interval_batches, 10);
        // ceil(1000 / 8) = 125ms
        assert_eq!(config.inter_brand_delay(), Duration::from_millis(125));
    }

    #[test]
    fn credential_overrides_ignore_blank_values() {
        let mut config = AppConfig::default();
        config.api.client_id = "file-id".to_string();
        config.apply_credential_overrides(Some("  ".to_string()), Some("env-secret".to_string()));
        assert_eq!(config.api.client_id, "file-id");
        assert_eq!(config.api.client_secret, "env-secret");
    }

    #[test]
    fn validation_requires_both_credentials() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());
        config.api.client_id = "id".to_string();
        assert!(config.validate().is_err());
        config.api.client_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_config_file_keeps_defaults_elsewhere() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"batch":{"batchSize":10}}"#).unwrap();
        assert_eq!(parsed.batch.batch_size, 10);
        assert_eq!(parsed.batch.checkpoint_interval_batches, 10);
        assert_eq!(parsed.limits.daily_quota_limit, 25_000);
    }
}
