//! 최종 집계 보고서
//!
//! 런 종료(정상 완료, 중단, 쿼터 소진) 시점의 상태로부터 요약 보고서를
//! 만듭니다. 렌더링(JSON/CSV 파일)은 인프라 계층의 몫입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::run_state::RunState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUsage {
    pub total_requests: u32,
    pub daily_limit: u32,
    pub usage_rate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_brands: usize,
    pub found_websites: usize,
    pub failed_searches: usize,
    pub success_rate: String,
}

/// 런 하나의 최종 집계
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport {
    pub processed_at: DateTime<Utc>,
    pub processing_time_secs: u64,
    /// 중단 신호 또는 쿼터 소진으로 일찍 끝났는지 여부
    pub interrupted: bool,
    pub api_usage: ApiUsage,
    pub summary: RunSummary,
}

impl CollectionReport {
    pub fn build(state: &RunState, elapsed_secs: u64, interrupted: bool) -> Self {
        let found = state.success_results.len();
        let failed = state.failed_results.len();
        let total = found + failed;

        Self {
            processed_at: Utc::now(),
            processing_time_secs: elapsed_secs,
            interrupted,
            api_usage: ApiUsage {
                total_requests: state.request_count,
                daily_limit: state.daily_quota_limit,
                usage_rate: format!(
                    "{:.2}%",
                    percentage(state.request_count as usize, state.daily_quota_limit as usize)
                ),
            },
            summary: RunSummary {
                total_brands: total,
                found_websites: found,
                failed_searches: failed,
                success_rate: format!("{:.1}%", percentage(found, total)),
            },
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 / whole as f64 * 100.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::brand::{BrandInput, DiscoveryResult};

    #[test]
    fn report_rates_survive_empty_runs() {
        let state = RunState {
            run_id: "test".to_string(),
            saved_at: Utc::now(),
            completed_batches: 0,
            request_count: 0,
            daily_quota_limit: 25_000,
            success_results: vec![],
            failed_results: vec![],
        };
        let report = CollectionReport::build(&state, 0, false);
        assert_eq!(report.summary.success_rate, "0.0%");
        assert_eq!(report.api_usage.usage_rate, "0.00%");
    }

    #[test]
    fn report_counts_follow_state() {
        let brand = BrandInput {
            brand_name: "테스트".to_string(),
            brand_name_english: None,
            category: None,
            is_featured: false,
        };
        let state = RunState {
            run_id: "test".to_string(),
            saved_at: Utc::now(),
            completed_batches: 2,
            request_count: 30,
            daily_quota_limit: 25_000,
            success_results: vec![],
            failed_results: vec![
                DiscoveryResult::not_found(&brand, vec![]),
                DiscoveryResult::not_found(&brand, vec![]),
            ],
        };
        let report = CollectionReport::build(&state, 12, true);
        assert_eq!(report.summary.total_brands, 2);
        assert_eq!(report.summary.found_websites, 0);
        assert_eq!(report.api_usage.total_requests, 30);
        assert!(report.interrupted);
    }
}
