//! 최종 결과 내보내기
//!
//! 전체 보고서(JSON)와 성공 결과 CSV를 출력 디렉터리에 기록합니다.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::fs;
use tracing::info;

use crate::application::reporting::CollectionReport;
use crate::application::run_state::RunState;
use crate::domain::brand::DiscoveryResult;

/// 최종 보고서 파일 포맷 (요약 + 전체 결과 모음)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FinalReportDocument<'a> {
    #[serde(flatten)]
    report: &'a CollectionReport,
    success_results: &'a [DiscoveryResult],
    failed_results: &'a [DiscoveryResult],
}

pub struct ReportExporter {
    output_dir: PathBuf,
}

impl ReportExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    /// 보고서 JSON과 성공 결과 CSV를 기록하고 두 파일 경로를 돌려줍니다.
    pub async fn export_final(
        &self,
        report: &CollectionReport,
        state: &RunState,
    ) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(&self.output_dir).await.with_context(|| {
            format!("Failed to create output dir: {}", self.output_dir.display())
        })?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");

        let json_path = self.output_dir.join(format!("brand_websites_final_{timestamp}.json"));
        let document = FinalReportDocument {
            report,
            success_results: &state.success_results,
            failed_results: &state.failed_results,
        };
        let json = serde_json::to_vec_pretty(&document)
            .context("Failed to serialize final report")?;
        fs::write(&json_path, json)
            .await
            .with_context(|| format!("Failed to write report: {}", json_path.display()))?;

        let csv_path = self.output_dir.join(format!("brand_websites_{timestamp}.csv"));
        write_csv(&csv_path, &state.success_results).await?;

        info!(
            "💾 보고서 저장: {} / CSV: {}",
            json_path.display(),
            csv_path.display()
        );
        Ok((json_path, csv_path))
    }
}

async fn write_csv(path: &Path, results: &[DiscoveryResult]) -> Result<()> {
    fs::write(path, generate_csv(results))
        .await
        .with_context(|| format!("Failed to write CSV: {}", path.display()))
}

/// 성공 결과 CSV 렌더링
fn generate_csv(results: &[DiscoveryResult]) -> String {
    let headers = [
        "Brand Name",
        "English Name",
        "Category",
        "Is Featured",
        "Primary Website",
        "All Websites",
        "Search Method",
        "Search Queries Used",
        "Domain Guessed",
        "Status",
    ];
    let mut rows = vec![headers.map(csv_quote).join(",")];

    for result in results {
        let row = [
            result.brand_name.as_str(),
            result.brand_name_english.as_deref().unwrap_or(""),
            result.category.as_deref().unwrap_or(""),
            if result.is_featured { "Yes" } else { "No" },
            result.primary_website.as_deref().unwrap_or(""),
            &result.websites.join("; "),
            result.search_method.as_str(),
            &result.search_queries.join("; "),
            if result.guessed_domains.is_empty() { "No" } else { "Yes" },
            result.status.as_str(),
        ]
        .map(csv_quote)
        .join(",");
        rows.push(row);
    }

    rows.join("\n")
}

/// 필드를 큰따옴표로 감싸고 내부 따옴표는 두 배로 이스케이프
fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::brand::BrandInput;
    use crate::domain::candidate::GuessedDomain;

    fn brand() -> BrandInput {
        BrandInput {
            brand_name: "버디".to_string(),
            brand_name_english: Some("birdy".to_string()),
            category: Some("fashion".to_string()),
            is_featured: true,
        }
    }

    #[test]
    fn csv_contains_header_and_quoted_rows() {
        let guess = GuessedDomain {
            original_domain: "birdy.co.kr".to_string(),
            url: "https://birdy.co.kr".to_string(),
            status_code: 200,
            redirected: false,
            score: 185,
        };
        let results = vec![DiscoveryResult::guessed(&brand(), guess)];

        let csv = generate_csv(&results);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\"Brand Name\""));
        assert!(lines[1].contains("\"버디\""));
        assert!(lines[1].contains("\"https://birdy.co.kr\""));
        assert!(lines[1].contains("\"domain_guessed\""));
        assert!(lines[1].contains("\"Yes\""));
    }

    #[test]
    fn quotes_inside_fields_are_doubled() {
        assert_eq!(csv_quote(r#"say "hi""#), r#""say ""hi""""#);
    }

    #[tokio::test]
    async fn export_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let state = RunState {
            run_id: "run".to_string(),
            saved_at: Utc::now(),
            completed_batches: 0,
            request_count: 0,
            daily_quota_limit: 25_000,
            success_results: vec![],
            failed_results: vec![],
        };
        let report = CollectionReport::build(&state, 1, false);

        let exporter = ReportExporter::new(dir.path());
        let (json_path, csv_path) = exporter.export_final(&report, &state).await.unwrap();
        assert!(json_path.exists());
        assert!(csv_path.exists());

        let raw = fs::read_to_string(&json_path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("summary").is_some());
        assert!(value.get("successResults").is_some());
    }
}
