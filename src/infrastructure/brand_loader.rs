//! 브랜드 목록 파일 로더
//!
//! 브랜드 목록은 JSON 파일로 공급됩니다. 루트가 배열이거나 `allBrands`
//! 배열을 감싼 객체 형태 모두 받아들이며, 과거 내보내기 포맷의 필드명도
//! alias로 수용합니다. 브랜드명이 없는 레코드는 건너뜁니다 (레코드 단위
//! 검증 실패는 파일 전체를 실패시키지 않음).

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::domain::brand::BrandInput;
use crate::domain::error::CollectorError;

pub async fn load_brands(path: &Path) -> Result<Vec<BrandInput>> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read brand file: {}", path.display()))?;

    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse brand file: {}", path.display()))?;

    let records = value
        .get("allBrands")
        .and_then(serde_json::Value::as_array)
        .cloned()
        .or_else(|| value.as_array().cloned())
        .ok_or_else(|| {
            anyhow!("brand file must be a JSON array or an object with 'allBrands'")
        })?;

    let mut brands = Vec::new();
    let mut skipped = 0usize;

    for record in records {
        match serde_json::from_value::<BrandInput>(record) {
            Ok(brand) if !brand.brand_name.trim().is_empty() => brands.push(brand),
            _ => {
                debug!(
                    "{}",
                    CollectorError::ValidationFault { field: "brandName".to_string() }
                );
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("⚠️ 브랜드명이 없는 레코드 {skipped}건 건너뜀");
    }
    info!("📁 브랜드 로드 완료: {}개", brands.len());

    Ok(brands)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write_temp(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brands.json");
        fs::write(&path, content).await.unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn loads_wrapped_and_bare_arrays() {
        let (_dir, path) = write_temp(
            r#"{"allBrands":[{"brandName":"버디","brandNameEnglish":"birdy"}]}"#,
        )
        .await;
        let brands = load_brands(&path).await.unwrap();
        assert_eq!(brands.len(), 1);
        assert_eq!(brands[0].brand_name, "버디");

        let (_dir, path) = write_temp(r#"[{"name":"버디"}]"#).await;
        let brands = load_brands(&path).await.unwrap();
        assert_eq!(brands.len(), 1);
    }

    #[tokio::test]
    async fn records_without_name_are_skipped_not_fatal() {
        let (_dir, path) = write_temp(
            r#"[{"brandName":"버디"},{"brandNameEnglish":"nameless"},{"brandName":"  "}]"#,
        )
        .await;
        let brands = load_brands(&path).await.unwrap();
        assert_eq!(brands.len(), 1);
    }

    #[tokio::test]
    async fn non_array_payload_is_an_error() {
        let (_dir, path) = write_temp(r#"{"brands":{}}"#).await;
        assert!(load_brands(&path).await.is_err());
    }
}
