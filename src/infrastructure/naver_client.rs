//! Naver 웹문서 검색 API 클라이언트
//!
//! 검색 호출에 초당 제한(governor 직접 리미터)을 걸어 정책 위반을
//! 예방하고, HTTP 상태를 런 정책이 이해하는 장애 분류로 변환합니다.
//! 일일 쿼터는 여기서 다루지 않습니다 (런 컨텍스트가 호출 전에 선점).

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::InMemoryState;
use governor::state::direct::NotKeyed;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use crate::domain::candidate::SearchItem;
use crate::domain::constants::{naver, probing};
use crate::domain::error::CollectorError;
use crate::domain::services::SearchProvider;

/// Naver API 자격 증명
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NaverApiConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// 검색 호출 제한 설정
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RateLimitConfig {
    pub daily_quota_limit: u32,
    pub requests_per_second: u32,
    pub rate_limit_cooldown_ms: u64,
    pub search_display: u32,
    pub request_timeout_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            daily_quota_limit: naver::DAILY_QUOTA_LIMIT,
            requests_per_second: naver::REQUESTS_PER_SECOND,
            rate_limit_cooldown_ms: naver::RATE_LIMIT_COOLDOWN_MS,
            search_display: naver::DEFAULT_DISPLAY,
            request_timeout_ms: naver::REQUEST_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NaverSearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

pub struct NaverSearchClient {
    client: Client,
    client_id: String,
    client_secret: String,
    cooldown_ms: u64,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl NaverSearchClient {
    pub fn new(api: &NaverApiConfig, limits: &RateLimitConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(probing::USER_AGENT).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_millis(limits.request_timeout_ms))
            .default_headers(headers)
            .build()
            .context("Failed to create search HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(limits.requests_per_second)
                .context("Rate limit must be greater than 0")?,
        );

        Ok(Self {
            client,
            client_id: api.client_id.clone(),
            client_secret: api.client_secret.clone(),
            cooldown_ms: limits.rate_limit_cooldown_ms,
            rate_limiter: RateLimiter::direct(quota),
        })
    }
}

#[async_trait]
impl SearchProvider for NaverSearchClient {
    async fn search(
        &self,
        query: &str,
        display: u32,
    ) -> Result<Vec<SearchItem>, CollectorError> {
        // 초당 제한 준수 (최소 간격 리미터)
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(naver::SEARCH_ENDPOINT)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .query(&[
                ("query", query),
                ("display", &display.to_string()),
                ("start", "1"),
                ("sort", "sim"),
            ])
            .send()
            .await
            .map_err(|err| CollectorError::transient(err.to_string()))?;

        let status = response.status().as_u16();
        match status {
            200 => {
                let body: NaverSearchResponse = response
                    .json()
                    .await
                    .map_err(|err| CollectorError::MalformedInput {
                        message: format!("search response parse failure: {err}"),
                    })?;
                debug!("✅ \"{query}\" {}개 결과 반환", body.items.len());
                Ok(body.items)
            }
            429 => Err(CollectorError::RateLimited { cooldown_ms: self.cooldown_ms }),
            400 => Err(CollectorError::BadQuery {
                query: query.to_string(),
                message: error_message(response).await,
            }),
            _ => Err(CollectorError::ApiFault {
                status,
                message: error_message(response).await,
            }),
        }
    }
}

/// 오류 응답 본문에서 `errorMessage`를 추출합니다 (없으면 본문 그대로).
async fn error_message(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("errorMessage").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_default_limits() {
        let api = NaverApiConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        };
        let client = NaverSearchClient::new(&api, &RateLimitConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn zero_rate_limit_is_rejected() {
        let limits = RateLimitConfig { requests_per_second: 0, ..Default::default() };
        let client = NaverSearchClient::new(&NaverApiConfig::default(), &limits);
        assert!(client.is_err());
    }

    #[test]
    fn response_items_default_to_empty() {
        let parsed: NaverSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());

        let parsed: NaverSearchResponse = serde_json::from_str(
            r#"{"items":[{"link":"https://a.co.kr","title":"<b>A</b>","description":"d"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].link, "https://a.co.kr");
    }
}
