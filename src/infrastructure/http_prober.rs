//! HTTP 기반 도메인 존재 확인
//!
//! HEAD 요청으로 도메인의 생존 여부만 가볍게 확인합니다. HTTPS를 먼저
//! 시도하고 실패하면 HTTP로 내려가며, 두 프로토콜 모두 실패하면 확정적
//! 부재로 판정합니다. 재시도는 하지 않습니다 (정책은 상위 계층 몫).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;
use url::Url;

use crate::domain::candidate::ProbeResult;
use crate::domain::constants::probing;
use crate::domain::services::DomainProber;

/// 프로브 클라이언트 설정
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProbeConfig {
    pub probe_timeout_ms: u64,
    pub max_redirects: usize,
    pub probe_delay_ms: u64,
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: probing::PROBE_TIMEOUT_MS,
            max_redirects: probing::MAX_REDIRECTS,
            probe_delay_ms: probing::PROBE_DELAY_MS,
            user_agent: probing::USER_AGENT.to_string(),
        }
    }
}

pub struct HttpDomainProber {
    client: Client,
}

impl HttpDomainProber {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_millis(config.probe_timeout_ms))
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .context("Failed to create probe HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DomainProber for HttpDomainProber {
    async fn probe(&self, domain: &str) -> ProbeResult {
        for protocol in ["https://", "http://"] {
            let raw = format!("{protocol}{domain}");
            let Ok(requested) = Url::parse(&raw) else {
                continue;
            };

            match self.client.head(requested.clone()).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if (200..400).contains(&status) {
                        let redirected = response.url() != &requested;
                        return ProbeResult::found(
                            response.url().to_string(),
                            status,
                            redirected,
                        );
                    }

                    if status == 401 || status == 403 {
                        // 인증 오류 = 사이트는 존재하지만 접근 제한
                        return ProbeResult::found(raw, status, false);
                    }

                    debug!("{raw} 응답 {status}, 다음 프로토콜 시도");
                }
                Err(err) => {
                    debug!("{raw} 확인 실패: {err}");
                }
            }
        }

        ProbeResult::missing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prober_builds_with_default_config() {
        let prober = HttpDomainProber::new(&ProbeConfig::default());
        assert!(prober.is_ok());
    }

    #[test]
    fn default_config_matches_domain_constants() {
        let config = ProbeConfig::default();
        assert_eq!(config.probe_timeout_ms, 5_000);
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.probe_delay_ms, 200);
    }
}
