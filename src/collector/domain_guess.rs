//! 영문 브랜드명 기반 도메인 추측
//!
//! 정규화된 영문명을 고정 패턴 목록에 대입해 후보 도메인을 생성하고,
//! 생성 순서대로 존재를 확인합니다. 첫 번째로 존재하는 후보가 즉시
//! 당첨되며 이후 후보는 확인하지 않습니다 (first-match-wins).

use std::time::Duration;

use tracing::{debug, info};

use super::scoring;
use crate::domain::candidate::{DomainCandidate, GuessedDomain};
use crate::domain::services::DomainProber;

/// 영문명 정규화: 소문자 변환 후 `[a-z0-9]` 이외 문자 제거
pub fn normalize_english_name(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// 후보 도메인 생성 (고정 우선순위 순서)
///
/// 한국 도메인 → 글로벌 도메인 → 스토어 변형 → 기타 순서이며, 원본
/// 식별자에 공백이 있을 때만 하이픈 변형을 덧붙입니다. 정규화 결과가
/// 2자 미만이면 빈 목록을 돌려줍니다.
pub fn generate_domain_candidates(raw_english: &str) -> Vec<DomainCandidate> {
    let n = normalize_english_name(raw_english);
    if n.len() < 2 {
        return Vec::new();
    }

    // 패턴 목록은 고정 순서. {n}.co.kr 항목의 중복 포함도 기존 목록 그대로
    let mut patterns = vec![
        // 한국 도메인 우선
        format!("{n}.co.kr"),
        format!("www.{n}.co.kr"),
        format!("{n}.kr"),
        // 글로벌 도메인
        format!("{n}.com"),
        format!("www.{n}.com"),
        // 쇼핑몰/스토어 패턴
        format!("shop.{n}.com"),
        format!("store.{n}.com"),
        format!("{n}shop.co.kr"),
        format!("{n}store.co.kr"),
        // 기타 패턴
        format!("{n}.net"),
        format!("{n}korea.com"),
        format!("{n}.co.kr"),
    ];

    if raw_english.trim().contains(char::is_whitespace) {
        let hyphenated = raw_english
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        patterns.push(format!("{hyphenated}.com"));
        patterns.push(format!("{hyphenated}.co.kr"));
    }

    patterns
        .into_iter()
        .enumerate()
        .map(|(rank, domain)| DomainCandidate::new(domain, rank))
        .collect()
}

/// 후보를 순서대로 확인해 첫 번째로 존재하는 도메인을 돌려줍니다.
///
/// 확인 사이에는 짧은 대기를 두어 과도한 요청을 피합니다. 모든 후보가
/// 존재하지 않으면 `None` (검색 단계로 폴백).
pub async fn guess_brand_domain(
    prober: &dyn DomainProber,
    raw_english: &str,
    probe_delay: Duration,
) -> Option<GuessedDomain> {
    let clean = normalize_english_name(raw_english);
    let candidates = generate_domain_candidates(raw_english);
    if candidates.is_empty() {
        return None;
    }

    let total = candidates.len();
    debug!("도메인 패턴 {total}개 확인 중...");

    for mut candidate in candidates {
        let probe = prober.probe(&candidate.domain).await;

        if probe.exists {
            candidate.score = scoring::domain_guess_score(
                &candidate.domain,
                &clean,
                candidate.pattern_rank,
            );
            let url = probe
                .final_url
                .unwrap_or_else(|| format!("https://{}", candidate.domain));
            info!(
                "✅ [{}/{}] {} 발견 (점수 {})",
                candidate.pattern_rank + 1,
                total,
                url,
                candidate.score
            );
            return Some(GuessedDomain {
                original_domain: candidate.domain,
                url,
                status_code: probe.status_code.unwrap_or(0),
                redirected: probe.redirected,
                score: candidate.score,
            });
        }

        debug!("[{}/{}] {} 없음", candidate.pattern_rank + 1, total, candidate.domain);
        tokio::time::sleep(probe_delay).await;
    }

    None
}
