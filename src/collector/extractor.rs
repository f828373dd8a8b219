//! 검색 결과에서 공식 웹사이트 후보 추출
//!
//! 검색 API가 돌려준 항목을 제외 목록/공식 사이트 휴리스틱으로 거르고,
//! 점수를 매겨 순위를 정합니다. 파싱이 불가능한 URL은 조용히 건너뜁니다
//! (실패로 집계하지 않음).

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use super::domain_guess::normalize_english_name;
use super::scoring;
use crate::domain::candidate::{SearchCandidate, SearchItem};
use crate::domain::constants::{domains, markers};

/// 최종 웹사이트 목록으로 살아남는 후보 수
pub const TOP_WEBSITE_LIMIT: usize = 3;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[^;]+;").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// HTML 태그/엔티티 제거 및 공백 정리
///
/// Naver 검색 결과의 제목/설명에는 `<b>` 강조 태그와 엔티티가 섞여
/// 있으므로 매칭 전에 반드시 정리합니다.
pub fn clean_text(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, "");
    let without_entities = ENTITY_RE.replace_all(&without_tags, " ");
    WHITESPACE_RE.replace_all(&without_entities, " ").trim().to_string()
}

/// 검색 결과 항목들을 걸러 순위가 매겨진 후보 목록을 만듭니다.
pub fn extract_candidates(
    items: &[SearchItem],
    brand_name: &str,
    english_name: Option<&str>,
) -> Vec<SearchCandidate> {
    let mut brand_keywords = vec![brand_name.to_lowercase()];
    if let Some(english) = english_name {
        brand_keywords.push(english.to_lowercase());
    }

    let clean_english = english_name
        .map(normalize_english_name)
        .filter(|s| !s.is_empty());

    let mut candidates = Vec::new();

    for item in items {
        let title = clean_text(&item.title);
        let description = clean_text(&item.description);

        // 잘못된 URL은 건너뛴다
        let Ok(parsed) = Url::parse(&item.link) else { continue };
        let Some(host) = parsed.host_str() else { continue };
        let hostname = host.to_lowercase();

        if is_excluded_host(&hostname) {
            continue;
        }

        let domain_match = clean_english
            .as_deref()
            .is_some_and(|clean| is_domain_match(&hostname, clean));

        let text = format!("{title} {description}").to_lowercase();

        if !domain_match && !is_likely_official(&hostname, &text, &brand_keywords) {
            continue;
        }

        let breakdown =
            scoring::score_search_candidate(&hostname, &text, &brand_keywords, domain_match);
        debug!(
            "🔍 후보: {hostname} (점수 {}{})",
            breakdown.total,
            if domain_match { ", 도메인 매치" } else { "" }
        );

        candidates.push(SearchCandidate {
            url: item.link.clone(),
            hostname,
            title,
            description,
            is_domain_match: domain_match,
            score: breakdown.total,
        });
    }

    rank_candidates(candidates)
}

/// 후보 순위 결정: 도메인 매치 > 높은 점수 > 한국 도메인, 이후 입력 순서 유지
pub fn rank_candidates(mut candidates: Vec<SearchCandidate>) -> Vec<SearchCandidate> {
    candidates.sort_by(|a, b| {
        b.is_domain_match
            .cmp(&a.is_domain_match)
            .then_with(|| b.score.cmp(&a.score))
            .then_with(|| is_korean_host(&b.hostname).cmp(&is_korean_host(&a.hostname)))
    });
    candidates
}

/// 상위 후보의 URL만 추립니다 (상위 N개 절단 후 중복 제거, 순서 유지).
pub fn top_websites(candidates: &[SearchCandidate], limit: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .iter()
        .take(limit)
        .filter(|c| seen.insert(c.url.clone()))
        .map(|c| c.url.clone())
        .collect()
}

fn is_excluded_host(hostname: &str) -> bool {
    domains::EXCLUDED_HOSTS.iter().any(|d| hostname.contains(d))
}

/// 정규화된 영문명이 호스트명에 포함되는지 (도메인 매치)
fn is_domain_match(hostname: &str, clean_english: &str) -> bool {
    hostname.contains(clean_english)
        || hostname.starts_with(&format!("{clean_english}."))
        || hostname.contains(&format!(".{clean_english}."))
        || hostname.ends_with(&format!(".{clean_english}"))
}

/// 공식 웹사이트 가능성 휴리스틱
///
/// 호스트명에 브랜드 키워드가 들어 있으면 그것만으로 인정하고, 아니면
/// 본문 키워드 + 공식 마커 + 인정 접미사 세 조건을 모두 요구합니다.
fn is_likely_official(hostname: &str, text: &str, brand_keywords: &[String]) -> bool {
    for keyword in brand_keywords {
        let compact: String = keyword.split_whitespace().collect();
        if !compact.is_empty() && hostname.contains(&compact) {
            return true;
        }
    }

    let has_official_marker = markers::OFFICIAL_LIKELY.iter().any(|m| text.contains(m));
    let has_brand_keyword = brand_keywords.iter().any(|kw| text.contains(kw.as_str()));
    let has_recognized_suffix =
        domains::RECOGNIZED_SUFFIXES.iter().any(|s| hostname.ends_with(s));

    has_official_marker && has_brand_keyword && has_recognized_suffix
}

fn is_korean_host(hostname: &str) -> bool {
    hostname.contains(".co.kr") || hostname.contains(".kr")
}
