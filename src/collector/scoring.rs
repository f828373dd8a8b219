//! 후보 점수 계산
//!
//! 두 개의 독립적인 순수 점수 함수를 제공합니다. 추측 도메인 점수와
//! 검색 후보 점수 모두 정수이며 음수로 내려가지 않습니다. 함수 안에서는
//! 어떤 I/O도 하지 않고, 진단용 분해 내역을 함께 돌려줍니다.

use crate::domain::constants::{markers, scoring};

/// 점수 기여 항목 하나 (진단용)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorePart {
    pub label: &'static str,
    pub points: i32,
}

/// 점수와 그 분해 내역
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub total: i32,
    pub parts: Vec<ScorePart>,
}

impl ScoreBreakdown {
    fn new() -> Self {
        Self { total: 0, parts: Vec::new() }
    }

    fn add(&mut self, label: &'static str, points: i32) {
        self.total += points;
        self.parts.push(ScorePart { label, points });
    }

    /// 특정 기여 항목이 포함되었는지 (테스트/진단용)
    pub fn has_part(&self, label: &str) -> bool {
        self.parts.iter().any(|p| p.label == label)
    }
}

/// 추측 도메인 점수
///
/// 존재가 확인된 후보에만 적용합니다. 추측은 첫 성공에서 멈추므로 이
/// 점수는 후보 간 선택에 쓰이지 않으며, 당첨 후보와 함께 보고됩니다.
pub fn domain_guess_score(domain: &str, clean_name: &str, pattern_rank: usize) -> i32 {
    let mut score = scoring::PATTERN_BASE - pattern_rank as i32;

    if domain.contains(".co.kr") {
        score += scoring::GUESS_CO_KR_BONUS;
    } else if domain.contains(".kr") {
        score += scoring::GUESS_KR_BONUS;
    } else if domain.contains(".com") {
        score += scoring::GUESS_COM_BONUS;
    }

    if !domain.starts_with("www.") {
        score += scoring::GUESS_NO_WWW_BONUS;
    }

    if domain.starts_with(&format!("{clean_name}."))
        || domain.contains(&format!(".{clean_name}."))
    {
        score += scoring::GUESS_EXACT_NAME_BONUS;
    }

    score.max(0)
}

/// 검색 후보 점수
///
/// `text`는 제목+설명을 합쳐 소문자로 정리한 문자열, `brand_keywords`는
/// 소문자 브랜드명 목록(한글/영문)입니다. 호스트명 포함 검사에서는
/// 키워드의 공백을 제거해 비교합니다.
pub fn score_search_candidate(
    hostname: &str,
    text: &str,
    brand_keywords: &[String],
    is_domain_match: bool,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::new();

    if is_domain_match {
        breakdown.add("domain_match", scoring::DOMAIN_MATCH_BONUS);
    }

    // 브랜드 키워드가 호스트명에 포함 (최초 일치 1회만, 중복 가산 없음)
    for keyword in brand_keywords {
        let compact: String = keyword.split_whitespace().collect();
        if !compact.is_empty() && hostname.contains(&compact) {
            breakdown.add("host_keyword", scoring::HOST_KEYWORD_BONUS);
            break;
        }
    }

    if markers::OFFICIAL.iter().any(|m| text.contains(m)) {
        breakdown.add("official_marker", scoring::OFFICIAL_MARKER_BONUS);
    }

    if markers::BRAND.iter().any(|m| text.contains(m)) {
        breakdown.add("brand_marker", scoring::BRAND_MARKER_BONUS);
    }

    if hostname.ends_with(".co.kr") {
        breakdown.add("co_kr_suffix", scoring::CO_KR_SUFFIX_BONUS);
    } else if hostname.ends_with(".kr") {
        breakdown.add("kr_suffix", scoring::KR_SUFFIX_BONUS);
    } else if hostname.ends_with(".com") {
        breakdown.add("com_suffix", scoring::COM_SUFFIX_BONUS);
    }

    if markers::HOMEPAGE.iter().any(|m| text.contains(m)) {
        breakdown.add("homepage_marker", scoring::HOMEPAGE_MARKER_BONUS);
    }

    if markers::COMMERCE_TEXT.iter().any(|m| text.contains(m))
        || markers::COMMERCE_HOST.iter().any(|m| hostname.contains(m))
    {
        breakdown.add("commerce_penalty", -scoring::COMMERCE_PENALTY);
    }

    if markers::SOCIAL_HOST.iter().any(|m| hostname.contains(m))
        || markers::SOCIAL_TEXT.iter().any(|m| text.contains(m))
    {
        breakdown.add("social_penalty", -scoring::SOCIAL_PENALTY);
    }

    if !hostname.starts_with("www.") {
        breakdown.add("no_www", scoring::NO_WWW_BONUS);
    }

    breakdown.total = breakdown.total.max(0);
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_lowercase()).collect()
    }

    #[rstest]
    #[case("testbrand.co.kr", 0, 100 + 30 + 5 + 50)]
    #[case("www.testbrand.co.kr", 1, 99 + 30 + 50)]
    #[case("testbrand.kr", 2, 98 + 20 + 5 + 50)]
    #[case("testbrand.com", 3, 97 + 10 + 5 + 50)]
    #[case("shop.testbrand.com", 5, 95 + 10 + 5 + 50)]
    #[case("testbrandshop.co.kr", 7, 93 + 30 + 5)]
    fn guess_score_follows_pattern_priority(
        #[case] domain: &str,
        #[case] rank: usize,
        #[case] expected: i32,
    ) {
        assert_eq!(domain_guess_score(domain, "testbrand", rank), expected);
    }

    #[test]
    fn guess_score_is_deterministic() {
        let a = domain_guess_score("testbrand.co.kr", "testbrand", 0);
        let b = domain_guess_score("testbrand.co.kr", "testbrand", 0);
        assert_eq!(a, b);
    }

    #[test]
    fn search_score_collects_expected_contributions() {
        let breakdown = score_search_candidate(
            "birdy.co.kr",
            "버디 공식홈페이지 birdy",
            &keywords(&["버디", "birdy"]),
            false,
        );
        assert!(breakdown.has_part("host_keyword"));
        assert!(breakdown.has_part("official_marker"));
        assert!(breakdown.has_part("co_kr_suffix"));
        assert!(breakdown.has_part("homepage_marker"));
        assert!(breakdown.has_part("no_www"));
        assert_eq!(breakdown.total, 60 + 40 + 25 + 20 + 5);
    }

    #[test]
    fn host_keyword_bonus_is_awarded_once() {
        let breakdown = score_search_candidate(
            "birdybirdy.com",
            "",
            &keywords(&["birdy", "birdybirdy"]),
            false,
        );
        let host_parts =
            breakdown.parts.iter().filter(|p| p.label == "host_keyword").count();
        assert_eq!(host_parts, 1);
    }

    #[test]
    fn social_and_commerce_markers_subtract() {
        let breakdown = score_search_candidate(
            "blog.naver.com",
            "버디 인스타 쇼핑몰",
            &keywords(&["버디"]),
            false,
        );
        assert!(breakdown.has_part("commerce_penalty"));
        assert!(breakdown.has_part("social_penalty"));
        // 감점이 있어도 0 밑으로 내려가지 않는다
        assert!(breakdown.total >= 0);
    }

    #[test]
    fn whitespace_in_keywords_is_ignored_for_host_match() {
        let breakdown = score_search_candidate(
            "coolbrand.com",
            "",
            &keywords(&["cool brand"]),
            false,
        );
        assert!(breakdown.has_part("host_keyword"));
    }

    proptest! {
        /// 임의의 입력(빈 문자열 포함)에 대해 점수는 항상 0 이상이고 결정적이다
        #[test]
        fn search_score_is_non_negative_and_deterministic(
            hostname in ".{0,60}",
            text in ".{0,200}",
            keyword in ".{0,30}",
            domain_match in any::<bool>(),
        ) {
            let kws = vec![keyword.to_lowercase()];
            let first = score_search_candidate(&hostname, &text, &kws, domain_match);
            let second = score_search_candidate(&hostname, &text, &kws, domain_match);
            prop_assert!(first.total >= 0);
            prop_assert_eq!(first.total, second.total);
        }
    }
}
