//! 도메인 상수 정의
//!
//! Naver 검색 API 제약, 도메인 추측 패턴, 점수 계산에 사용되는
//! 비즈니스 도메인 상수들을 정의합니다.

/// Naver 검색 API 관련 상수들
pub mod naver {
    /// 웹문서 검색 엔드포인트
    pub const SEARCH_ENDPOINT: &str = "https://openapi.naver.com/v1/search/webkr.json";

    /// 검색 결과 요청 개수 (최대 100)
    pub const DEFAULT_DISPLAY: u32 = 20;

    /// 일일 API 요청 제한 (Naver 정책: 25,000건)
    pub const DAILY_QUOTA_LIMIT: u32 = 25_000;

    /// 초당 요청 수 제한 (정책상 10건, 안전하게 8건)
    pub const REQUESTS_PER_SECOND: u32 = 8;

    /// 429 응답 후 대기 시간 (밀리초)
    pub const RATE_LIMIT_COOLDOWN_MS: u64 = 5_000;

    /// 검색 요청 타임아웃 (밀리초)
    pub const REQUEST_TIMEOUT_MS: u64 = 10_000;
}

/// 도메인 존재 확인 관련 상수들
pub mod probing {
    /// HEAD 요청 타임아웃 (밀리초)
    pub const PROBE_TIMEOUT_MS: u64 = 5_000;

    /// 리다이렉트 추적 최대 횟수
    pub const MAX_REDIRECTS: usize = 5;

    /// 도메인 확인 간 대기 시간 (밀리초)
    pub const PROBE_DELAY_MS: u64 = 200;

    /// 프로브/검색 공용 User-Agent
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
}

/// 배치 처리 기본값들
pub mod batching {
    /// 기본 배치 크기
    pub const DEFAULT_BATCH_SIZE: usize = 50;

    /// 체크포인트 저장 주기 (배치 단위)
    pub const CHECKPOINT_INTERVAL_BATCHES: usize = 10;

    /// 배치 간 최소 대기 시간 (밀리초)
    pub const MIN_BATCH_DELAY_MS: u64 = 3_000;

    /// 배치 간 대기 = max(브랜드 간 대기 x FACTOR, MIN_BATCH_DELAY_MS)
    pub const BATCH_DELAY_FACTOR: u64 = 5;
}

/// 후보 점수 계산에 사용되는 가중치들
pub mod scoring {
    /// 도메인 추측 점수: 패턴 우선순위 기준점 (base = PATTERN_BASE - rank)
    pub const PATTERN_BASE: i32 = 100;
    pub const GUESS_CO_KR_BONUS: i32 = 30;
    pub const GUESS_KR_BONUS: i32 = 20;
    pub const GUESS_COM_BONUS: i32 = 10;
    pub const GUESS_NO_WWW_BONUS: i32 = 5;
    /// 정규화된 브랜드명이 호스트명 선두/구분 세그먼트로 일치
    pub const GUESS_EXACT_NAME_BONUS: i32 = 50;

    /// 검색 후보 점수: 영문 브랜드명이 호스트명에 포함 (도메인 매치)
    pub const DOMAIN_MATCH_BONUS: i32 = 100;
    /// 브랜드 키워드가 호스트명에 포함 (최초 1회만)
    pub const HOST_KEYWORD_BONUS: i32 = 60;
    pub const OFFICIAL_MARKER_BONUS: i32 = 40;
    pub const BRAND_MARKER_BONUS: i32 = 30;
    pub const CO_KR_SUFFIX_BONUS: i32 = 25;
    pub const KR_SUFFIX_BONUS: i32 = 20;
    pub const COM_SUFFIX_BONUS: i32 = 10;
    pub const HOMEPAGE_MARKER_BONUS: i32 = 20;
    pub const COMMERCE_PENALTY: i32 = 10;
    pub const SOCIAL_PENALTY: i32 = 20;
    pub const NO_WWW_BONUS: i32 = 5;
}

/// 제목/설명/호스트명 분류에 사용되는 마커 단어들
pub mod markers {
    /// 공식 사이트 판별 휴리스틱에서 함께 쓰는 전체 마커
    pub const OFFICIAL_LIKELY: [&str; 6] =
        ["공식", "브랜드", "홈페이지", "official", "brand", "homepage"];

    pub const OFFICIAL: [&str; 2] = ["공식", "official"];
    pub const BRAND: [&str; 2] = ["브랜드", "brand"];
    pub const HOMEPAGE: [&str; 4] = ["홈페이지", "homepage", "메인", "main"];

    /// 쇼핑몰 감점 대상 (텍스트)
    pub const COMMERCE_TEXT: [&str; 4] = ["쇼핑몰", "쇼핑", "shop", "store"];
    /// 쇼핑몰 감점 대상 (호스트명)
    pub const COMMERCE_HOST: [&str; 2] = ["shop", "store"];

    /// 소셜/블로그 감점 대상 (호스트명)
    pub const SOCIAL_HOST: [&str; 4] = ["blog", "instagram", "facebook", "naver.com"];
    /// 소셜/블로그 감점 대상 (텍스트)
    pub const SOCIAL_TEXT: [&str; 2] = ["블로그", "인스타"];
}

/// 호스트명 분류에 사용되는 도메인 목록들
pub mod domains {
    /// 공식 홈페이지로 인정하는 도메인 접미사 (한국 도메인 우선)
    pub const RECOGNIZED_SUFFIXES: [&str; 4] = [".co.kr", ".com", ".kr", ".net"];

    /// 제외할 도메인들 (포털, 쇼핑몰, 소셜 등) - 호스트명 부분 일치로 판정
    pub const EXCLUDED_HOSTS: [&str; 14] = [
        "naver.com",
        "daum.net",
        "google.com",
        "youtube.com",
        "instagram.com",
        "facebook.com",
        "twitter.com",
        "musinsa.com",
        "ably.co.kr",
        "29cm.co.kr",
        "zigzag.kr",
        "brandi.co.kr",
        "styleshare.kr",
        "wconcept.co.kr",
    ];
}
