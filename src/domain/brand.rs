//! 브랜드 입력 및 수집 결과 엔티티
//!
//! 브랜드 목록 파일의 레코드(`BrandInput`)와 브랜드 하나에 대한 최종
//! 판정(`DiscoveryResult`)을 정의합니다. JSON 필드명은 기존 수집 결과
//! 파일과의 호환을 위해 camelCase를 사용합니다.

use serde::{Deserialize, Serialize};

use super::candidate::GuessedDomain;

/// 브랜드 목록 파일의 한 레코드
///
/// `brandName`은 필수이며 나머지는 선택입니다. 과거 내보내기 포맷의
/// 필드명(`name`, `englishName`, `sourceCategory`, `isBest`)도 alias로
/// 받아들입니다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrandInput {
    #[serde(alias = "name")]
    pub brand_name: String,

    #[serde(default, alias = "englishName")]
    pub brand_name_english: Option<String>,

    #[serde(default, alias = "sourceCategory")]
    pub category: Option<String>,

    #[serde(default, alias = "isBest")]
    pub is_featured: bool,
}

impl BrandInput {
    /// 처리 여부 판정에 쓰는 정체성 키 (소문자 + 공백 제거)
    pub fn identity_key(&self) -> String {
        normalize_brand_key(&self.brand_name)
    }

    /// 영문명이 실제로 존재하고 비어있지 않은 경우에만 반환
    pub fn english_name(&self) -> Option<&str> {
        self.brand_name_english
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// 브랜드명 정규화 (캐시 키 / 재시작 필터링 공용)
pub fn normalize_brand_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 웹사이트를 찾은 방법
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// 영문명 기반 도메인 추측 성공 (검색 API 미사용)
    DomainGuessed,
    /// Naver 웹문서 검색으로 발견
    NaverSearch,
    /// 발견 실패 또는 오류
    None,
}

impl SearchMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DomainGuessed => "domain_guessed",
            Self::NaverSearch => "naver_search",
            Self::None => "none",
        }
    }
}

/// 브랜드 하나의 처리 상태
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStatus {
    Found,
    NotFound,
    Error,
}

impl DiscoveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }
}

/// 브랜드 하나에 대한 최종 수집 결과 (체크포인트에 영속되는 단위)
///
/// 불변식: `primary_website`와 비어있지 않은 `websites`는
/// `status == Found`일 때에만 존재합니다. 생성자를 통해서만 만들어
/// 불변식을 지킵니다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    pub brand_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name_english: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub is_featured: bool,

    /// 발견한 웹사이트 URL (중복 제거, 삽입 순서 유지)
    #[serde(default)]
    pub websites: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_website: Option<String>,

    pub search_method: SearchMethod,

    /// 시도한 검색어 목록 (시도 순서 유지)
    #[serde(default)]
    pub search_queries: Vec<String>,

    /// 도메인 추측으로 확인된 후보 (진단용 점수 포함)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guessed_domains: Vec<GuessedDomain>,

    pub status: DiscoveryStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// 같은 런 안에서 캐시로부터 반환된 결과인지 여부
    #[serde(default, skip_serializing_if = "is_false")]
    pub from_cache: bool,
}

fn is_false(v: &bool) -> bool {
    !v
}

impl DiscoveryResult {
    fn base(brand: &BrandInput) -> Self {
        Self {
            brand_name: brand.brand_name.clone(),
            brand_name_english: brand.english_name().map(str::to_string),
            category: brand.category.clone(),
            is_featured: brand.is_featured,
            websites: Vec::new(),
            primary_website: None,
            search_method: SearchMethod::None,
            search_queries: Vec::new(),
            guessed_domains: Vec::new(),
            status: DiscoveryStatus::NotFound,
            error: None,
            from_cache: false,
        }
    }

    /// 도메인 추측 성공 결과
    pub fn guessed(brand: &BrandInput, guess: GuessedDomain) -> Self {
        let mut result = Self::base(brand);
        result.websites = vec![guess.url.clone()];
        result.primary_website = Some(guess.url.clone());
        result.guessed_domains = vec![guess];
        result.search_method = SearchMethod::DomainGuessed;
        result.status = DiscoveryStatus::Found;
        result
    }

    /// 검색으로 웹사이트를 발견한 결과 (`websites`는 비어있지 않아야 함)
    pub fn searched(brand: &BrandInput, websites: Vec<String>, queries: Vec<String>) -> Self {
        debug_assert!(!websites.is_empty());
        let mut result = Self::base(brand);
        result.primary_website = websites.first().cloned();
        result.websites = websites;
        result.search_queries = queries;
        result.search_method = SearchMethod::NaverSearch;
        result.status = DiscoveryStatus::Found;
        result
    }

    /// 모든 검색어를 소진하고도 찾지 못한 결과
    pub fn not_found(brand: &BrandInput, queries: Vec<String>) -> Self {
        let mut result = Self::base(brand);
        result.search_queries = queries;
        result
    }

    /// 처리 중 복구 불가능한 오류가 발생한 결과
    pub fn errored(brand: &BrandInput, queries: Vec<String>, detail: impl Into<String>) -> Self {
        let mut result = Self::base(brand);
        result.search_queries = queries;
        result.status = DiscoveryStatus::Error;
        result.error = Some(detail.into());
        result
    }

    pub fn identity_key(&self) -> String {
        normalize_brand_key(&self.brand_name)
    }

    pub fn is_found(&self) -> bool {
        self.status == DiscoveryStatus::Found
    }
}
