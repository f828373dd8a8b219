//! Collector error taxonomy
//!
//! Fault classes follow the run-level policy: per-brand faults never abort a
//! batch, per-query faults never abort a brand, and only quota exhaustion is
//! fatal to the whole run.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CollectorError {
    #[error("brand record missing required field '{field}'")]
    ValidationFault { field: String },

    #[error("transient network fault: {message}")]
    TransientNetwork { message: String },

    #[error("search API rate limited, cooldown {cooldown_ms}ms")]
    RateLimited { cooldown_ms: u64 },

    #[error("daily API quota exceeded: {used}/{limit}")]
    QuotaExceeded { used: u32, limit: u32 },

    #[error("search API rejected query '{query}': {message}")]
    BadQuery { query: String, message: String },

    #[error("malformed input skipped: {message}")]
    MalformedInput { message: String },

    #[error("search API error {status}: {message}")]
    ApiFault { status: u16, message: String },

    #[error("{message}")]
    Unclassified { message: String },
}

impl CollectorError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::TransientNetwork { message: message.into() }
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::Unclassified { message: message.into() }
    }

    /// 이 오류가 런 전체를 중단시켜야 하는가 (쿼터 초과만 해당)
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// 쿼리 단위로 건너뛰고 다음 검색어를 시도해도 되는 오류인가
    pub fn is_query_scoped(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::BadQuery { .. }
                | Self::TransientNetwork { .. }
                | Self::ApiFault { .. }
        )
    }
}
