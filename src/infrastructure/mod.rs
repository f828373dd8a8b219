//! Infrastructure module - External world adapters
//!
//! HTTP 프로브, Naver 검색 클라이언트, 체크포인트 저장소, 설정/로깅,
//! 입출력 파일 처리 등 외부 세계와 맞닿는 구현을 담습니다.

pub mod brand_loader;
pub mod checkpoint;
pub mod config;
pub mod export;
pub mod http_prober;
pub mod logging;
pub mod naver_client;

pub use checkpoint::FileCheckpointStore;
pub use config::AppConfig;
pub use export::ReportExporter;
pub use http_prober::{HttpDomainProber, ProbeConfig};
pub use naver_client::{NaverApiConfig, NaverSearchClient, RateLimitConfig};
