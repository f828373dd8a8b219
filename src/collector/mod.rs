//! Collector engine - discovery and ranking pipeline
//!
//! 도메인 추측, 검색 폴백, 점수/순위 결정, 브랜드 단위 오케스트레이션,
//! 배치 스케줄링까지 수집의 핵심 로직을 담습니다. 네트워크/저장소는
//! `domain::services`의 트레이트를 통해서만 접근합니다.

pub mod domain_guess;
pub mod extractor;
pub mod orchestrator;
pub mod queries;
pub mod scheduler;
pub mod scoring;

pub use orchestrator::{DiscoveryOrchestrator, DiscoveryTuning};
pub use scheduler::{BatchScheduler, SchedulerConfig, filter_unprocessed};
