//! Application module - Run-wide state and reporting
//!
//! 런 컨텍스트(카운터/캐시/누적 결과)와 최종 보고서 집계를 담당합니다.

pub mod reporting;
pub mod run_state;

pub use reporting::CollectionReport;
pub use run_state::{RunContext, RunState};
