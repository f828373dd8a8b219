//! Logging system configuration and initialization
//!
//! 콘솔 출력과 일자별 파일 로그(tracing-appender)를 함께 구성합니다.
//! 타임스탬프는 KST(UTC+9) 기준으로 찍습니다.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use chrono::{FixedOffset, Utc};
use once_cell::sync::Lazy;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

// Global guard to keep the log file writer alive
static LOG_GUARDS: Lazy<Mutex<Vec<tracing_appender::non_blocking::WorkerGuard>>> =
    Lazy::new(|| Mutex::new(Vec::new()));

/// Custom time formatter for KST (Korea Standard Time, UTC+9)
struct KstTimeFormatter;

impl FormatTime for KstTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Utc::now();
        let kst_offset = FixedOffset::east_opt(9 * 3600).expect("valid fixed offset");
        let kst_time = now.with_timezone(&kst_offset);
        write!(w, "{}", kst_time.format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// 로깅 초기화
///
/// `RUST_LOG` 환경변수가 없으면 `info` 레벨로 동작합니다. `log_dir`가
/// 주어지면 일자별 회전 파일에도 기록합니다.
pub fn init_logging(log_dir: Option<&Path>) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer().with_timer(KstTimeFormatter).with_target(false);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|e| anyhow!("Failed to create log dir {}: {e}", dir.display()))?;
            let file_appender = tracing_appender::rolling::daily(dir, "collector.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            if let Ok(mut guards) = LOG_GUARDS.lock() {
                guards.push(guard);
            }

            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_timer(KstTimeFormatter)
                .with_writer(writer);

            Registry::default()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
        }
        None => {
            Registry::default()
                .with(env_filter)
                .with(console_layer)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
        }
    }

    Ok(())
}
