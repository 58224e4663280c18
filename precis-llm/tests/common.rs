use std::sync::OnceLock;

use precis_common::observability::{LogConfig, LogFormat};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

#[allow(dead_code)]
pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "precis-tests",
            emit_stderr: true,
            format: std::env::var("PRECIS_LOG_FORMAT")
                .map(|raw| LogFormat::parse(&raw))
                .unwrap_or(LogFormat::Text),
            default_filter: "debug".to_string(),
            ..LogConfig::default()
        };

        precis_common::observability::init_logging(config).unwrap_or_default()
    });
}
