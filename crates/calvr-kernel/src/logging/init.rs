use std::sync::Once;

use calvr_config::ConfigTree;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "calvr_kernel::zones=trace,wgpu=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Reads `Logging.filter` and `Logging.color` (`auto|always|never`).
    pub fn from_config(cfg: &ConfigTree) -> Self {
        let write_style = match cfg.get_str("Logging.color", "auto") {
            "always" => env_logger::WriteStyle::Always,
            "never" => env_logger::WriteStyle::Never,
            _ => env_logger::WriteStyle::Auto,
        };
        Self {
            env_filter: cfg.try_str("Logging.filter").map(str::to_owned),
            write_style,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Call early in `main`, before the kernel
/// reads its configuration, so settings warnings are visible.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
            // wgpu is chatty at info.
            builder.filter_module("wgpu_core", log::LevelFilter::Warn);
            builder.filter_module("wgpu_hal", log::LevelFilter::Warn);
        }

        builder.write_style(config.write_style);
        builder.format_timestamp_millis();
        builder.init();

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_filter_and_color() {
        let cfg = calvr_config::parse_str(r#"Logging { filter: "debug"  color: never }"#).unwrap();
        let lc = LoggingConfig::from_config(&cfg);
        assert_eq!(lc.env_filter.as_deref(), Some("debug"));
        assert!(matches!(lc.write_style, env_logger::WriteStyle::Never));
    }

    #[test]
    fn missing_section_is_default() {
        let lc = LoggingConfig::from_config(&ConfigTree::default());
        assert!(lc.env_filter.is_none());
        assert!(matches!(lc.write_style, env_logger::WriteStyle::Auto));
    }
}
