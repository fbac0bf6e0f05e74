use colored::*;
use log::LevelFilter;

/// Maps a configured level name to a filter, defaulting to `Warn`
pub fn parse_level(level: Option<&str>) -> LevelFilter {
    level
        .map(|level| match level.trim().to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => LevelFilter::Warn,
        })
        .unwrap_or(LevelFilter::Warn)
}

/// Installs env_logger on stderr. `RUST_LOG` still overrides the configured level.
pub fn init_logging(level: Option<&str>, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        parse_level(level)
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.to_string().to_lowercase()),
    )
    .format_timestamp(None)
    .init();
}

/// Reports an error to the user on stderr
pub fn log_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(Some("DEBUG")), LevelFilter::Debug);
        assert_eq!(parse_level(Some(" info ")), LevelFilter::Info);
        assert_eq!(parse_level(Some("off")), LevelFilter::Off);
        assert_eq!(parse_level(Some("loud")), LevelFilter::Warn);
        assert_eq!(parse_level(None), LevelFilter::Warn);
    }
}
