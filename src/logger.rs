use log::LevelFilter;

/// Resolve the active filter spec: an explicit `RUST_LOG` value wins over
/// the CLI level, so `RUST_LOG=emberpath=trace` works without touching the
/// command line.
fn filter_spec(cli_level: LevelFilter, env_spec: Option<String>) -> String {
    env_spec.unwrap_or_else(|| cli_level.to_string())
}

/// Initialize logging from the CLI level, honoring `RUST_LOG` overrides.
pub fn init_logger(cli_level: LevelFilter) {
    let spec = filter_spec(cli_level, std::env::var("RUST_LOG").ok());
    env_logger::Builder::new().parse_filters(&spec).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_env_spec_wins_over_the_cli_level() {
        let spec = filter_spec(LevelFilter::Info, Some("emberpath=debug".to_string()));
        assert_eq!(spec, "emberpath=debug");
    }

    #[test]
    fn cli_level_is_used_when_the_env_is_unset() {
        assert_eq!(filter_spec(LevelFilter::Warn, None), "WARN");
        assert_eq!(filter_spec(LevelFilter::Trace, None), "TRACE");
    }
}
