use log::LevelFilter;

/// Initializes `env_logger` at `level`; `RUST_LOG` still applies per module.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}

/// Maps repeated `-v` flags to a level filter.
pub fn level_for(verbosity: u64) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[test]
fn verbosity_levels() {
    assert_eq!(level_for(0), LevelFilter::Info);
    assert_eq!(level_for(1), LevelFilter::Debug);
    assert_eq!(level_for(5), LevelFilter::Trace);
}
