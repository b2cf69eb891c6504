use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber for the `bizmentor` binary.
///
/// `--verbose` turns on debug output for this crate only; `RUST_LOG`
/// overrides the filter for everything else.
pub fn init_logging(verbose: bool) {
    let crate_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    let crate_filter = Targets::new().with_target(env!("CARGO_CRATE_NAME"), crate_level);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(crate_level.to_string().to_lowercase()));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_target(verbose))
        .with(crate_filter)
        .with(env_filter)
        .init();
}
