use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `arena_orchestrator=debug`
pub const LOG_ENV: &str = "ARENA_LOG";

/// Install the global fmt subscriber writing to stderr, so stdout stays free
/// for snapshot output. Safe to call more than once.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
