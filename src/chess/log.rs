use env_logger::Env;

/// Environment variable holding the log filter, e.g. `CHESS_LOG=debug`.
pub const LOG_ENV: &str = "CHESS_LOG";

const DEFAULT_FILTER: &str = "info";

/// Installs the global logger. Later calls are no-ops.
pub fn init() {
    let env = Env::default().filter_or(LOG_ENV, DEFAULT_FILTER);
    let _ = env_logger::Builder::from_env(env)
        .format_target(false)
        .try_init();
}
