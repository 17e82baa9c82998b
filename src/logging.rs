use tracing_subscriber::EnvFilter;

pub(crate) const LOG_ENV: &str = "AMIDAKUJI_LOG";

/// Installs a stderr subscriber. `AMIDAKUJI_LOG` wins over `-v` flags.
pub(crate) fn init(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
