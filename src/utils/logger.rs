use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// `RUST_LOG` wins over `default` when set.
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn cli_directive(verbose: bool) -> &'static str {
    if verbose {
        "contrib_chart=debug,info"
    } else {
        "contrib_chart=info"
    }
}

/// Directive for the server binary and the library it drives.
pub fn server_directive(log_level: Option<&str>) -> String {
    let level = log_level.unwrap_or("info");
    format!("contrib_chart={level},contrib_server={level}")
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(cli_directive(verbose)))
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}

/// JSON lines for the server; `log_level` comes from `[monitoring]`.
pub fn init_server_logger(log_level: Option<&str>) {
    tracing_subscriber::registry()
        .with(env_filter(&server_directive(log_level)))
        .with(
            fmt::layer()
                .with_target(true)
                .json(),
        )
        .init();
}
