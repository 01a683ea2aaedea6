//! Tracing setup for the command-line front end.
//!
//! `RUST_LOG` always wins; otherwise the `--log` flag or the link file's
//! `log` key; otherwise `warn`. Logs go to stderr so stdout stays clean
//! for command output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Calling it twice is harmless: the
/// second call leaves the first subscriber in place.
pub fn init_logging(filter: Option<&str>) {
    let directive = choose_directive(std::env::var("RUST_LOG").ok(), filter);
    let env_filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        eprintln!("warning: invalid log filter '{}', using '{}'", directive, DEFAULT_FILTER);
        EnvFilter::new(DEFAULT_FILTER)
    });

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr)
                .with_ansi(std::env::var_os("NO_COLOR").is_none()),
        )
        .with(env_filter)
        .try_init();
}

fn choose_directive(env: Option<String>, configured: Option<&str>) -> String {
    match (env, configured) {
        (Some(env), _) if !env.trim().is_empty() => env,
        (_, Some(configured)) => configured.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}
