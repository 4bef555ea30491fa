use std::io::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter override, read instead of `RUST_LOG` so a test run's global log
/// level does not flood the echo output.
pub const LOG_ENV: &str = "MOCK_SERVER_LOG";

/// Echo handlers log at debug; everything else (hyper, axum) stays at warn.
pub const DEFAULT_DIRECTIVES: &str = "mock_server=debug,warn";

fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Targetless compact lines on a terminal so each echo fits one line;
/// flattened JSON with the current span otherwise.
pub fn init() {
    let directives = std::env::var(LOG_ENV).ok();
    let (compact, json) = if std::io::stdout().is_terminal() {
        (
            Some(tracing_subscriber::fmt::layer().compact().with_target(false)),
            None,
        )
    } else {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false),
            ),
        )
    };
    Registry::default()
        .with(filter(directives.as_deref()))
        .with(compact)
        .with(json)
        .init();
}
