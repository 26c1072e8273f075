mod app;

use app::TelosApp;
use telos::config::{log_filter_directives, DEFAULT_LOG_FILTER, LOG_ENV};
use tracing_subscriber::EnvFilter;

fn main() {
    let directives = log_filter_directives(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
    );
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!("Ignoring log filter {directives:?}: {err}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app = TelosApp::new();
    std::process::exit(app.run());
}
