//! Tracing subscriber setup

use tracing_subscriber::{
    filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Environment variable that overrides the log filter
pub const LOG_ENV: &str = "STUDIO_SESSION_LOG";

const VERBOSE_DIRECTIVE: &str = "studio_session=debug";

/// Filter used when neither `STUDIO_SESSION_LOG` nor `RUST_LOG` is set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVE
    } else {
        "studio_session=info"
    }
}

/// Directives from the environment, `STUDIO_SESSION_LOG` first
fn env_directives() -> Option<String> {
    std::env::var(LOG_ENV)
        .ok()
        .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok())
}

/// Build the filter; `-v` raises this crate to debug on top of any
/// environment directives
pub fn build_filter(directives: Option<&str>, verbose: bool) -> EnvFilter {
    let filter = directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter(verbose)));

    if !verbose {
        return filter;
    }
    match VERBOSE_DIRECTIVE.parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    let filter = build_filter(env_directives().as_deref(), verbose);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
