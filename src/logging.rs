//! Diagnostic logging setup.
//!
//! Tool output goes to stdout; diagnostics go to stderr through `tracing`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "swarm_docs=debug,warn"
    } else {
        "swarm_docs=warn"
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_crate_level() {
        assert_eq!(default_directive(false), "swarm_docs=warn");
        assert!(default_directive(true).starts_with("swarm_docs=debug"));
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
    }
}
