//! Subscriber setup for the `quotes` binary

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "quotes=info,quote_core=info,quote_sync=info,warn";

/// Filter used with `--verbose`
pub const VERBOSE_FILTER: &str = "quotes=debug,quote_core=debug,quote_sync=debug,quote_store=debug,quote_composition=debug,info";

/// Log output options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Raise the default filter to debug
    pub verbose: bool,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

/// Filter for `options`; `RUST_LOG` wins unless `--verbose` was given
#[must_use]
pub fn env_filter(options: LogOptions) -> EnvFilter {
    if options.verbose {
        return EnvFilter::new(VERBOSE_FILTER);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to stderr
///
/// Returns `false` if a subscriber was already installed.
pub fn init_logging(options: LogOptions) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(options))
        .with_writer(std::io::stderr)
        .with_target(options.verbose);

    let installed = if options.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    if installed {
        tracing::debug!(?options, "logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_overrides_environment() {
        let filter = env_filter(LogOptions {
            verbose: true,
            json: false,
        });
        assert!(filter.to_string().contains("quotes=debug"));
    }
}
