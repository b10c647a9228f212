//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages from every crate
/// - `RUST_LOG=biblio_db=trace` - Trace the database crate only
/// - Default: warnings only; `-v` adds biblio info, `-vv` biblio debug
///
/// Logs go to stderr so listings on stdout stay pipeable.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,biblio=info",
        _ => "warn,biblio=debug,sqlx=info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for verbosity in 0..4 {
            let directives = default_directives(verbosity);
            assert!(EnvFilter::try_new(directives).is_ok(), "{directives}");
        }
        assert_eq!(default_directives(0), "warn");
        assert_eq!(default_directives(7), default_directives(2));
    }
}
