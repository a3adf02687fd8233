//! Diagnostic logging setup for the CLI.
//!
//! Library crates emit `tracing` events; the CLI installs one subscriber
//! writing compact lines to stderr, so stdout carries only command output.

use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// Filter used when neither a flag nor `RUST_LOG` picks a level.
const DEFAULT_FILTER: &str = "quiver=info";

/// Installs the global subscriber.
///
/// `--quiet` and `--verbose` take precedence over `RUST_LOG`, which takes
/// precedence over the default of `info` for quiver's own crates.
pub fn init(global: &GlobalArgs) {
    let filter = match flag_filter(global) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn flag_filter(global: &GlobalArgs) -> Option<&'static str> {
    if global.quiet {
        Some("quiver=error")
    } else if global.verbose {
        Some("quiver=debug")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(quiet: bool, verbose: bool) -> GlobalArgs {
        GlobalArgs {
            quiet,
            verbose,
            config: None,
        }
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(flag_filter(&global(true, true)), Some("quiver=error"));
    }

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(flag_filter(&global(false, true)), Some("quiver=debug"));
    }

    #[test]
    fn no_flags_defers_to_environment() {
        assert_eq!(flag_filter(&global(false, false)), None);
    }
}
