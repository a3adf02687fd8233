//! Quiver CLI: load package sources and answer dependency-aware requests.
//!
//! Provides `quiver check` for validating a source tree, `quiver resolve`
//! for computing the bundle a client needs given what it already caches,
//! and `quiver dump` for inspecting the registry.

#![warn(missing_docs)]

mod check;
mod dump;
mod logging;
mod project;
mod resolve;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Quiver: a dependency-aware package cache.
#[derive(Parser, Debug)]
#[command(name = "quiver", version, about = "Quiver package cache")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `quiver.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load every source root and list the packages found.
    Check,
    /// Resolve a package against a client cache.
    Resolve(ResolveArgs),
    /// Print the full registry as JSON.
    Dump,
}

/// Arguments for the `quiver resolve` subcommand.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Namespace (e.g. `app.Main`) or request path (e.g. `/app/Main/index.js`).
    pub target: String,

    /// Version scope to resolve in, overriding one taken from a request path.
    #[arg(long)]
    pub scope: Option<String>,

    /// A package the client already holds, as `NAMESPACE=HASH`. Repeatable.
    #[arg(long, value_name = "NAMESPACE=HASH")]
    pub have: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Bundle)]
    pub format: OutputFormat,
}

/// Output format for `quiver resolve`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The assembled bundle text.
    Bundle,
    /// A JSON object listing each package with its hash and code.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    logging::init(&global);

    let result = match cli.command {
        Command::Check => check::run(&global),
        Command::Resolve(ref args) => resolve::run(args, &global),
        Command::Dump => dump::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["quiver", "check"]);
        assert!(matches!(cli.command, Command::Check));
    }

    #[test]
    fn parse_dump() {
        let cli = Cli::parse_from(["quiver", "dump"]);
        assert!(matches!(cli.command, Command::Dump));
    }

    #[test]
    fn parse_resolve_default() {
        let cli = Cli::parse_from(["quiver", "resolve", "app.Main"]);
        match cli.command {
            Command::Resolve(ref args) => {
                assert_eq!(args.target, "app.Main");
                assert!(args.scope.is_none());
                assert!(args.have.is_empty());
                assert_eq!(args.format, OutputFormat::Bundle);
            }
            _ => panic!("expected Resolve command"),
        }
    }

    #[test]
    fn parse_resolve_with_args() {
        let cli = Cli::parse_from([
            "quiver",
            "resolve",
            "/v1/app/Main/index.js",
            "--scope",
            "v2",
            "--have",
            "lib.Log=00",
            "--have",
            "lib.Dom=11",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Resolve(ref args) => {
                assert_eq!(args.target, "/v1/app/Main/index.js");
                assert_eq!(args.scope.as_deref(), Some("v2"));
                assert_eq!(args.have, vec!["lib.Log=00", "lib.Dom=11"]);
                assert_eq!(args.format, OutputFormat::Json);
            }
            _ => panic!("expected Resolve command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["quiver", "--quiet", "check"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["quiver", "dump", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["quiver", "--config", "/srv/quiver.toml", "check"]);
        assert_eq!(cli.config.as_deref(), Some("/srv/quiver.toml"));
    }

    #[test]
    fn resolve_requires_target() {
        assert!(Cli::try_parse_from(["quiver", "resolve"]).is_err());
    }
}
