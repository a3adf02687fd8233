//! `quiver resolve`: compute what a client is missing for a package.
//!
//! The target is either a namespace (`app.ui.Button`) or a request path
//! (`/app/ui/Button/index.js`, with a leading version segment when the
//! project is versioned). The client cache is given as repeated
//! `--have NAMESPACE=HASH` pairs.

use quiver_common::{ContentHash, Namespace, VersionLabel};
use quiver_service::ResolveRequest;

use crate::project::open_service;
use crate::{GlobalArgs, OutputFormat, ResolveArgs};

/// Runs the `quiver resolve` command.
pub fn run(args: &ResolveArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (service, _) = open_service(global)?;
    let request = build_request(args, service.config().sources.versioning)?;

    match args.format {
        OutputFormat::Bundle => {
            let bundle = service.bundle(&request);
            println!("{}", bundle.text);
            if !global.quiet {
                eprintln!("   Delivered {} package(s)", bundle.manifest.len());
            }
        }
        OutputFormat::Json => {
            let response = service.resolve(&request);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(0)
}

/// Builds the resolve request described by the command-line arguments.
fn build_request(
    args: &ResolveArgs,
    versioned: bool,
) -> Result<ResolveRequest, Box<dyn std::error::Error>> {
    let mut request = if args.target.starts_with('/') {
        ResolveRequest::from_url(&args.target, versioned)?
    } else {
        ResolveRequest::new(Namespace::new(args.target.as_str())?)
    };
    if let Some(ref scope) = args.scope {
        request.version = Some(VersionLabel::new(scope.as_str())?);
    }
    for pair in &args.have {
        let (namespace, hash) = pair
            .split_once('=')
            .ok_or_else(|| format!("--have expects NAMESPACE=HASH, got '{pair}'"))?;
        Namespace::new(namespace)?;
        hash.parse::<ContentHash>()?;
        request = request.with_cached(namespace, hash);
    }
    Ok(request)
}
