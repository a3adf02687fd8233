//! `quiver check`: load every source root and list the packages found.
//!
//! Exits with 1 if any source unit failed to load, so the command can gate
//! a deployment on a clean source tree.

use quiver_registry::RegistryDump;

use crate::project::open_service;
use crate::GlobalArgs;

/// Runs the `quiver check` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (service, report) = open_service(global)?;
    let dump = service.registry().dump();

    if !global.quiet {
        print!("{}", render_listing(&dump));
    }
    for failure in &report.failures {
        eprintln!("error: {failure}");
    }
    if !global.quiet {
        eprintln!(
            "   Result: {} package(s), {} ignored file(s), {} failure(s)",
            dump.package_count(),
            report.not_packages.len(),
            report.failures.len()
        );
    }

    if report.is_clean() {
        Ok(0)
    } else {
        Ok(1)
    }
}

/// One line per package, grouped under a header per version scope.
fn render_listing(dump: &RegistryDump) -> String {
    let mut out = String::new();
    for scope in &dump.scopes {
        let indent = match &scope.version {
            Some(version) => {
                out.push_str(&format!("[{version}]\n"));
                "  "
            }
            None => "",
        };
        for package in &scope.packages {
            out.push_str(&format!(
                "{indent}{} {} {}\n",
                package.namespace(),
                package.content_hash(),
                package.source_path().display()
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_common::{Namespace, VersionLabel};
    use quiver_registry::{PackageRecord, Registry};

    #[test]
    fn listing_groups_by_version() {
        let registry = Registry::new();
        let v1 = VersionLabel::new("v1").unwrap();
        let a = PackageRecord::new(Namespace::new("a").unwrap(), "A;".into(), "src/a.js", vec![]);
        let hash = a.content_hash();
        registry.put(None, a.clone());
        registry.put(Some(&v1), a);

        let listing = render_listing(&registry.dump());
        assert_eq!(
            listing,
            format!("a {hash} src/a.js\n[v1]\n  a {hash} src/a.js\n")
        );
    }

    #[test]
    fn empty_registry_lists_nothing() {
        assert_eq!(render_listing(&Registry::new().dump()), "");
    }
}
