//! `quiver dump`: print the full registry as JSON.

use crate::project::open_service;
use crate::GlobalArgs;

/// Runs the `quiver dump` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (service, _) = open_service(global)?;
    println!("{}", service.dump()?);
    Ok(0)
}
