use std::error::Error;

use clap::Args;
use mct_task::SessionPolicy;
use serde::Serialize;

use super::print_json;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit extended metadata including the effective session policy.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo<'a> {
    name: &'static str,
    version: &'static str,
    policy: &'a SessionPolicy,
}

pub fn run(args: &VersionArgs, policy: &SessionPolicy) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    print_json(&VersionInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        policy,
    })
}
