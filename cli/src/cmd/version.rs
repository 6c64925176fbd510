use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {}

pub fn exec(_args: &Args, _global_args: &GlobalArgs) -> SubcmdResult {
    println!("exo {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
