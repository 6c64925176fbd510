use std::path::PathBuf;

use exo_core::action;

use crate::{config::GlobalConfig, util};

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Any path inside a downloaded exercise. Defaults to the current directory.
    #[arg()]
    pub path: Option<PathBuf>,
}

pub fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = GlobalConfig::from_file_and_env(global_args)?;
    let path = match &args.path {
        Some(p) => fsutil::absolute_path(p)?,
        None => util::current_dir()?,
    };
    println!("{}", action::solution_url(&cfg.workspace(), &path)?);
    Ok(())
}
