use crate::config::GlobalConfig;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {}

pub fn exec(_args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = GlobalConfig::from_file_and_env(global_args)?;
    println!("{}", cfg.workspace().dir.display());
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::cmd::GlobalArgs;
    use clap::{CommandFactory as _, Parser as _};
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_valid() {
        GlobalArgs::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = GlobalArgs::parse_from(["exo", "workspace", "-v", "--config-dir", "/tmp/x"]);
        assert!(args.verbose);
        assert_eq!(args.config_dir, Some(PathBuf::from("/tmp/x")));
    }
}
