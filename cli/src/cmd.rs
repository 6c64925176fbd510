pub mod configure;
pub mod doctor;
pub mod download;
pub mod open;
pub mod submit;
pub mod troubleshoot;
pub mod version;
pub mod workspace;

use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,

    /// Directory holding exo.toml [env: EXO_CONFIG_DIR]
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Print debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    Configure(configure::Args),

    #[command(alias("d"))]
    Download(download::Args),

    #[command(alias("s"))]
    Submit(submit::Args),

    #[command(alias("t"))]
    Test(test::Args),

    Workspace(workspace::Args),
    Open(open::Args),
    Doctor(doctor::Args),
    Troubleshoot(troubleshoot::Args),
    Version(version::Args),
}

pub type SubcmdResult = anyhow::Result<()>;

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Configure(args) => configure::exec(args, self).await,
            Download(args) => download::exec(args, self).await,
            Submit(args) => submit::exec(args, self).await,
            Test(args) => test::exec(args, self).await,
            Workspace(args) => workspace::exec(args, self),
            Open(args) => open::exec(args, self),
            Doctor(args) => doctor::exec(args, self),
            Troubleshoot(args) => troubleshoot::exec(args, self).await,
            Version(args) => version::exec(args, self),
        }
    }
}
