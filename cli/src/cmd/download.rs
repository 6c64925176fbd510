use anyhow::ensure;
use colored::Colorize as _;
use exo_core::{
    action,
    interactive::{spinner, SpinnerExt as _},
    print_success, style,
};
use exo_webclient::SolutionRequest;

use crate::config::GlobalConfig;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Exercise slug
    #[arg(short, long)]
    pub exercise: Option<String>,

    /// Track the exercise belongs to
    #[arg(short, long)]
    pub track: Option<String>,

    /// Team slug
    #[arg(short = 'T', long)]
    pub team: Option<String>,

    /// Solution UUID
    #[arg(short, long)]
    pub uuid: Option<String>,

    /// Overwrite existing files
    #[arg(short = 'F', long)]
    pub force: bool,
}

impl Args {
    pub fn solution_request(&self) -> anyhow::Result<SolutionRequest> {
        ensure!(
            self.exercise.is_some() != self.uuid.is_some(),
            "Specify exactly one of `--exercise` or `--uuid`"
        );
        if let Some(uuid) = &self.uuid {
            ensure!(
                self.track.is_none() && self.team.is_none(),
                "`--track` and `--team` can only be used with `--exercise`"
            );
            return Ok(SolutionRequest::by_uuid(uuid));
        }

        let mut req = SolutionRequest::by_exercise(self.exercise.as_deref().unwrap_or_default());
        if let Some(track) = &self.track {
            req = req.track(track);
        }
        if let Some(team) = &self.team {
            req = req.team(team);
        }
        Ok(req)
    }
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let req = args.solution_request()?;
    let cfg = GlobalConfig::from_file_and_env(global_args)?;
    let cli = cfg.api_client()?;
    let ws = cfg.workspace();

    let spinner = spinner("Downloading...").with_ticking();
    let res = action::download(&cli, &ws, &req, args.force).await;
    spinner.lock().await.finish_and_clear();
    let out = res?;

    for path in &out.skipped {
        log::warn!(
            "Kept existing {} (use --force to overwrite)",
            path.strip_prefix(out.dir()).unwrap_or(path).display()
        );
    }
    print_success!("Downloaded {}", out.metadata);
    println!("{}", style::dimmed_path(out.dir()));
    if !out.metadata.is_requester {
        println!("{}", "This is someone else's solution. Submitting is disabled.".yellow());
    }
    Ok(())
}
