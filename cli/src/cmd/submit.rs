use colored::Colorize as _;
use exo_core::{
    action,
    interactive::{self, spinner, SpinnerExt as _},
    print_success,
    workspace::Transmission,
};

use crate::config::GlobalConfig;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Files, one exercise directory, or an exercise name.
    /// Defaults to the exercise containing the current directory.
    #[arg()]
    pub targets: Vec<String>,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = GlobalConfig::from_file_and_env(global_args)?;
    let ws = cfg.workspace();
    let cli = cfg.api_client()?;

    let tx = Transmission::new(&ws, &args.targets)?;
    let dir = action::resolve_submit_dir(&ws, &tx, |choices| {
        interactive::select("Which exercise do you want to submit?", choices)
    })?;
    let docs = action::collect_documents(&dir, &tx.files)?;
    for doc in &docs {
        log::debug!("Submitting {}", doc.path());
    }

    let spinner = spinner("Submitting...").with_ticking();
    let res = action::submit(&cli, &dir, &docs).await;
    spinner.lock().await.finish_and_clear();
    let metadata = res?;

    print_success!(
        "Submitted {} file(s) of {}",
        docs.len(),
        metadata
    );
    if !metadata.url.is_empty() {
        println!("Your solution is at\n  {}", metadata.url.cyan());
    }
    Ok(())
}
