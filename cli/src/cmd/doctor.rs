use colored::Colorize as _;
use exo_core::{action, print_success, style};

use crate::config::GlobalConfig;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Migrate legacy metadata files
    #[arg(long)]
    pub fixup: bool,
}

pub fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = GlobalConfig::from_file_and_env(global_args)?;
    let ws = cfg.workspace();

    if args.fixup {
        let messages = action::fixup(&ws)?;
        for msg in &messages {
            println!("{}", msg);
        }
        print_success!("Fixed {} exercise(s)", messages.len());
        return Ok(());
    }

    let report = action::doctor(&ws)?;
    println!("{} {}", style::heading("Workspace:"), ws.dir.display());
    println!("{} {}", style::heading("Exercises:"), report.exercises);

    if !report.without_metadata.is_empty() {
        println!("{}", style::heading("Not downloaded with exo (no metadata):"));
        for ex in &report.without_metadata {
            println!("  {}", style::dimmed_path(ex.filepath()));
        }
    }
    if report.with_legacy_metadata.is_empty() {
        println!("{}", "No legacy metadata found.".green());
    } else {
        println!("{}", style::heading("Legacy metadata:"));
        for ex in &report.with_legacy_metadata {
            println!("  {}", ex.path());
        }
        println!("Run `exo doctor --fixup` to migrate.");
    }
    Ok(())
}
