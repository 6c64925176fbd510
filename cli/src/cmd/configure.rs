use std::path::PathBuf;

use anyhow::Context as _;
use colored::Colorize as _;
use exo_core::{action::redact_token, interactive::util::ask_password, print_success};
use exo_webclient::{ApiClient, Client as _};

use crate::{config::GlobalConfig, util};

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// API token (asked interactively when none is configured yet)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Directory where exercises are downloaded
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// API base URL
    #[arg(short, long)]
    pub api: Option<String>,

    /// Save without checking the token against the API
    #[arg(long)]
    pub no_verify: bool,

    /// Print the current configuration and exit
    #[arg(short, long)]
    pub show: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let mut cfg = GlobalConfig::from_file(global_args)?;

    if args.show {
        self::show(&cfg);
        return Ok(());
    }

    if let Some(token) = &args.token {
        cfg.user.token = token.trim().to_owned();
    } else if cfg.user.token.is_empty() {
        cfg.user.token = ask_password("API token")
            .context("Failed to read token")?
            .trim()
            .to_owned();
    }
    if let Some(ws) = &args.workspace {
        cfg.user.workspace = ws.clone();
    }
    if let Some(api) = &args.api {
        cfg.user.api_base_url = api.trim_end_matches('/').to_owned();
    }

    if !args.no_verify {
        let cli = ApiClient::new(cfg.client_context()?)?;
        cli.validate_token().await.map_err(|e| {
            if e.is_unauthorized() {
                anyhow::anyhow!("The token '{}' was rejected by {}", redact_token(&cfg.user.token), cfg.user.api_base_url)
            } else {
                anyhow::Error::new(e).context("Failed to validate token")
            }
        })?;
    }

    cfg.save()?;
    print_success!(
        "Saved configuration to {}",
        util::replace_homedir_to_tilde(cfg.filepath()).display()
    );
    self::show(&cfg);
    Ok(())
}

fn show(cfg: &GlobalConfig) {
    let rows = [
        ("Config file", util::replace_homedir_to_tilde(cfg.filepath()).display().to_string()),
        ("Token", redact_token(&cfg.user.token)),
        ("Workspace", cfg.user.workspace_dir().display().to_string()),
        ("API base URL", cfg.user.api_base_url.clone()),
    ];
    for (key, value) in rows {
        println!("{:>14}: {}", key.cyan().bold(), value);
    }
}
