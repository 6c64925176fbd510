use std::fmt::{self, Write as _};

use exo_core::{action, style};
use exo_webclient::PingResult;

use crate::{config::GlobalConfig, util};

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Show the API token unredacted
    #[arg(long)]
    pub full_api_key: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = GlobalConfig::from_file_and_env(global_args)?;
    let ctx = cfg.client_context()?;
    let pings = action::ping_services(&ctx, action::default_ping_targets(&ctx)).await;
    print!("{}", self::render(&cfg, args.full_api_key, &pings)?);
    Ok(())
}

fn render(cfg: &GlobalConfig, full_api_key: bool, pings: &[PingResult]) -> Result<String, fmt::Error> {
    let token = if full_api_key {
        cfg.user.token.clone()
    } else {
        action::redact_token(&cfg.user.token)
    };

    let mut s = String::new();
    writeln!(s, "{}", style::heading("Troubleshooting Information"))?;
    writeln!(s, "\nVersion\n  Current: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        s,
        "\nOperating System\n  OS:           {}\n  Architecture: {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    )?;
    writeln!(
        s,
        "\nConfiguration\n  Home:      {}\n  Workspace: {}\n  Config:    {}\n  API key:   {}",
        dirs::home_dir().map(|h| h.display().to_string()).unwrap_or_default(),
        cfg.user.workspace_dir().display(),
        util::replace_homedir_to_tilde(cfg.filepath()).display(),
        if token.is_empty() { "<not configured>".to_owned() } else { token },
    )?;
    writeln!(s, "\nAPI Reachability")?;
    for p in pings {
        writeln!(
            s,
            "\n  {}:\n    * {}\n    * [{}]\n    * {}ms",
            p.service,
            p.url,
            style::ping_status(&p.status),
            p.latency.as_millis()
        )?;
    }
    Ok(s)
}

#[cfg(test)]
mod test {
    use super::*;
    use exo_core::UserConfig;
    use std::time::Duration;

    fn cfg(token: &str) -> GlobalConfig {
        GlobalConfig {
            config_dir: "/etc/exo".into(),
            user: UserConfig {
                token: token.to_owned(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn token_is_redacted_unless_asked() {
        colored::control::set_override(false);
        let pings = [PingResult {
            service: "API".to_owned(),
            url: "https://api.example.com/v1/ping".to_owned(),
            status: "connected".to_owned(),
            latency: Duration::from_millis(12),
        }];

        let out = render(&cfg("abcd1234efgh5678"), false, &pings).unwrap();
        assert!(out.contains("abcd********5678"));
        assert!(!out.contains("abcd1234efgh5678"));
        assert!(out.contains("[connected]"));
        assert!(out.contains("12ms"));

        let out = render(&cfg("abcd1234efgh5678"), true, &pings).unwrap();
        assert!(out.contains("abcd1234efgh5678"));

        let out = render(&cfg(""), false, &[]).unwrap();
        assert!(out.contains("<not configured>"));
    }
}
