use std::path::{Path, PathBuf};

use anyhow::Context as _;
use exo_core::{UserConfig, Workspace};
use exo_webclient::{ApiClient, ClientContext};
use serde::Deserialize;

use crate::cmd::GlobalArgs;

pub const APP_NAME: &str = "exo-cli";

/// `EXO_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnvOverrides {
    pub config_dir: Option<PathBuf>,
    pub token: Option<String>,
    pub workspace: Option<PathBuf>,
    pub api_base_url: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> anyhow::Result<Self> {
        envy::prefixed("EXO_")
            .from_env::<Self>()
            .context("Failed to load EXO_* environment variables")
    }

    pub fn apply(&self, cfg: &mut UserConfig) {
        if let Some(token) = &self.token {
            cfg.token = token.clone();
        }
        if let Some(ws) = &self.workspace {
            cfg.workspace = ws.clone();
        }
        if let Some(url) = &self.api_base_url {
            cfg.api_base_url = url.clone();
        }
    }
}

#[derive(Debug, Clone)]
pub struct GlobalConfig {
    pub config_dir: PathBuf,
    pub user: UserConfig,
}

impl GlobalConfig {
    /// `--config-dir`, then `EXO_CONFIG_DIR`, then the OS config dir.
    pub fn resolve_config_dir(
        arg: Option<&Path>,
        env: &EnvOverrides,
    ) -> anyhow::Result<PathBuf> {
        if let Some(dir) = arg.or(env.config_dir.as_deref()) {
            return Ok(dir.to_owned());
        }
        let dir = dirs::config_dir().context("Failed to get user's config dir path")?;
        Ok(dir.join(APP_NAME))
    }

    pub fn filepath(&self) -> PathBuf {
        self.config_dir.join(UserConfig::FILENAME)
    }

    /// The file only, without environment overrides. Used when the file is about to be rewritten.
    pub fn from_file(args: &GlobalArgs) -> anyhow::Result<Self> {
        let env = EnvOverrides::from_env()?;
        let config_dir = Self::resolve_config_dir(args.config_dir.as_deref(), &env)?;
        let user = UserConfig::load(config_dir.join(UserConfig::FILENAME))?;
        Ok(Self { config_dir, user })
    }

    pub fn from_file_and_env(args: &GlobalArgs) -> anyhow::Result<Self> {
        let mut cfg = Self::from_file(args)?;
        EnvOverrides::from_env()?.apply(&mut cfg.user);
        Ok(cfg)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.user.save(self.filepath())
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::new(self.user.workspace_dir())
    }

    pub fn client_context(&self) -> anyhow::Result<ClientContext> {
        ClientContext::new(
            &self.user.api_base_url,
            self.user.token.as_str(),
            env!("CARGO_PKG_VERSION"),
        )
        .with_context(|| format!("Invalid API base URL: {}", self.user.api_base_url))
    }

    /// Client for commands that need an authenticated user.
    pub fn api_client(&self) -> anyhow::Result<ApiClient> {
        anyhow::ensure!(
            !self.user.token.is_empty(),
            "No API token configured. Run `exo configure --token=<TOKEN>` first."
        );
        Ok(ApiClient::new(self.client_context()?)?)
    }
}
