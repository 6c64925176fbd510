use std::path::{Path, PathBuf};
use std::result::Result as StdResult;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Persisted user settings, stored as TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub token: String,
    pub workspace: PathBuf,
    pub api_base_url: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            workspace: Self::default_workspace(),
            api_base_url: Self::DEFAULT_API_BASE_URL.to_owned(),
        }
    }
}

impl UserConfig {
    pub const FILENAME: &str = "exo.toml";
    pub const DEFAULT_API_BASE_URL: &str = "https://api.exercism.org/v1";

    pub fn default_workspace() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Exercism")
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// A missing file yields the default config.
    pub fn load(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let toml = match fsutil::read_to_string(filepath) {
            Ok(s) => s,
            Err(e) if e.is_not_found() => return Ok(Self::default()),
            Err(e) => return Err(e).context("Cannot read config file"),
        };
        Self::from_toml(&toml).with_context(|| format!("Invalid config TOML: {:?}", filepath))
    }

    /// The file holds the API token, so it is written owner-only.
    pub fn save(&self, filepath: impl AsRef<Path>) -> anyhow::Result<()> {
        let toml = toml::to_string_pretty(self).context("Cannot serialize config")?;
        fsutil::write_private_with_mkdir(filepath, toml).context("Cannot save config file")
    }

    /// Workspace path with a leading `~` expanded.
    pub fn workspace_dir(&self) -> PathBuf {
        self::expand_home(&self.workspace, dirs::home_dir().as_deref())
    }
}

/// ```
/// use exo_core::config::expand_home;
/// use std::path::Path;
///
/// let home = Some(Path::new("/home/alice"));
/// assert_eq!(expand_home("~/Exercism", home), Path::new("/home/alice/Exercism"));
/// assert_eq!(expand_home("~", home), Path::new("/home/alice"));
/// assert_eq!(expand_home("/srv/~ws", home), Path::new("/srv/~ws"));
/// assert_eq!(expand_home("~/Exercism", None), Path::new("~/Exercism"));
/// ```
pub fn expand_home(path: impl AsRef<Path>, home: Option<&Path>) -> PathBuf {
    let path = path.as_ref();
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_owned(),
    }
}
