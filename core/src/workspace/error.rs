use std::{io, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not in workspace: {}", .0.display())]
    NotInWorkspace(PathBuf),

    #[error("exercise not found: {0}")]
    NotExist(String),

    #[error(
        "not in workspace: directory location may be case sensitive: workspace directory: {}, submit path: {}",
        .workspace.display(),
        .path.display()
    )]
    CaseMismatch { workspace: PathBuf, path: PathBuf },

    #[error("not an exercise directory (no metadata found): {}", .0.display())]
    MissingMetadata(PathBuf),

    #[error("cannot submit from more than one directory")]
    MoreThanOneDir,

    #[error("cannot mix files and a directory argument")]
    MixedFilesAndDir,

    #[error("files belong to more than one exercise")]
    FilesFromMultipleExercises,

    #[error("no `{0}` key in your `config.json`")]
    MissingConfigKey(&'static str),

    #[error("invalid test command: {0}")]
    InvalidTestCommand(#[from] crate::str_interp::InterpError),

    #[error(transparent)]
    Fs(#[from] fsutil::Error),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot walk workspace: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_exist(&self) -> bool {
        match self {
            Self::NotExist(_) => true,
            Self::Fs(e) => e.is_not_found(),
            Self::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            Self::Walk(e) => e
                .io_error()
                .map_or(false, |e| e.kind() == io::ErrorKind::NotFound),
            _ => false,
        }
    }

    pub fn is_not_in_workspace(&self) -> bool {
        matches!(self, Self::NotInWorkspace(_) | Self::CaseMismatch { .. })
    }

    pub fn is_missing_metadata(&self) -> bool {
        matches!(self, Self::MissingMetadata(_))
    }
}
