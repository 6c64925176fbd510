//! The few places where the workspace logic depends on the host OS.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub trait Platform: Send + Sync {
    /// Resolves symlinks and returns an absolute path usable for prefix comparisons.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Program and flag used to run a test command line, e.g. `("sh", "-c")`.
    fn shell(&self) -> (&'static str, &'static str);

    fn prefers_windows_commands(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnixPlatform;

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsPlatform;

impl Platform for UnixPlatform {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn shell(&self) -> (&'static str, &'static str) {
        ("sh", "-c")
    }

    fn prefers_windows_commands(&self) -> bool {
        false
    }
}

impl Platform for WindowsPlatform {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path).map(strip_verbatim_prefix)
    }

    fn shell(&self) -> (&'static str, &'static str) {
        ("powershell", "-Command")
    }

    fn prefers_windows_commands(&self) -> bool {
        true
    }
}

/// Platform of the running binary.
pub fn native() -> &'static dyn Platform {
    #[cfg(windows)]
    {
        &WindowsPlatform
    }
    #[cfg(not(windows))]
    {
        &UnixPlatform
    }
}

/// `\\?\C:\foo` -> `C:\foo`, `\\?\UNC\server\share` -> `\\server\share`.
///
/// ```
/// use exo_core::workspace::platform::strip_verbatim_prefix;
/// use std::path::PathBuf;
///
/// assert_eq!(strip_verbatim_prefix(PathBuf::from(r"\\?\C:\ws")), PathBuf::from(r"C:\ws"));
/// assert_eq!(strip_verbatim_prefix(PathBuf::from(r"\\?\UNC\srv\ws")), PathBuf::from(r"\\srv\ws"));
/// assert_eq!(strip_verbatim_prefix(PathBuf::from("/home/ws")), PathBuf::from("/home/ws"));
/// ```
pub fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path
    };
    if let Some(rest) = s.strip_prefix(r"\\?\UNC\") {
        PathBuf::from(format!(r"\\{}", rest))
    } else if let Some(rest) = s.strip_prefix(r"\\?\") {
        PathBuf::from(rest)
    } else {
        path
    }
}
