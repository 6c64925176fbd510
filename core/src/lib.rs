pub mod action;
pub mod config;
pub mod interactive;
pub mod str_interp;
pub mod style;
pub mod workspace;

pub use crate::config::UserConfig;
pub use crate::workspace::Workspace;
