use colored::{Color, ColoredString, Colorize};

#[macro_export]
macro_rules! print_success {
    ($fmt:literal, $($e:tt)*) => {{
        use ::colored::Colorize as _;
        println!("{}", format!($fmt, $($e)*).green())
    }}
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

/// Status of a reachability check, `"connected"` or an error message.
pub fn ping_status(status: &str) -> ColoredString {
    if status == "connected" {
        status.green()
    } else {
        status.bright_red()
    }
}

pub fn heading(s: &str) -> ColoredString {
    s.cyan().bold()
}

pub fn dimmed_path(path: impl AsRef<std::path::Path>) -> ColoredString {
    path.as_ref().display().to_string().bright_black()
}
