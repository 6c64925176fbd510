use std::{fmt, sync::Arc, time::Duration};
use tokio::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

pub mod util {
    use dialoguer::{theme::ColorfulTheme, Password, Select};
    use std::io;

    fn theme() -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn ask_password(prompt: &str) -> io::Result<String> {
        Password::with_theme(&theme())
            .with_prompt(prompt)
            .interact()
    }

    pub fn ask_select(prompt: &str, items: &[String]) -> io::Result<usize> {
        Select::with_theme(&theme())
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
    }
}

/// One entry of a selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub index: usize,
    pub label: String,
    pub value: T,
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.index + 1, self.label)
    }
}

impl<T> Choice<T> {
    /// Numbers `(label, value)` pairs from 0.
    pub fn enumerate<I>(items: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (String, T)>,
    {
        items
            .into_iter()
            .enumerate()
            .map(|(index, (label, value))| Self {
                index,
                label,
                value,
            })
            .collect()
    }
}

/// Lets the user pick one of `choices`. A single choice is returned without asking.
pub fn select<T>(prompt: &str, mut choices: Vec<Choice<T>>) -> anyhow::Result<T> {
    anyhow::ensure!(!choices.is_empty(), "Nothing to choose from");
    if choices.len() == 1 {
        return Ok(choices.remove(0).value);
    }
    let labels: Vec<String> = choices.iter().map(|c| c.label.clone()).collect();
    let picked = util::ask_select(prompt, &labels)?;
    let pos = choices
        .iter()
        .position(|c| c.index == picked)
        .unwrap_or(picked);
    anyhow::ensure!(pos < choices.len(), "Invalid selection");
    Ok(choices.swap_remove(pos).value)
}

pub fn spinner(msg: impl Into<std::borrow::Cow<'static, str>>) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    ProgressBar::new_spinner().with_style(style).with_message(msg)
}

pub trait SpinnerExt {
    fn with_ticking(self) -> Arc<Mutex<Self>>;
}

impl SpinnerExt for ProgressBar {
    fn with_ticking(self) -> Arc<Mutex<Self>> {
        let mutex_spinner = Arc::new(Mutex::new(self));
        let spinner = mutex_spinner.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(30)).await;
                let spinner = spinner.lock().await;
                if spinner.is_finished() {
                    break;
                }
                spinner.tick();
            }
        });
        mutex_spinner
    }
}
