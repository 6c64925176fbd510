use std::{collections::HashMap, path::Path};

use maplit::hashmap;
use once_cell::{sync::Lazy, unsync::OnceCell};

use super::{
    error::Result,
    ExerciseConfig, Platform,
};
use crate::str_interp::interp;

/// How to run the tests of one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestConfiguration {
    /// May contain `{{solution_files}}` and `{{test_files}}`.
    pub command: &'static str,
    /// Used instead of `command` on Windows when non-empty.
    pub windows_command: &'static str,
}

impl TestConfiguration {
    const fn new(command: &'static str) -> Self {
        Self {
            command,
            windows_command: "",
        }
    }

    const fn with_windows(command: &'static str, windows_command: &'static str) -> Self {
        Self {
            command,
            windows_command,
        }
    }

    pub fn for_track(track: &str) -> Option<&'static Self> {
        TEST_CONFIGURATIONS.get(track)
    }

    pub fn raw_command(&self, platform: &dyn Platform) -> &'static str {
        if platform.prefers_windows_commands() && !self.windows_command.is_empty() {
            self.windows_command
        } else {
            self.command
        }
    }

    /// The command line to run inside `exercise_dir`, with placeholders filled in
    /// from the exercise's `.exercism/config.json`. The config is read only when needed.
    pub fn command_for(&self, exercise_dir: impl AsRef<Path>, platform: &dyn Platform) -> Result<String> {
        let cmd = self.raw_command(platform);
        if !cmd.contains("{{") {
            return Ok(cmd.to_owned());
        }

        let cell = OnceCell::new();
        let config = || cell.get_or_try_init(|| ExerciseConfig::read(exercise_dir.as_ref()));

        let mut vars = HashMap::new();
        if cmd.contains("solution_files") {
            vars.insert("solution_files", config()?.solution_files()?.join(" "));
        }
        if cmd.contains("test_files") {
            vars.insert("test_files", config()?.test_files()?.join(" "));
        }
        Ok(interp(cmd, &vars)?)
    }
}

pub static TEST_CONFIGURATIONS: Lazy<HashMap<&'static str, TestConfiguration>> = Lazy::new(|| {
    use TestConfiguration as T;
    hashmap! {
        "8th" => T::with_windows("tester.sh", "tester.bat"),
        "ballerina" => T::new("bal test"),
        "bash" => T::new("bats {{test_files}}"),
        "c" => T::new("make"),
        "cfml" => T::new("box task run TestRunner"),
        "cobol" => T::with_windows("test.sh", "test.ps1"),
        "coffeescript" => T::new("jasmine-node --coffee {{test_files}}"),
        "cpp" => T::new("make"),
        "crystal" => T::new("crystal spec"),
        "csharp" => T::new("dotnet test"),
        "dart" => T::new("dart test"),
        "elixir" => T::new("mix test"),
        "elm" => T::new("elm-test"),
        "gleam" => T::new("gleam test"),
        "go" => T::new("go test"),
        "java" => T::new("gradle test --offline --console=plain"),
        "javascript" => T::new("npm run test"),
        "julia" => T::new("julia runtests.jl"),
        "lua" => T::new("busted"),
        "prolog" => T::new("swipl -f {{solution_files}} -s {{test_files}} -g run_tests,halt -t 'halt(1)'"),
        "python" => T::new("python3 -m pytest -o markers=task {{test_files}}"),
        "ruby" => T::new("ruby {{test_files}}"),
        "rust" => T::new("cargo test --"),
        "typescript" => T::new("yarn test"),
        "zig" => T::new("zig test {{test_files}}"),
    }
});

#[cfg(test)]
mod test {
    use super::*;
    use crate::workspace::{error::Error, platform::{UnixPlatform, WindowsPlatform}};

    fn exercise_with_config(json: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fsutil::write_with_mkdir(ExerciseConfig::filepath_in(tmp.path()), json).unwrap();
        tmp
    }

    #[test]
    fn static_commands_need_no_config() {
        let tmp = tempfile::tempdir().unwrap();
        let elixir = TestConfiguration::for_track("elixir").unwrap();
        assert_eq!(elixir.command_for(tmp.path(), &UnixPlatform).unwrap(), "mix test");

        let rust = TestConfiguration::for_track("rust").unwrap();
        assert_eq!(rust.command_for(tmp.path(), &UnixPlatform).unwrap(), "cargo test --");
    }

    #[test]
    fn windows_command_is_preferred_on_windows() {
        let cobol = TestConfiguration::for_track("cobol").unwrap();
        assert_eq!(cobol.raw_command(&UnixPlatform), "test.sh");
        assert_eq!(cobol.raw_command(&WindowsPlatform), "test.ps1");

        let go = TestConfiguration::for_track("go").unwrap();
        assert_eq!(go.raw_command(&WindowsPlatform), "go test");
    }

    #[test]
    fn placeholders_are_filled_from_exercise_config() {
        let tmp = exercise_with_config(
            r#"{"files":{"solution":["lasagna.rb"],"test":["lasagna_test.rb","extra_test.rb"]}}"#,
        );
        let ruby = TestConfiguration::for_track("ruby").unwrap();
        assert_eq!(
            ruby.command_for(tmp.path(), &UnixPlatform).unwrap(),
            "ruby lasagna_test.rb extra_test.rb"
        );

        let prolog = TestConfiguration::for_track("prolog").unwrap();
        assert_eq!(
            prolog.command_for(tmp.path(), &UnixPlatform).unwrap(),
            "swipl -f lasagna.rb -s lasagna_test.rb extra_test.rb -g run_tests,halt -t 'halt(1)'"
        );
    }

    #[test]
    fn missing_test_key_is_reported() {
        let tmp = exercise_with_config(r#"{"files":{"solution":["a.rb"]}}"#);
        let ruby = TestConfiguration::for_track("ruby").unwrap();
        let err = ruby.command_for(tmp.path(), &UnixPlatform).unwrap_err();
        assert!(matches!(err, Error::MissingConfigKey("files.test")));
    }

    #[test]
    fn unknown_track() {
        assert!(TestConfiguration::for_track("klingon").is_none());
    }
}
