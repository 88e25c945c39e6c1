//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility with methods for future tests
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// Fluent wrapper around `assert_cmd::Command` for the `chanzero` binary.
pub struct ChanzeroCommand {
    args: Vec<String>,
    config_home: Option<String>,
}

impl ChanzeroCommand {
    /// Creates a new command for the `chanzero` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            config_home: None,
        }
    }

    /// Sets the `--src` option naming the root document.
    pub fn src(mut self, path: &Path) -> Self {
        self.args.push("--src".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Adds `-v` to the command.
    pub fn verbose(self) -> Self {
        self.args(["-v"])
    }

    /// Points `XDG_CONFIG_HOME` at `dir` so the user's config is not read.
    pub fn config_home(mut self, dir: &Path) -> Self {
        self.config_home = Some(dir.to_string_lossy().to_string());
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("chanzero").expect("Failed to find chanzero binary");
        cmd.args(&self.args);
        cmd.env_remove("RUST_LOG");
        if let Some(home) = &self.config_home {
            cmd.env("XDG_CONFIG_HOME", home);
        }
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }
}

impl Default for ChanzeroCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        ChanzeroCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_src() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("index.md");
        let cmd = ChanzeroCommand::new().src(&root);
        let args = cmd.get_args();
        assert_eq!(args[0], "--src");
        assert_eq!(args[1], root.to_string_lossy());
    }

    #[test]
    fn test_command_output_success() {
        let output = ChanzeroCommand::new().args(["--help"]).output_success();
        assert!(output.contains("--src"));
    }
}
