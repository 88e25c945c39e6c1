//! Isolated site directory with temp storage.

// Allow dead code since this is a test utility with methods for future tests
#![allow(dead_code)]

use super::{ChanzeroCommand, TestPage};
use chanzero::export::{ExportReport, NoopReporter, RenderConfig, export_site};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated site laid out as `<temp>/src/*.md`, exporting to `<temp>`.
///
/// The temp directory is cleaned up on drop. A separate empty directory
/// serves as the config home so a user config file never leaks in.
pub struct TestSite {
    _temp_dir: TempDir,
    _config_dir: TempDir,
    site_dir: PathBuf,
}

impl TestSite {
    /// Creates a new empty site.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_dir = TempDir::new().expect("Failed to create config directory");
        let site_dir = temp_dir.path().to_path_buf();
        std::fs::create_dir_all(site_dir.join("src")).expect("Failed to create src directory");
        Self {
            _temp_dir: temp_dir,
            _config_dir: config_dir,
            site_dir,
        }
    }

    /// Destination root: output pages land here.
    pub fn site_dir(&self) -> &Path {
        &self.site_dir
    }

    /// Source root holding the markdown pages.
    pub fn src_dir(&self) -> PathBuf {
        self.site_dir.join("src")
    }

    /// Path of the conventional root document, `src/index.md`.
    pub fn root(&self) -> PathBuf {
        self.src_dir().join("index.md")
    }

    /// Directory used as `XDG_CONFIG_HOME` for spawned commands.
    pub fn config_home(&self) -> &Path {
        self._config_dir.path()
    }

    /// Writes a user config file with the given TOML contents.
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let dir = self.config_home().join("chanzero");
        std::fs::create_dir_all(&dir).expect("Failed to create config dir");
        let path = dir.join("config.toml");
        std::fs::write(&path, contents).expect("Failed to write config");
        path
    }

    /// Writes raw source text at a path relative to the source root.
    pub fn write_source(&self, name: &str, content: &str) -> PathBuf {
        let path = self.src_dir().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create page directory");
        }
        std::fs::write(&path, content).expect("Failed to write page");
        path
    }

    /// Writes a built page at a path relative to the source root.
    pub fn add_page(&self, name: &str, page: &TestPage) -> PathBuf {
        self.write_source(name, &page.to_markdown())
    }

    /// Path of an output file relative to the destination root.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.site_dir.join(name)
    }

    /// Reads an output file relative to the destination root.
    pub fn read_output(&self, name: &str) -> String {
        let path = self.output_path(name);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read output {}: {}", path.display(), e))
    }

    /// Exports the site in-process without printing progress.
    pub fn export(&self) -> ExportReport {
        export_site(&self.root(), &RenderConfig::default(), &mut NoopReporter)
            .expect("export should succeed")
    }

    /// Creates a command exporting this site's root document.
    pub fn cmd(&self) -> ChanzeroCommand {
        ChanzeroCommand::new()
            .src(&self.root())
            .config_home(self.config_home())
    }
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_creates_src_directory() {
        let site = TestSite::new();
        assert!(site.src_dir().is_dir());
    }

    #[test]
    fn test_site_cleanup_on_drop() {
        let path = {
            let site = TestSite::new();
            site.site_dir().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_add_page_creates_nested_dirs() {
        let site = TestSite::new();
        let path = site.add_page("guide/intro.md", &TestPage::new("Intro"));

        assert!(path.is_file());
        assert!(path.starts_with(site.src_dir()));
    }

    #[test]
    fn test_export_in_process() {
        let site = TestSite::new();
        site.add_page("index.md", &TestPage::new("Home"));

        let report = site.export();

        assert_eq!(report.exported(), 1);
        assert!(site.read_output("index.html").contains("Home"));
    }
}
