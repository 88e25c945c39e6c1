//! Static site export by link-graph traversal.
//!
//! Starting from one root document, every local page reachable through
//! rendered links is imported and written exactly once. Output mirrors the
//! source tree one directory level above the root's directory.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::export::page::{ImportError, Page, import_linked, import_root};
use crate::export::settings::RenderConfig;
use crate::export::SOURCE_EXTENSION;
use crate::infra::{LocalFs, SiteFs};

// ===========================================
// Errors and Results
// ===========================================

/// Fatal export errors. Failures below the root page are reported per page
/// instead.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("root document not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("root path does not name a file: {path}")]
    InvalidRoot { path: PathBuf },

    #[error("failed to import root document {path}: {source}")]
    RootImport {
        path: PathBuf,
        #[source]
        source: ImportError,
    },
}

/// What happened to one dispatched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Rendered and written.
    Exported,
    /// Source could not be read; nothing written, links not followed.
    ReadFailed(String),
    /// Rendered but the destination could not be written.
    WriteFailed(String),
}

/// Per-page export record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// Full source location.
    pub source: PathBuf,
    /// Full destination location.
    pub destination: PathBuf,
    pub outcome: PageOutcome,
}

/// Result of a site export, pages in dispatch order.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub pages: Vec<PageReport>,
    /// Render configuration derived from the root page.
    pub config: RenderConfig,
}

impl ExportReport {
    /// Number of pages written successfully.
    pub fn exported(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.outcome == PageOutcome::Exported)
            .count()
    }

    /// Number of pages that failed to read or write.
    pub fn failed(&self) -> usize {
        self.pages.len() - self.exported()
    }
}

// ===========================================
// Progress Reporting
// ===========================================

/// Callback for reporting export progress.
pub trait ProgressReporter {
    /// Called when a page is dispatched, before it is imported.
    fn on_page_start(&mut self, _source: &Path, _destination: &Path) {}

    /// Called once the page has been written or has failed.
    fn on_page(&mut self, report: &PageReport);

    /// Called after the traversal finishes.
    fn on_complete(&mut self, _exported: usize, _failed: usize) {}
}

/// A no-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_page(&mut self, _report: &PageReport) {}
}

// ===========================================
// Site Layout
// ===========================================

/// Source and destination roots derived from the root document's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// Directory containing the root document; links resolve against it.
    pub source_root: PathBuf,
    /// Parent of `source_root`; output mirrors the source tree here.
    pub destination_root: PathBuf,
    /// Root document path relative to `source_root`.
    pub root_page: PathBuf,
}

impl SiteLayout {
    /// Derives the layout for a root document such as `site/src/index.md`,
    /// giving source root `site/src` and destination root `site`.
    pub fn for_root(root: &Path) -> Result<Self, ExportError> {
        let root_page = root
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| ExportError::InvalidRoot { path: root.into() })?;

        let source_root = match root.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let destination_root = destination_root_for(&source_root);

        Ok(Self {
            source_root,
            destination_root,
            root_page,
        })
    }

    /// Full location of a source-relative page.
    pub fn source_path(&self, page: &Path) -> PathBuf {
        self.source_root.join(page)
    }

    /// Full location of a destination-relative page.
    pub fn destination_path(&self, page: &Path) -> PathBuf {
        self.destination_root.join(page)
    }
}

fn destination_root_for(source_root: &Path) -> PathBuf {
    match source_root.components().next_back() {
        Some(Component::Normal(_)) => match source_root.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
        Some(Component::ParentDir) => source_root.join(".."),
        // `.` or a filesystem root: only the real path knows its parent
        _ => std::fs::canonicalize(source_root)
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| source_root.to_path_buf()),
    }
}

/// Maps a raw link target to a candidate source path relative to the
/// source root.
///
/// The fragment and query are dropped, percent-escapes decoded, `.`
/// components removed and `..` resolved; a leading `/` means the source
/// root. The extension is rewritten to `md`. Returns `None` for targets
/// that are empty or climb out of the source root.
///
/// Resolution is always against the source root, never the directory of the
/// page containing the link.
pub fn resolve_link(link: &str) -> Option<PathBuf> {
    let target = link.split(['#', '?']).next().unwrap_or_default();
    if target.is_empty() {
        return None;
    }
    let target = percent_decode_str(target).decode_utf8().ok()?;

    let mut normalized = PathBuf::new();
    for component in Path::new(&*target).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir | Component::RootDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::Prefix(_) => return None,
        }
    }

    if normalized.as_os_str().is_empty() {
        return None;
    }
    Some(normalized.with_extension(SOURCE_EXTENSION))
}

// ===========================================
// Exporter
// ===========================================

/// Mutable state of one export run.
#[derive(Default)]
struct Traversal {
    /// Source-relative paths already dispatched.
    visited: HashSet<PathBuf>,
    /// Local link targets waiting to be dispatched, last one next.
    pending: Vec<PathBuf>,
    report: ExportReport,
}

/// Walks a site's link graph and writes each reachable page once.
pub struct SiteExporter<'a, F: SiteFs + ?Sized> {
    fs: &'a F,
    layout: SiteLayout,
    defaults: RenderConfig,
}

impl<'a, F: SiteFs + ?Sized> SiteExporter<'a, F> {
    pub fn new(fs: &'a F, layout: SiteLayout) -> Self {
        Self {
            fs,
            layout,
            defaults: RenderConfig::default(),
        }
    }

    /// Sets the title and stylesheet used when the root header omits them.
    pub fn with_defaults(mut self, defaults: RenderConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Exports the whole site.
    ///
    /// Pages are dispatched in depth-first pre-order of the link graph: a
    /// page's first local link and everything reachable from it is exported
    /// before its second local link. A path enters the visited set before
    /// its import starts, so cycles terminate and shared pages are written
    /// once.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::RootNotFound` or `ExportError::RootImport` if
    /// the root document is missing or cannot be rendered. Failures on any
    /// other page are recorded in the report.
    pub fn export<P: ProgressReporter>(&self, progress: &mut P) -> Result<ExportReport, ExportError> {
        let root_source = self.layout.source_path(&self.layout.root_page);
        if !self.fs.exists(&root_source) {
            return Err(ExportError::RootNotFound { path: root_source });
        }

        let mut walk = Traversal::default();

        // Root page: its settings configure every later page
        walk.visited.insert(self.layout.root_page.clone());
        let mut root = Page::new(self.layout.root_page.clone());
        let destination = self.layout.destination_path(&root.destination_path);
        progress.on_page_start(&root_source, &destination);

        walk.report.config = import_root(self.fs, &root_source, &mut root, &self.defaults)
            .map_err(|e| ExportError::RootImport {
                path: root_source.clone(),
                source: e,
            })?;
        let outcome = self.write_page(&root, &destination);
        self.finish_page(&mut walk, &root, root_source, destination, outcome, progress);

        while let Some(path) = walk.pending.pop() {
            if !walk.visited.insert(path.clone()) {
                tracing::debug!(page = %path.display(), "already exported");
                continue;
            }

            let mut page = Page::new(path);
            let source = self.layout.source_path(&page.source_path);
            let destination = self.layout.destination_path(&page.destination_path);
            progress.on_page_start(&source, &destination);

            let outcome = match import_linked(self.fs, &source, &mut page) {
                Ok(()) => self.write_page(&page, &destination),
                Err(e) => {
                    tracing::warn!(path = %source.display(), error = %e, "Failed to read page");
                    PageOutcome::ReadFailed(e.to_string())
                }
            };
            self.finish_page(&mut walk, &page, source, destination, outcome, progress);
        }

        let report = walk.report;
        progress.on_complete(report.exported(), report.failed());
        Ok(report)
    }

    /// Ensures the destination directory exists and writes the rendered page.
    fn write_page(&self, page: &Page, destination: &Path) -> PageOutcome {
        let written = match destination.parent() {
            Some(dir) => self.fs.ensure_dir(dir),
            None => Ok(()),
        }
        .and_then(|()| self.fs.write_all(destination, page.rendered_bytes()));

        match written {
            Ok(()) => {
                tracing::info!(
                    source = %page.source_path.display(),
                    destination = %destination.display(),
                    links = page.links.len(),
                    "exported page"
                );
                PageOutcome::Exported
            }
            Err(e) => {
                tracing::warn!(path = %destination.display(), error = %e, "Failed to write page");
                PageOutcome::WriteFailed(e.to_string())
            }
        }
    }

    /// Records the outcome and queues the page's local links.
    fn finish_page<P: ProgressReporter>(
        &self,
        walk: &mut Traversal,
        page: &Page,
        source: PathBuf,
        destination: PathBuf,
        outcome: PageOutcome,
        progress: &mut P,
    ) {
        if !matches!(outcome, PageOutcome::ReadFailed(_)) {
            let local = self.local_links(page, &walk.visited);
            // Stack: push in reverse so the first link is exported first
            walk.pending.extend(local.into_iter().rev());
        }

        let page_report = PageReport {
            source,
            destination,
            outcome,
        };
        progress.on_page(&page_report);
        walk.report.pages.push(page_report);
    }

    /// Link targets that resolve to existing, not yet visited source files.
    fn local_links(&self, page: &Page, visited: &HashSet<PathBuf>) -> Vec<PathBuf> {
        let mut local = Vec::new();
        for link in &page.links {
            let Some(candidate) = resolve_link(link) else {
                tracing::debug!(link = %link, "skipping link outside the site");
                continue;
            };
            if visited.contains(&candidate) {
                continue;
            }
            if self.fs.exists(&self.layout.source_path(&candidate)) {
                local.push(candidate);
            } else {
                tracing::debug!(link = %link, "skipping link without local source");
            }
        }
        local
    }
}

/// Exports the site rooted at `root` on the local filesystem.
pub fn export_site<P: ProgressReporter>(
    root: &Path,
    defaults: &RenderConfig,
    progress: &mut P,
) -> Result<ExportReport, ExportError> {
    let layout = SiteLayout::for_root(root)?;
    SiteExporter::new(&LocalFs, layout)
        .with_defaults(defaults.clone())
        .export(progress)
}
