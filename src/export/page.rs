//! Page import: read one source document and render it.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::export::OUTPUT_EXTENSION;
use crate::export::html::render_markdown;
use crate::export::settings::{RenderConfig, Settings, split_header};
use crate::export::template::render_standalone;
use crate::infra::{FsError, SiteFs, read_source};

/// Errors while importing a single page.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Read(#[from] FsError),

    #[error("failed to render standalone page {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },
}

/// One document in the site's link graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Location relative to the source root directory.
    pub source_path: PathBuf,
    /// Mirrored location relative to the destination root directory.
    pub destination_path: PathBuf,
    /// Converted output; `None` until imported.
    pub rendered: Option<String>,
    /// Raw link targets in discovery order, duplicates included.
    pub links: Vec<String>,
    /// Header settings; only ever populated for the root page.
    pub settings: Settings,
}

impl Page {
    /// Creates an unimported page for a source-relative path.
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        let source_path = source_path.into();
        let destination_path = source_path.with_extension(OUTPUT_EXTENSION);
        Self {
            source_path,
            destination_path,
            rendered: None,
            links: Vec::new(),
            settings: Settings::new(),
        }
    }

    /// Rendered bytes, empty before import.
    pub fn rendered_bytes(&self) -> &[u8] {
        self.rendered.as_deref().map(str::as_bytes).unwrap_or_default()
    }
}

/// Imports the root page.
///
/// The header block is split off and parsed, the render configuration is
/// derived from it (falling back to `defaults`), and the body is wrapped in a
/// standalone document.
pub fn import_root<F: SiteFs + ?Sized>(
    fs: &F,
    source: &Path,
    page: &mut Page,
    defaults: &RenderConfig,
) -> Result<RenderConfig, ImportError> {
    let text = read_source(fs, source)?;
    let (settings, body) = split_header(&text);
    let config = RenderConfig::from_settings(&settings, defaults);

    let mut links = Vec::new();
    let content = render_markdown(body, |link| links.push(link.to_string()));
    let rendered = render_standalone(&content, &config).map_err(|e| ImportError::Template {
        path: source.to_path_buf(),
        source: e,
    })?;

    page.settings = settings;
    page.links = links;
    page.rendered = Some(rendered);
    Ok(config)
}

/// Imports a linked page as a plain body fragment.
///
/// Linked pages never carry a settings header, so a `///` line in their body
/// is ordinary text.
pub fn import_linked<F: SiteFs + ?Sized>(
    fs: &F,
    source: &Path,
    page: &mut Page,
) -> Result<(), ImportError> {
    let text = read_source(fs, source)?;

    let mut links = Vec::new();
    let rendered = render_markdown(&text, |link| links.push(link.to_string()));

    page.links = links;
    page.rendered = Some(rendered);
    Ok(())
}
