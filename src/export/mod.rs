//! Site export: settings header parsing, markdown rendering with link
//! discovery, and the link-graph traversal that writes every reachable page.

mod html;
pub mod page;
pub mod settings;
pub mod site;
pub mod template;

/// Extension of markdown source documents.
pub const SOURCE_EXTENSION: &str = "md";

/// Extension of rendered output documents.
pub const OUTPUT_EXTENSION: &str = "html";

pub use html::{markdown_options, markdown_to_html, render_markdown};
pub use page::{ImportError, Page, import_linked, import_root};
pub use settings::{RenderConfig, Settings, split_header};
pub use site::{
    ExportError, ExportReport, NoopReporter, PageOutcome, PageReport, ProgressReporter,
    SiteExporter, SiteLayout, export_site, resolve_link,
};
pub use template::{DEFAULT_PAGE_TEMPLATE, render_standalone};
