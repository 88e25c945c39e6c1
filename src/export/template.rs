//! Standalone HTML document wrapper for the root page.

use minijinja::{Environment, context};

use crate::export::settings::RenderConfig;

/// Default scaffold wrapped around the root page's rendered body.
pub const DEFAULT_PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <title>{{ title }}</title>
    <meta name="generator" content="chanzero {{ version }}">
    <meta charset="utf-8">
    {% if stylesheet %}<link rel="stylesheet" type="text/css" href="{{ stylesheet }}">
    {% endif %}
</head>
<body>
{{ content|safe }}
</body>
</html>
"##;

/// Wraps rendered HTML in a complete standalone document.
///
/// The template is registered under an `.html` name so minijinja escapes the
/// title and stylesheet from `config`; `content` is inserted verbatim.
pub fn render_standalone(content: &str, config: &RenderConfig) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("page.html", DEFAULT_PAGE_TEMPLATE)?;
    let tmpl = env.get_template("page.html")?;

    tmpl.render(context! {
        title => config.title.as_deref().unwrap_or_default(),
        stylesheet => config.stylesheet.as_deref(),
        version => env!("CARGO_PKG_VERSION"),
        content => content,
    })
}
