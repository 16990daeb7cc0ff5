//! Note rendering: source text in, HTML plus metadata out.
//!
//! One render is a fixed pipeline: the raw-text normalizer, the
//! markdown parser with the dialect's option set, the transform stages,
//! and the HTML writer. The caller supplies the feature record and, when
//! rendering within a vault, the slug registry used for broken-link
//! detection.

use std::collections::HashSet;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, html};

use crate::config::FeatureConfig;
use crate::text;
use crate::transform::{NoteContext, NoteMeta, Transformer};

static DEFAULT_FEATURES: LazyLock<FeatureConfig> = LazyLock::new(FeatureConfig::default);

/// Inputs for rendering one note.
pub struct RenderOptions<'a> {
    pub features: &'a FeatureConfig,
    /// Site root prefix for generated absolute URLs.
    pub base_url: &'a str,
    /// Slugs of every note in the vault, `None` outside a vault build.
    pub known_slugs: Option<&'a HashSet<String>>,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            features: &DEFAULT_FEATURES,
            base_url: "",
            known_slugs: None,
        }
    }
}

/// One rendered note: the HTML body and the metadata the transform
/// stages accumulated along the way.
pub struct NoteOutput {
    pub html: String,
    pub meta: NoteMeta,
}

/// Parser options for the dialect.
///
/// GFM alert parsing must stay off: it would consume `> [!note]` lines
/// before the callout transformer sees them.
fn parser_options(features: &FeatureConfig) -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    if features.wikilinks {
        options.insert(Options::ENABLE_WIKILINKS);
    }
    options
}

/// Render one note's markdown source to HTML.
pub fn render_note(src: &str, options: &RenderOptions<'_>) -> NoteOutput {
    let prepared = text::preprocess(src, options.features);
    let events: Vec<Event<'static>> = Parser::new_ext(&prepared, parser_options(options.features))
        .map(|event| event.into_static())
        .collect();

    let mut ctx = NoteContext::new(options.features, options.base_url, options.known_slugs);
    let events = Transformer::default_pipeline().run(events, &mut ctx);

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    NoteOutput { html: out, meta: ctx.meta }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_markdown_renders() {
        let out = render_note("# Title\n\nbody", &RenderOptions::default());
        assert!(out.html.contains("<h1>Title</h1>"), "{}", out.html);
        assert!(out.html.contains("<p>body</p>"), "{}", out.html);
        assert!(out.meta.tags.is_empty());
        assert!(!out.meta.has_mermaid);
    }

    #[test]
    fn comments_are_stripped_before_parsing() {
        let out = render_note("before %%hidden%% after", &RenderOptions::default());
        assert!(!out.html.contains("hidden"), "{}", out.html);
        assert!(out.html.contains("before"), "{}", out.html);
        assert!(out.html.contains("after"), "{}", out.html);
    }

    #[test]
    fn full_note_exercises_every_stage() {
        let src = "\
# Note

See [[Other Page|that page]] and ==this== #demo/tag.

> [!warning|meta] Custom Title
> body line

```mermaid
graph TD;
```

Anchored paragraph. ^anchor
";
        let out = render_note(src, &RenderOptions::default());
        assert!(out.html.contains(r#"<a href="Other-Page">that page</a>"#), "{}", out.html);
        assert!(out.html.contains(r#"class="text-highlight""#), "{}", out.html);
        assert!(out.html.contains(r#"href="/tags/demo/tag""#), "{}", out.html);
        assert!(
            out.html.contains(r#"class="callout warning" data-callout="warning""#),
            "{}",
            out.html
        );
        assert!(out.html.contains(r#"data-callout-metadata="meta""#), "{}", out.html);
        assert!(out.html.contains("Custom Title"), "{}", out.html);
        assert!(out.html.contains("body line"), "{}", out.html);
        assert!(out.html.contains(r#"<code class="mermaid""#), "{}", out.html);
        assert!(out.html.contains(r#"<p id="anchor">"#), "{}", out.html);
        assert!(out.meta.has_mermaid);
        assert!(out.meta.tags.contains("demo/tag"));
        assert_eq!(out.meta.tags.len(), 1);
    }

    #[test]
    fn strikethrough_and_table_options_are_on() {
        let out = render_note("~~gone~~\n\n| a | b |\n|---|---|\n| 1 | 2 |", &RenderOptions::default());
        assert!(out.html.contains("<del>gone</del>"), "{}", out.html);
        assert!(out.html.contains("<table>"), "{}", out.html);
    }

    #[test]
    fn wikilink_syntax_is_literal_when_disabled() {
        let features = FeatureConfig { wikilinks: false, ..Default::default() };
        let options = RenderOptions { features: &features, ..Default::default() };
        let out = render_note("[[Note]]", &options);
        assert!(out.html.contains("[[Note]]"), "{}", out.html);
    }
}
