//! Diagram tagging.
//!
//! Fenced code blocks whose language is `mermaid` are re-emitted with
//! the class the client-side renderer looks for and the raw source in a
//! `data-clipboard` attribute for the copy button. Seeing one also sets
//! the note's diagram flag so the loader script is only shipped to
//! pages that need it.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};

use super::{NoteContext, Transform};
use crate::config::FeatureConfig;
use crate::util::{escape_attr, escape_html};

pub struct DiagramTagger;

impl Transform for DiagramTagger {
    fn name(&self) -> &'static str {
        "mermaid"
    }

    fn enabled(&self, features: &FeatureConfig) -> bool {
        features.mermaid
    }

    fn apply(
        &self,
        events: Vec<Event<'static>>,
        ctx: &mut NoteContext<'_>,
    ) -> Vec<Event<'static>> {
        let mut out = Vec::with_capacity(events.len());
        let mut iter = events.into_iter();
        while let Some(event) = iter.next() {
            match &event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang)))
                    if lang.as_ref() == "mermaid" =>
                {
                    let mut source = String::new();
                    for inner in iter.by_ref() {
                        match inner {
                            Event::Text(t) => source.push_str(&t),
                            Event::End(TagEnd::CodeBlock) => break,
                            _ => {}
                        }
                    }
                    ctx.meta.has_mermaid = true;
                    out.push(Event::Html(CowStr::from(format!(
                        r#"<pre><code class="mermaid" data-clipboard="{}">{}</code></pre>"#,
                        escape_attr(&source),
                        escape_html(&source),
                    ))));
                }
                _ => out.push(event),
            }
        }
        out
    }
}
