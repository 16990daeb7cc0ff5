//! Highlight span rewriting.
//!
//! `==text==` inside plain text becomes an inline highlight span. The
//! span wraps the literal text content only; rich markup nested inside
//! the delimiters is not preserved. That loss is a documented
//! limitation of the syntax, kept for compatibility with the client
//! styling contract.

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};

use super::{NoteContext, Transform, coalesce_text};
use crate::config::FeatureConfig;
use crate::grammar::HIGHLIGHT_RE;
use crate::util::escape_html;

pub struct HighlightRewriter;

impl Transform for HighlightRewriter {
    fn name(&self) -> &'static str {
        "highlight"
    }

    fn enabled(&self, features: &FeatureConfig) -> bool {
        features.highlight
    }

    fn apply(
        &self,
        events: Vec<Event<'static>>,
        _ctx: &mut NoteContext<'_>,
    ) -> Vec<Event<'static>> {
        // Spans containing a tokenizer split point (`<`, `[`) arrive
        // as fragmented text events; join them before matching.
        let events = coalesce_text(events);
        let mut out = Vec::with_capacity(events.len());
        let mut in_code_block = false;
        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(_)) => {
                    in_code_block = true;
                    out.push(event);
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    out.push(event);
                }
                Event::Text(text) if !in_code_block && HIGHLIGHT_RE.is_match(&text) => {
                    rewrite_text(&text, &mut out);
                }
                other => out.push(other),
            }
        }
        out
    }
}

fn rewrite_text(text: &str, out: &mut Vec<Event<'static>>) {
    let mut last = 0;
    for caps in HIGHLIGHT_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if whole.start() > last {
            out.push(Event::Text(CowStr::from(text[last..whole.start()].to_string())));
        }
        out.push(Event::InlineHtml(CowStr::from(format!(
            r#"<span class="text-highlight">{}</span>"#,
            escape_html(&caps[1])
        ))));
        last = whole.end();
    }
    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

#[cfg(test)]
mod tests {
    use crate::render::{RenderOptions, render_note};

    fn html(src: &str) -> String {
        render_note(src, &RenderOptions::default()).html
    }

    #[test]
    fn highlight_becomes_span() {
        let out = html("this is ==important== text");
        assert!(
            out.contains(r#"this is <span class="text-highlight">important</span> text"#),
            "{out}"
        );
    }

    #[test]
    fn multiple_highlights_in_one_line() {
        let out = html("==one== and ==two==");
        assert_eq!(out.matches(r#"class="text-highlight""#).count(), 2, "{out}");
    }

    #[test]
    fn span_content_is_escaped() {
        let out = html("==a < b==");
        assert!(out.contains(r#"<span class="text-highlight">a &lt; b</span>"#), "{out}");
    }

    #[test]
    fn code_blocks_are_untouched() {
        let out = html("```\n==not a highlight==\n```");
        assert!(!out.contains("text-highlight"), "{out}");
    }

    #[test]
    fn unbalanced_markers_stay_literal() {
        let out = html("just ==half open");
        assert!(!out.contains("text-highlight"), "{out}");
        assert!(out.contains("==half open"), "{out}");
    }
}
