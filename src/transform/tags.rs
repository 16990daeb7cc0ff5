//! Tag resolution.
//!
//! `#path/to/tag` tokens in plain text become links to the tag's index
//! page, and the slugified tag is recorded on the note's tag set. A
//! value of only digits and slashes is a numeric fragment, not a tag:
//! it stays literal text and is never collected.

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};

use super::{NoteContext, Transform, coalesce_text};
use crate::config::FeatureConfig;
use crate::grammar::{TAG_RE, is_numeric_tag};
use crate::slug::slugify_tag;

pub struct TagResolver;

impl Transform for TagResolver {
    fn name(&self) -> &'static str {
        "tags"
    }

    fn enabled(&self, features: &FeatureConfig) -> bool {
        features.parse_tags
    }

    fn apply(
        &self,
        events: Vec<Event<'static>>,
        ctx: &mut NoteContext<'_>,
    ) -> Vec<Event<'static>> {
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
                Event::Text(text) if !in_code_block && TAG_RE.is_match(&text) => {
                    rewrite_text(&text, ctx, &mut out);
                }
                other => out.push(other),
            }
        }
        out
    }
}

fn rewrite_text(text: &str, ctx: &mut NoteContext<'_>, out: &mut Vec<Event<'static>>) {
    let mut last = 0;
    for caps in TAG_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let lead = &caps[1];
        let value = &caps[2];

        // Text before the match, plus the leading whitespace the
        // pattern had to consume in place of a lookbehind.
        let prefix_end = whole.start() + lead.len();
        if prefix_end > last {
            out.push(Event::Text(CowStr::from(text[last..prefix_end].to_string())));
        }

        if is_numeric_tag(value) {
            out.push(Event::Text(CowStr::from(format!("#{value}"))));
        } else {
            let slug = slugify_tag(value);
            ctx.meta.tags.insert(slug.clone());
            out.push(Event::InlineHtml(CowStr::from(format!(
                r#"<a href="{}" class="tag-link">{}</a>"#,
                ctx.tag_url(&slug),
                slug
            ))));
        }
        last = whole.end();
    }
    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

#[cfg(test)]
mod tests {
    use crate::render::{RenderOptions, render_note};

    fn render(src: &str) -> (String, crate::transform::NoteMeta) {
        let out = render_note(src, &RenderOptions::default());
        (out.html, out.meta)
    }

    #[test]
    fn tag_becomes_index_link() {
        let (html, meta) = render("about #rust today");
        assert!(html.contains(r#"<a href="/tags/rust" class="tag-link">rust</a>"#), "{html}");
        assert!(meta.tags.contains("rust"));
    }

    #[test]
    fn nested_tags_keep_segments() {
        let (html, meta) = render("#Deep/Learning");
        assert!(
            html.contains(r#"<a href="/tags/deep/learning" class="tag-link">deep/learning</a>"#),
            "{html}"
        );
        assert!(meta.tags.contains("deep/learning"));
    }

    #[test]
    fn tag_set_ignores_case_differences() {
        let (_, meta) = render("#Rust and #rust and #RUST");
        assert_eq!(meta.tags.len(), 1);
        assert!(meta.tags.contains("rust"));
    }

    #[test]
    fn numeric_fragment_stays_literal() {
        let (html, meta) = render("issue #42/7 is open");
        assert!(html.contains("#42/7"), "{html}");
        assert!(!html.contains("tag-link"), "{html}");
        assert!(meta.tags.is_empty());
    }

    #[test]
    fn trailing_slash_stays_outside_the_tag() {
        let (html, meta) = render("tagging #rust/ here");
        assert!(html.contains(r#"class="tag-link">rust</a>/ here"#), "{html}");
        assert!(meta.tags.contains("rust"));
        assert!(!meta.tags.contains("rust/"));
    }

    #[test]
    fn mid_word_hash_is_not_a_tag() {
        let (html, meta) = render("C#9 and foo#bar");
        assert!(!html.contains("tag-link"), "{html}");
        assert!(meta.tags.is_empty());
    }

    #[test]
    fn code_blocks_are_untouched() {
        let (html, meta) = render("```\n#not-a-tag\n```");
        assert!(!html.contains("tag-link"), "{html}");
        assert!(meta.tags.is_empty());
    }
}
