//! Block reference anchors.
//!
//! A paragraph ending in `^id` declares a block reference: the marker
//! is stripped from the text and the paragraph is emitted with the
//! identifier as its element id, so `[[note#^id]]` links can target it.

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};

use super::{NoteContext, Transform};
use crate::config::FeatureConfig;
use crate::grammar::BLOCK_REF_RE;
use crate::util::escape_attr;

pub struct BlockReferences;

impl Transform for BlockReferences {
    fn name(&self) -> &'static str {
        "block-references"
    }

    fn enabled(&self, features: &FeatureConfig) -> bool {
        features.parse_block_references
    }

    fn apply(
        &self,
        events: Vec<Event<'static>>,
        _ctx: &mut NoteContext<'_>,
    ) -> Vec<Event<'static>> {
        let mut out = Vec::with_capacity(events.len());
        let mut i = 0;
        while i < events.len() {
            if matches!(events[i], Event::Start(Tag::Paragraph)) {
                let end = paragraph_end(&events, i);
                if let Some(id) = trailing_block_id(&events[i..=end]) {
                    let mut body: Vec<Event<'static>> = events[i + 1..end].to_vec();
                    strip_marker(&mut body);
                    out.push(Event::Html(CowStr::from(format!(
                        r#"<p id="{}">"#,
                        escape_attr(&id)
                    ))));
                    out.extend(body);
                    out.push(Event::Html(CowStr::Borrowed("</p>")));
                    i = end + 1;
                    continue;
                }
            }
            out.push(events[i].clone());
            i += 1;
        }
        out
    }
}

fn paragraph_end(events: &[Event<'_>], start: usize) -> usize {
    events[start + 1..]
        .iter()
        .position(|e| matches!(e, Event::End(TagEnd::Paragraph)))
        .map(|offset| start + 1 + offset)
        .unwrap_or(events.len() - 1)
}

/// The block id declared by the paragraph's final text event, if any.
fn trailing_block_id(paragraph: &[Event<'_>]) -> Option<String> {
    let last_text = paragraph.iter().rev().find_map(|e| match e {
        Event::Text(t) => Some(t.as_ref()),
        _ => None,
    })?;
    BLOCK_REF_RE
        .captures(last_text)
        .map(|caps| caps[1].to_string())
}

/// Remove the `^id` marker from the paragraph's final text event.
fn strip_marker(body: &mut [Event<'static>]) {
    for event in body.iter_mut().rev() {
        if let Event::Text(t) = event {
            let stripped = BLOCK_REF_RE.replace(t, "");
            let stripped = stripped.trim_end().to_string();
            *event = Event::Text(CowStr::from(stripped));
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::render::{RenderOptions, render_note};

    fn html(src: &str) -> String {
        render_note(src, &RenderOptions::default()).html
    }

    #[test]
    fn trailing_marker_becomes_paragraph_id() {
        let out = html("An important point. ^point-1");
        assert!(out.contains(r#"<p id="point-1">An important point.</p>"#), "{out}");
    }

    #[test]
    fn marker_must_be_trailing() {
        let out = html("a ^mid marker in text");
        assert!(!out.contains("<p id="), "{out}");
        assert!(out.contains("^mid"), "{out}");
    }

    #[test]
    fn plain_paragraphs_are_untouched() {
        let out = html("just a paragraph");
        assert!(out.contains("<p>just a paragraph</p>"), "{out}");
    }

    #[test]
    fn inline_markup_before_marker_survives() {
        let out = html("some *styled* words ^ref");
        assert!(out.contains(r#"<p id="ref">"#), "{out}");
        assert!(out.contains("<em>styled</em>"), "{out}");
        assert!(!out.contains("^ref"), "{out}");
    }
}
