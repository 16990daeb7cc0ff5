//! Event-stream transforms for the Obsidian dialect.
//!
//! The transformer rewrites a note's parsed event stream through a
//! fixed sequence of stages:
//! 1. Wikilink resolution (links, embeds, transcludes, broken links)
//! 2. Highlight rewriting (`==…==` spans)
//! 3. Tag resolution (`#tag` links plus the note tag set)
//! 4. Raw-HTML re-application of the above (opt-in)
//! 5. Media classification (video/YouTube/tweet embeds)
//! 6. Block references (trailing `^id` anchors)
//! 7. Checkbox rewriting (opt-in)
//! 8. Callout restructuring
//! 9. Diagram tagging
//!
//! Stages are independent single-pass visitors over the shared stream;
//! each stage rewrites a matched node at most once and leaves
//! everything else untouched.

mod blockref;
mod callout;
mod checkbox;
mod context;
mod highlight;
mod html_embed;
mod media;
mod mermaid;
mod tags;
mod wikilink;

pub use context::{NoteContext, NoteMeta};

pub use blockref::BlockReferences;
pub use callout::CalloutTransformer;
pub use checkbox::CheckboxRewriter;
pub use highlight::HighlightRewriter;
pub use html_embed::HtmlEmbedRewriter;
pub use media::MediaClassifier;
pub use mermaid::DiagramTagger;
pub use tags::TagResolver;
pub use wikilink::WikilinkResolver;

use pulldown_cmark::{CowStr, Event};

use crate::config::FeatureConfig;

/// A stage in the note transform pipeline.
///
/// Stages take ownership of the event vector and return the rewritten
/// one rather than mutating shared structure in place, which keeps them
/// composable and testable in isolation. A stage must be total: any
/// event it does not recognize passes through unchanged, and it never
/// fails.
pub trait Transform {
    /// Unique name for this stage (used for insertion points).
    fn name(&self) -> &'static str;

    /// Whether this stage runs under the given feature record.
    fn enabled(&self, features: &FeatureConfig) -> bool;

    /// Rewrite the event stream, recording side-channel metadata on the
    /// context.
    fn apply(&self, events: Vec<Event<'static>>, ctx: &mut NoteContext<'_>)
    -> Vec<Event<'static>>;
}

/// The note transform pipeline: an ordered list of stages applied to
/// one note's event stream.
pub struct Transformer {
    stages: Vec<Box<dyn Transform>>,
}

impl Transformer {
    /// Create an empty transformer with no stages.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Create the default pipeline with the standard stage order.
    pub fn default_pipeline() -> Self {
        let mut transformer = Self::new();
        transformer.add_stage(WikilinkResolver);
        transformer.add_stage(HighlightRewriter);
        transformer.add_stage(TagResolver);
        transformer.add_stage(HtmlEmbedRewriter);
        transformer.add_stage(MediaClassifier);
        transformer.add_stage(BlockReferences);
        transformer.add_stage(CheckboxRewriter);
        transformer.add_stage(CalloutTransformer);
        transformer.add_stage(DiagramTagger);
        transformer
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Transform + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Run the enabled stages in order over one note's events.
    pub fn run(
        &self,
        mut events: Vec<Event<'static>>,
        ctx: &mut NoteContext<'_>,
    ) -> Vec<Event<'static>> {
        for stage in &self.stages {
            if stage.enabled(ctx.features) {
                events = stage.apply(events, ctx);
            }
        }
        events
    }

    /// Get the names of all stages in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

/// Merge adjacent `Text` events into one.
///
/// The tokenizer splits plain text at characters that could open an
/// inline construct (`[`, `<`, `!`), so syntax spanning such a split,
/// a callout directive or a highlight containing `<`, arrives in
/// fragments no single-event grammar can see. Stages that match line
/// grammars against `Text` events run their input through this first.
pub(crate) fn coalesce_text(events: Vec<Event<'static>>) -> Vec<Event<'static>> {
    let mut out: Vec<Event<'static>> = Vec::with_capacity(events.len());
    for event in events {
        if let Event::Text(next) = &event {
            if let Some(Event::Text(prev)) = out.last_mut() {
                let mut joined = prev.to_string();
                joined.push_str(next);
                *prev = CowStr::from(joined);
                continue;
            }
        }
        out.push(event);
    }
    out
}

/// Concatenate the plain text content of inline events, used by stages
/// that collapse a container down to its text (highlight spans, link
/// aliases). Non-text events contribute nothing.
pub(crate) fn inline_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_order() {
        let transformer = Transformer::default_pipeline();
        assert_eq!(
            transformer.stage_names(),
            vec![
                "wikilinks",
                "highlight",
                "tags",
                "html-embed",
                "media",
                "block-references",
                "checkbox",
                "callouts",
                "mermaid",
            ]
        );
    }

    #[test]
    fn coalesce_merges_adjacent_text_runs() {
        use pulldown_cmark::{Tag, TagEnd};
        let events = vec![
            Event::Start(Tag::Paragraph),
            Event::Text("[".into()),
            Event::Text("!note".into()),
            Event::Text("]".into()),
            Event::Text(" Title".into()),
            Event::End(TagEnd::Paragraph),
        ];
        let out = coalesce_text(events);
        assert_eq!(out.len(), 3);
        assert!(matches!(&out[1], Event::Text(t) if t.as_ref() == "[!note] Title"));
    }

    #[test]
    fn inline_text_concatenates() {
        use pulldown_cmark::{Tag, TagEnd};
        let events = vec![
            Event::Start(Tag::Emphasis),
            Event::Text("hello".into()),
            Event::End(TagEnd::Emphasis),
            Event::SoftBreak,
            Event::Text("world".into()),
        ];
        assert_eq!(inline_text(&events), "hello world");
    }
}
