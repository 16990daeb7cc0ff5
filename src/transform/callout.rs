//! Callout block quotes.
//!
//! A block quote whose first paragraph opens with a `[!kind]` directive
//! becomes an admonition box: a title block, an optional fold icon, and
//! a content wrapper. The kind is canonicalized through the alias table
//! before styling; unknown kinds style as themselves. Block quotes that
//! do not open with a directive pass through untouched, and nested
//! callouts transform independently of their parent.

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};

use super::{NoteContext, Transform, coalesce_text};
use crate::config::FeatureConfig;
use crate::grammar::{self, CalloutDirective, CalloutFold};
use crate::util::{escape_attr, title_case};

pub struct CalloutTransformer;

impl Transform for CalloutTransformer {
    fn name(&self) -> &'static str {
        "callouts"
    }

    fn enabled(&self, features: &FeatureConfig) -> bool {
        features.callouts
    }

    fn apply(
        &self,
        events: Vec<Event<'static>>,
        _ctx: &mut NoteContext<'_>,
    ) -> Vec<Event<'static>> {
        rewrite(events)
    }
}

fn rewrite(events: Vec<Event<'static>>) -> Vec<Event<'static>> {
    // The tokenizer fragments the directive line at `[` and `]`; the
    // grammar needs the whole line in one text event.
    let events = coalesce_text(events);
    let mut out = Vec::with_capacity(events.len());
    let mut iter = events.into_iter();
    while let Some(event) = iter.next() {
        if matches!(event, Event::Start(Tag::BlockQuote(_))) {
            // Inner quotes first, so nesting resolves bottom-up and the
            // outer quote is restructured at most once.
            let inner = rewrite(collect_quote(&mut iter));
            match split_directive(inner) {
                Ok((directive, title, body)) => {
                    emit_callout(&directive, title, body, &mut out);
                }
                Err(inner) => {
                    out.push(event);
                    out.extend(inner);
                    out.push(Event::End(TagEnd::BlockQuote(None)));
                }
            }
        } else {
            out.push(event);
        }
    }
    out
}

/// Consume the inner events of a block quote, balancing nested quotes.
fn collect_quote(iter: &mut impl Iterator<Item = Event<'static>>) -> Vec<Event<'static>> {
    let mut inner = Vec::new();
    let mut depth = 0usize;
    for event in iter {
        match &event {
            Event::Start(Tag::BlockQuote(_)) => depth += 1,
            Event::End(TagEnd::BlockQuote(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            _ => {}
        }
        inner.push(event);
    }
    inner
}

/// Split a quote's inner events into directive, title events, and body
/// events. Returns the events unchanged when the quote does not open
/// with a directive paragraph.
#[allow(clippy::type_complexity)]
fn split_directive(
    inner: Vec<Event<'static>>,
) -> Result<(CalloutDirective, Vec<Event<'static>>, Vec<Event<'static>>), Vec<Event<'static>>> {
    let directive = match (inner.first(), inner.get(1)) {
        (Some(Event::Start(Tag::Paragraph)), Some(Event::Text(text))) => {
            match grammar::callout_directive(text) {
                Some(d) => d,
                None => return Err(inner),
            }
        }
        _ => return Err(inner),
    };

    let para_end = inner
        .iter()
        .position(|e| matches!(e, Event::End(TagEnd::Paragraph)))
        .unwrap_or(inner.len());

    // Title: the directive line's remainder plus any inline siblings
    // that followed it in the same paragraph.
    let mut title: Vec<Event<'static>> = Vec::new();
    if !directive.title.is_empty() {
        title.push(Event::Text(CowStr::from(directive.title.clone())));
    }
    title.extend(inner[2..para_end].iter().cloned());

    let body: Vec<Event<'static>> = inner[(para_end + 1).min(inner.len())..].to_vec();
    Ok((directive, title, body))
}

fn emit_callout(
    directive: &CalloutDirective,
    title: Vec<Event<'static>>,
    body: Vec<Event<'static>>,
    out: &mut Vec<Event<'static>>,
) {
    let kind = grammar::canonical_callout_kind(&directive.kind);
    let mut classes = format!("callout {kind}");
    if directive.fold.is_some() {
        classes.push_str(" is-collapsible");
    }
    if directive.fold == Some(CalloutFold::Collapsed) {
        classes.push_str(" is-collapsed");
    }
    let fold = directive.fold.map(|f| f.marker().to_string()).unwrap_or_default();

    out.push(Event::Html(CowStr::from(format!(
        r#"<blockquote class="{}" data-callout="{}" data-callout-fold="{}" data-callout-metadata="{}">"#,
        escape_attr(&classes),
        escape_attr(&kind),
        escape_attr(&fold),
        escape_attr(&directive.metadata),
    ))));
    out.push(Event::Html(CowStr::Borrowed(
        r#"<div class="callout-title"><div class="callout-icon"></div><div class="callout-title-inner">"#,
    )));
    if title.is_empty() {
        out.push(Event::Text(CowStr::from(title_case(&kind))));
    } else {
        out.extend(title);
    }
    out.push(Event::Html(CowStr::Borrowed("</div>")));
    if !fold.is_empty() {
        out.push(Event::Html(CowStr::Borrowed(r#"<div class="fold-callout-icon"></div>"#)));
    }
    out.push(Event::Html(CowStr::Borrowed(r#"</div><div class="callout-content">"#)));
    out.extend(body);
    out.push(Event::Html(CowStr::Borrowed("</div></blockquote>")));
}
