//! Wikilink and embed resolution.
//!
//! `[[target#anchor|alias]]` references and `![[…]]` embeds arrive
//! from the tokenizer as link/image nodes with the wikilink link type.
//! Each is replaced by exactly one of: a plain link, an image, a
//! media-embed fragment, a transclude placeholder, or a broken-link
//! marker. The resolver is total: malformed targets and aliases fall
//! through to the least-specific branch, never to a failure.

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};

use super::{NoteContext, Transform, inline_text};
use crate::config::FeatureConfig;
use crate::grammar::{self, MediaKind};
use crate::slug::{slugify_anchor, slugify_path};
use crate::util::{escape_attr, escape_html};

pub struct WikilinkResolver;

impl Transform for WikilinkResolver {
    fn name(&self) -> &'static str {
        "wikilinks"
    }

    fn enabled(&self, features: &FeatureConfig) -> bool {
        features.wikilinks
    }

    fn apply(
        &self,
        events: Vec<Event<'static>>,
        ctx: &mut NoteContext<'_>,
    ) -> Vec<Event<'static>> {
        let mut out = Vec::with_capacity(events.len());
        let mut iter = events.into_iter();
        while let Some(event) = iter.next() {
            match event {
                Event::Start(Tag::Link {
                    link_type: LinkType::WikiLink { has_pothole },
                    dest_url,
                    ..
                }) => {
                    let inner = collect_until(&mut iter, TagEnd::Link);
                    let alias = alias_text(has_pothole, &inner);
                    out.extend(resolve_link(&dest_url, alias, ctx));
                }
                Event::Start(Tag::Image {
                    link_type: LinkType::WikiLink { has_pothole },
                    dest_url,
                    ..
                }) => {
                    let inner = collect_until(&mut iter, TagEnd::Image);
                    let alias = alias_text(has_pothole, &inner);
                    out.push(resolve_embed(&dest_url, alias, ctx));
                }
                other => out.push(other),
            }
        }
        unwrap_lone_block_html(out)
    }
}

/// Drop the paragraph wrapper around a block-level raw fragment that is
/// a paragraph's only child, so transcludes do not render inside `<p>`.
fn unwrap_lone_block_html(events: Vec<Event<'static>>) -> Vec<Event<'static>> {
    let mut out = Vec::with_capacity(events.len());
    let mut i = 0;
    while i < events.len() {
        if i + 2 < events.len()
            && matches!(events[i], Event::Start(Tag::Paragraph))
            && matches!(events[i + 1], Event::Html(_))
            && matches!(events[i + 2], Event::End(TagEnd::Paragraph))
        {
            out.push(events[i + 1].clone());
            i += 3;
            continue;
        }
        out.push(events[i].clone());
        i += 1;
    }
    out
}

/// Consume events up to and including the given end tag, returning the
/// inner events.
fn collect_until(
    iter: &mut impl Iterator<Item = Event<'static>>,
    end: TagEnd,
) -> Vec<Event<'static>> {
    let mut inner = Vec::new();
    for event in iter {
        if matches!(&event, Event::End(e) if *e == end) {
            break;
        }
        inner.push(event);
    }
    inner
}

/// The alias text of a wikilink. Without a pothole the tokenizer
/// synthesizes a text child equal to the raw target, which is not an
/// alias; an empty alias is treated as absent.
fn alias_text(has_pothole: bool, inner: &[Event<'_>]) -> Option<String> {
    if !has_pothole {
        return None;
    }
    let text = inline_text(inner);
    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_string()) }
}

/// Resolve a non-embed wikilink into link events or a broken-link
/// marker. First matching branch wins.
fn resolve_link(raw: &str, alias: Option<String>, ctx: &NoteContext<'_>) -> Vec<Event<'static>> {
    let target = grammar::wikilink_target(raw);

    // Absolute URLs pass through verbatim regardless of configuration.
    if grammar::is_external_url(&target.path, ctx.features.enable_obsidian_uri) {
        let text = alias.unwrap_or_else(|| raw.to_string());
        return link_events(raw.to_string(), text);
    }

    let slug = slugify_path(&target.path);
    let anchor = target.anchor.as_deref().map(slugify_anchor);

    // A wikilink to a slug no known note answers to becomes an inert
    // marker instead of a dead link. Without a slug registry (single
    // file rendering) existence cannot be tested and the link stands.
    if ctx.features.disable_broken_wikilinks
        && !slug.is_empty()
        && ctx.slug_exists(&slug) == Some(false)
    {
        let text = alias.unwrap_or_else(|| raw.to_string());
        return vec![Event::InlineHtml(CowStr::from(format!(
            r#"<a class="internal broken">{}</a>"#,
            escape_html(&text)
        )))];
    }

    let url = match anchor {
        Some(a) => format!("{slug}#{a}"),
        None => slug,
    };
    let text = alias.unwrap_or_else(|| raw.to_string());
    link_events(url, text)
}

fn link_events(url: String, text: String) -> Vec<Event<'static>> {
    vec![
        Event::Start(Tag::Link {
            link_type: LinkType::Inline,
            dest_url: CowStr::from(url),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }),
        Event::Text(CowStr::from(text)),
        Event::End(TagEnd::Link),
    ]
}

/// Resolve an embed wikilink into a media fragment or a transclude
/// placeholder, classified by the target's file extension. Media
/// fragments are phrasing content; the transclude blockquote is
/// block-level and emitted as such.
fn resolve_embed(raw: &str, alias: Option<String>, _ctx: &NoteContext<'_>) -> Event<'static> {
    let target = grammar::wikilink_target(raw);
    let url = slugify_path(&target.path);

    match grammar::media_kind(&target.path) {
        Some(MediaKind::Image) => {
            let display = grammar::embed_display(alias.as_deref().unwrap_or(""));
            let dim = |v: Option<u32>| v.map_or("auto".to_string(), |n| n.to_string());
            Event::InlineHtml(CowStr::from(format!(
                r#"<img src="{}" alt="{}" width="{}" height="{}">"#,
                escape_attr(&url),
                escape_attr(&display.alt),
                dim(display.width),
                dim(display.height),
            )))
        }
        Some(MediaKind::Video) => Event::InlineHtml(CowStr::from(format!(
            r#"<video src="{}" controls></video>"#,
            escape_attr(&url)
        ))),
        Some(MediaKind::Audio) => Event::InlineHtml(CowStr::from(format!(
            r#"<audio src="{}" controls></audio>"#,
            escape_attr(&url)
        ))),
        Some(MediaKind::Pdf) => Event::InlineHtml(CowStr::from(format!(
            r#"<iframe src="{}" class="pdf"></iframe>"#,
            escape_attr(&url)
        ))),
        // Unknown extension: a transclude placeholder a downstream
        // collaborator resolves into the referenced content.
        None => {
            let block = target.anchor.as_deref().map(slugify_anchor).unwrap_or_default();
            let href = if block.is_empty() {
                url.clone()
            } else {
                format!("{url}#{block}")
            };
            Event::Html(CowStr::from(format!(
                r#"<blockquote class="transclude" data-url="{}" data-block="{}" data-embed-alias="{}"><a href="{}" class="transclude-inner">Transclusion of {}</a></blockquote>"#,
                escape_attr(&url),
                escape_attr(&block),
                escape_attr(alias.as_deref().unwrap_or("")),
                escape_attr(&href),
                escape_html(&href),
            )))
        }
    }
}
