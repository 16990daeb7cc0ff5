//! Re-application of dialect syntax inside raw HTML regions.
//!
//! The tokenizer leaves the inside of raw HTML untokenized, so
//! wikilinks, highlights, and tags written there survive as literal
//! text. When enabled, this stage rewrites them by regex substitution
//! over the raw value, reusing the same grammar functions as the
//! event-path stages so the two paths cannot drift apart.
//!
//! Embed syntax (`![[…]]`) inside raw HTML is intentionally passed
//! through unmodified; only plain references are resolved here.

use std::borrow::Cow;

use pulldown_cmark::{CowStr, Event};
use regex::Captures;

use super::{NoteContext, Transform};
use crate::config::FeatureConfig;
use crate::grammar::{self, HIGHLIGHT_RE, TAG_RE, WIKILINK_RE, is_numeric_tag};
use crate::slug::{slugify_anchor, slugify_path, slugify_tag};
use crate::util::{escape_attr, escape_html};

pub struct HtmlEmbedRewriter;

impl Transform for HtmlEmbedRewriter {
    fn name(&self) -> &'static str {
        "html-embed"
    }

    fn enabled(&self, features: &FeatureConfig) -> bool {
        features.enable_in_html_embed
    }

    fn apply(
        &self,
        events: Vec<Event<'static>>,
        ctx: &mut NoteContext<'_>,
    ) -> Vec<Event<'static>> {
        events
            .into_iter()
            .map(|event| match event {
                Event::Html(value) => Event::Html(CowStr::from(rewrite_raw(&value, ctx))),
                Event::InlineHtml(value) => {
                    Event::InlineHtml(CowStr::from(rewrite_raw(&value, ctx)))
                }
                other => other,
            })
            .collect()
    }
}

/// Apply wikilink, highlight, and tag substitution over one raw HTML
/// value, in the same order the event-path stages run.
fn rewrite_raw(value: &str, ctx: &mut NoteContext<'_>) -> String {
    let value = rewrite_wikilinks(value, ctx);
    let value = rewrite_highlights(&value);
    rewrite_tags(&value, ctx).into_owned()
}

fn rewrite_wikilinks<'t>(value: &'t str, ctx: &NoteContext<'_>) -> Cow<'t, str> {
    WIKILINK_RE.replace_all(value, |caps: &Captures<'_>| {
        // Embeds are not re-resolved here to avoid double-processing.
        if &caps[1] == "!" {
            return caps[0].to_string();
        }
        let raw_target = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let raw_anchor = caps.get(3).map(|m| m.as_str()).unwrap_or("");
        let alias = caps
            .get(4)
            .map(|m| m.as_str().trim())
            .filter(|a| !a.is_empty());
        let raw = format!("{raw_target}{raw_anchor}");

        if grammar::is_external_url(raw_target, ctx.features.enable_obsidian_uri) {
            let text = alias.unwrap_or(&raw);
            return format!(r#"<a href="{}">{}</a>"#, escape_attr(&raw), escape_html(text));
        }

        let slug = slugify_path(raw_target);
        if ctx.features.disable_broken_wikilinks
            && !slug.is_empty()
            && ctx.slug_exists(&slug) == Some(false)
        {
            let text = alias.unwrap_or(&raw);
            return format!(r#"<a class="internal broken">{}</a>"#, escape_html(text));
        }

        let anchor = grammar::wikilink_target(&raw)
            .anchor
            .as_deref()
            .map(slugify_anchor);
        let url = match anchor {
            Some(a) => format!("{slug}#{a}"),
            None => slug,
        };
        let text = alias.unwrap_or(&raw);
        format!(r#"<a href="{}">{}</a>"#, escape_attr(&url), escape_html(text))
    })
}

fn rewrite_highlights(value: &str) -> String {
    HIGHLIGHT_RE
        .replace_all(value, |caps: &Captures<'_>| {
            format!(r#"<span class="text-highlight">{}</span>"#, escape_html(&caps[1]))
        })
        .into_owned()
}

fn rewrite_tags<'t>(value: &'t str, ctx: &mut NoteContext<'_>) -> Cow<'t, str> {
    // The closure borrows the context immutably for URL building, so
    // discovered tags are collected on the side and merged afterwards.
    let mut found = Vec::new();
    let rewritten = TAG_RE.replace_all(value, |caps: &Captures<'_>| {
        let lead = &caps[1];
        let tag = &caps[2];
        if is_numeric_tag(tag) {
            return format!("{lead}#{tag}");
        }
        let slug = slugify_tag(tag);
        let link = format!(
            r#"{}<a href="{}" class="tag-link">{}</a>"#,
            lead,
            ctx.tag_url(&slug),
            slug
        );
        found.push(slug);
        link
    });
    ctx.meta.tags.extend(found);
    rewritten
}
