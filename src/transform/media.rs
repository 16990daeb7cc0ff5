//! Media classification of image nodes.
//!
//! Runs after wikilink resolution so that non-wikilink image syntax
//! (`![](clip.mp4)`, bare YouTube links pasted as images) gains the
//! same treatment as embeds: video-extension targets become video
//! elements, YouTube URLs become embed iframes, and a paragraph
//! holding nothing but a tweet link becomes a tweet-embed blockquote.

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};

use super::{NoteContext, Transform};
use crate::config::FeatureConfig;
use crate::grammar::{self, YouTubeRef};
use crate::util::escape_attr;

pub struct MediaClassifier;

impl Transform for MediaClassifier {
    fn name(&self) -> &'static str {
        "media"
    }

    fn enabled(&self, features: &FeatureConfig) -> bool {
        features.enable_video_embed
            || features.enable_youtube_embed
            || features.enable_tweet_embed
    }

    fn apply(
        &self,
        events: Vec<Event<'static>>,
        ctx: &mut NoteContext<'_>,
    ) -> Vec<Event<'static>> {
        let mut out = Vec::with_capacity(events.len());
        let mut i = 0;
        while i < events.len() {
            match &events[i] {
                Event::Start(Tag::Image { dest_url, .. }) => {
                    let end = find_end(&events, i, TagEnd::Image);
                    if ctx.features.enable_video_embed
                        && grammar::has_video_extension(dest_url)
                    {
                        out.push(Event::InlineHtml(CowStr::from(format!(
                            r#"<video src="{}" controls></video>"#,
                            escape_attr(dest_url)
                        ))));
                        i = end + 1;
                        continue;
                    }
                    if ctx.features.enable_youtube_embed {
                        if let Some(yt) = grammar::youtube_ref(dest_url) {
                            out.push(Event::InlineHtml(CowStr::from(youtube_iframe(&yt))));
                            i = end + 1;
                            continue;
                        }
                    }
                    out.push(events[i].clone());
                }
                Event::Start(Tag::Paragraph) if ctx.features.enable_tweet_embed => {
                    if let Some((url, end)) = lone_tweet_link(&events, i) {
                        out.push(Event::Html(CowStr::from(format!(
                            r#"<blockquote class="twitter-tweet"><a href="{}"></a></blockquote>"#,
                            escape_attr(&url)
                        ))));
                        i = end + 1;
                        continue;
                    }
                    out.push(events[i].clone());
                }
                _ => out.push(events[i].clone()),
            }
            i += 1;
        }
        out
    }
}

fn find_end(events: &[Event<'_>], start: usize, end: TagEnd) -> usize {
    events[start + 1..]
        .iter()
        .position(|e| matches!(e, Event::End(t) if *t == end))
        .map(|offset| start + 1 + offset)
        .unwrap_or(events.len() - 1)
}

fn youtube_iframe(yt: &YouTubeRef) -> String {
    let src = match yt {
        YouTubeRef::Video(id) => format!("https://www.youtube.com/embed/{id}"),
        YouTubeRef::Playlist(id) => {
            format!("https://www.youtube.com/embed/videoseries?list={id}")
        }
    };
    format!(
        r#"<iframe class="external-embed youtube" src="{}" frameborder="0" allow="fullscreen"></iframe>"#,
        escape_attr(&src)
    )
}

/// Match a paragraph whose only content is a single link to a tweet:
/// `Start(Paragraph), Start(Link), text…, End(Link), End(Paragraph)`.
/// Returns the tweet URL and the index of the paragraph end.
fn lone_tweet_link(events: &[Event<'_>], start: usize) -> Option<(String, usize)> {
    let link = match events.get(start + 1) {
        Some(Event::Start(Tag::Link {
            link_type: LinkType::Inline | LinkType::Autolink,
            dest_url,
            ..
        })) if grammar::is_tweet_url(dest_url) => dest_url.to_string(),
        _ => return None,
    };
    let link_end = find_end(events, start + 1, TagEnd::Link);
    match events.get(link_end + 1) {
        Some(Event::End(TagEnd::Paragraph)) => Some((link, link_end + 1)),
        _ => None,
    }
}
