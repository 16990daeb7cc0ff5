//! Grammars for the Obsidian dialect syntax.
//!
//! Each syntax form (wikilink target, embed display text, callout
//! directive, tag token, highlight span) is specified once here as a
//! named function returning a structured match record. Both the
//! event-stream stages and the raw-HTML substitution stage go through
//! these functions, which keeps the two paths behaviorally identical.

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Wikilink targets
// =============================================================================

/// The structured parts of a wikilink target: `path#anchor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikilinkTarget {
    /// The target path, possibly empty for same-page links like `[[#heading]]`.
    pub path: String,
    /// The anchor (heading or `^block` reference), without the leading `#`.
    pub anchor: Option<String>,
}

/// Split a raw wikilink target into path and anchor.
///
/// Malformed input never fails: an empty anchor is treated as absent.
pub fn wikilink_target(raw: &str) -> WikilinkTarget {
    match raw.split_once('#') {
        Some((path, anchor)) => WikilinkTarget {
            path: path.trim().to_string(),
            anchor: match anchor.trim() {
                "" => None,
                a => Some(a.to_string()),
            },
        },
        None => WikilinkTarget {
            path: raw.trim().to_string(),
            anchor: None,
        },
    }
}

// =============================================================================
// Image embed display text
// =============================================================================

static EMBED_DISPLAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(.*)[|\s])?\s*(\d+)(?:x(\d*))?\s*$").unwrap());

/// Display attributes extracted from an image embed's alias text.
///
/// `![[img.png|alt text|300x200]]` carries alias `alt text|300x200`;
/// the grammar peels an optional trailing dimension pair off the alt
/// text. Missing values use the `auto` sentinel at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedDisplay {
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Parse an embed alias into alt text and optional dimensions.
///
/// A bare number is width-only; `100x200` is width and height; a
/// trailing `x` with no digits leaves the height absent. Text with no
/// trailing dimensions is all alt. Never fails.
pub fn embed_display(alias: &str) -> EmbedDisplay {
    match EMBED_DISPLAY_RE.captures(alias) {
        Some(caps) => EmbedDisplay {
            alt: caps
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
            width: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            height: caps
                .get(3)
                .filter(|m| !m.as_str().is_empty())
                .and_then(|m| m.as_str().parse().ok()),
        },
        None => EmbedDisplay {
            alt: alias.trim().to_string(),
            ..Default::default()
        },
    }
}

// =============================================================================
// Callout directives
// =============================================================================

static CALLOUT_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[!([\w-]+)(?:\|([^\]]*))?\]([+-]?)[ \t]?(.*)").unwrap());

/// Fold state declared by a callout directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutFold {
    /// `+`: collapsible, default expanded.
    Expanded,
    /// `-`: collapsible, default collapsed.
    Collapsed,
}

impl CalloutFold {
    pub fn marker(self) -> char {
        match self {
            CalloutFold::Expanded => '+',
            CalloutFold::Collapsed => '-',
        }
    }
}

/// A parsed callout directive line: `[!kind|metadata]state title…`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutDirective {
    /// The raw kind as written, before alias canonicalization.
    pub kind: String,
    /// Free-form metadata between `|` and `]`, empty if absent.
    pub metadata: String,
    /// Fold marker, if the callout is collapsible.
    pub fold: Option<CalloutFold>,
    /// Title text on the directive line after the closing bracket.
    /// Trailing whitespace is kept so inline siblings that follow the
    /// directive text stay spaced.
    pub title: String,
}

/// Match a callout directive at the start of a block-quote line.
///
/// Returns `None` when the line is not a directive, in which case the
/// block quote must be left untouched.
pub fn callout_directive(line: &str) -> Option<CalloutDirective> {
    let first_line = line.split('\n').next().unwrap_or(line);
    let caps = CALLOUT_DIRECTIVE_RE.captures(first_line)?;
    Some(CalloutDirective {
        kind: caps[1].to_string(),
        metadata: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
        fold: match caps.get(3).map(|m| m.as_str()) {
            Some("+") => Some(CalloutFold::Expanded),
            Some("-") => Some(CalloutFold::Collapsed),
            _ => None,
        },
        title: caps[4].trim_start().to_string(),
    })
}

/// Alias table mapping historical and alternate callout names onto the
/// canonical kinds. A kind absent from the table is its own canonical
/// custom kind.
const CALLOUT_ALIASES: &[(&str, &str)] = &[
    ("summary", "abstract"),
    ("tldr", "abstract"),
    ("hint", "tip"),
    ("important", "tip"),
    ("check", "success"),
    ("done", "success"),
    ("help", "question"),
    ("faq", "question"),
    ("caution", "warning"),
    ("attention", "warning"),
    ("fail", "failure"),
    ("missing", "failure"),
    ("error", "danger"),
    ("cite", "quote"),
];

/// Canonicalize a callout kind. Idempotent: canonical kinds map to
/// themselves, unrecognized kinds pass through lower-cased.
pub fn canonical_callout_kind(kind: &str) -> String {
    let kind = kind.to_lowercase();
    CALLOUT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == kind)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(kind)
}

// =============================================================================
// Tags and highlights
// =============================================================================

/// Tag token inside plain text: `#path/to/tag`, preceded by start of
/// text or whitespace. Every `/`-separated segment must be non-empty
/// and start alphanumeric, so a trailing `/` stays outside the match.
/// The leading capture keeps the preceding character so replacements
/// can put it back (the regex crate has no lookbehind).
pub static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|\s)#([\p{L}\p{N}][\p{L}\p{N}_-]*(?:/[\p{L}\p{N}][\p{L}\p{N}_-]*)*)").unwrap()
});

static NUMERIC_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\d/]+$").unwrap());

/// A value of only digits and slashes is a numeric fragment the
/// tokenizer misread (issue numbers, dates), not a tag.
pub fn is_numeric_tag(value: &str) -> bool {
    NUMERIC_TAG_RE.is_match(value)
}

/// Highlight span inside plain text: `==content==`, single line.
pub static HIGHLIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"==([^=\n]+)==").unwrap());

/// Wikilink syntax for the raw-HTML substitution path. Group 1 is the
/// optional embed `!`, group 2 the target path, group 3 the `#anchor`,
/// group 4 the alias.
pub static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[\[([^\[\]|#]*)(#[^\[\]|]*)?(?:\|([^\[\]]*))?\]\]").unwrap()
});

// =============================================================================
// URLs
// =============================================================================

static EXTERNAL_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(?:https?|ftp)://|mailto:)").unwrap());

static OBSIDIAN_URI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^obsidian://").unwrap());

/// Whether a wikilink target is an absolute URL that should pass
/// through verbatim. `obsidian://` vault URIs count only when the
/// corresponding feature is on.
pub fn is_external_url(target: &str, allow_obsidian_uri: bool) -> bool {
    EXTERNAL_URL_RE.is_match(target)
        || (allow_obsidian_uri && OBSIDIAN_URI_RE.is_match(target))
}

static YOUTUBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/(?:watch\?v=|embed/)|youtu\.be/)([A-Za-z0-9_-]{11})").unwrap()
});

static YOUTUBE_PLAYLIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([A-Za-z0-9_-]+)").unwrap());

/// A YouTube reference extracted from an image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YouTubeRef {
    Video(String),
    Playlist(String),
}

pub fn youtube_ref(url: &str) -> Option<YouTubeRef> {
    if let Some(caps) = YOUTUBE_RE.captures(url) {
        return Some(YouTubeRef::Video(caps[1].to_string()));
    }
    if url.contains("youtube.com/playlist") {
        if let Some(caps) = YOUTUBE_PLAYLIST_RE.captures(url) {
            return Some(YouTubeRef::Playlist(caps[1].to_string()));
        }
    }
    None
}

static TWEET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:twitter\.com|x\.com)/[A-Za-z0-9_]+/status/\d+").unwrap()
});

pub fn is_tweet_url(url: &str) -> bool {
    TWEET_RE.is_match(url)
}

/// Trailing block reference on a paragraph: ` ^block-id` at end of line.
pub static BLOCK_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\^([-A-Za-z0-9]+)\s*$").unwrap());

// =============================================================================
// Media extensions
// =============================================================================

/// Media classification of an embed target by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Pdf,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "svg", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogv", "mov", "mkv", "avi", "m4v"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg", "3gp", "flac"];

/// Classify a target path by extension. `None` means an unrecognized or
/// missing extension; embeds of such targets become transcludes.
pub fn media_kind(path: &str) -> Option<MediaKind> {
    let ext = path.rsplit_once('.')?.1.to_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Audio)
    } else if ext == "pdf" {
        Some(MediaKind::Pdf)
    } else {
        None
    }
}

/// Whether a path has a recognized playable video extension.
pub fn has_video_extension(path: &str) -> bool {
    media_kind(path) == Some(MediaKind::Video)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_splits_path_and_anchor() {
        let t = wikilink_target("Note#Section");
        assert_eq!(t.path, "Note");
        assert_eq!(t.anchor.as_deref(), Some("Section"));

        let t = wikilink_target("Note");
        assert_eq!(t.anchor, None);

        // Empty anchor is treated as absent, not an error.
        let t = wikilink_target("Note#");
        assert_eq!(t.path, "Note");
        assert_eq!(t.anchor, None);

        let t = wikilink_target("#^block");
        assert_eq!(t.path, "");
        assert_eq!(t.anchor.as_deref(), Some("^block"));
    }

    #[test]
    fn display_parses_dimensions() {
        assert_eq!(
            embed_display("alt text|300x200"),
            EmbedDisplay { alt: "alt text".into(), width: Some(300), height: Some(200) }
        );
        assert_eq!(
            embed_display("300"),
            EmbedDisplay { alt: String::new(), width: Some(300), height: None }
        );
        assert_eq!(
            embed_display("just some alt"),
            EmbedDisplay { alt: "just some alt".into(), width: None, height: None }
        );
        assert_eq!(
            embed_display("alt 300x200"),
            EmbedDisplay { alt: "alt".into(), width: Some(300), height: Some(200) }
        );
    }

    #[test]
    fn display_width_trailing_x() {
        // `alt|100x` leaves height absent rather than zero.
        assert_eq!(
            embed_display("alt|100x"),
            EmbedDisplay { alt: "alt".into(), width: Some(100), height: None }
        );
    }

    #[test]
    fn directive_full_form() {
        let d = callout_directive("[!warning|meta]- Custom Title").unwrap();
        assert_eq!(d.kind, "warning");
        assert_eq!(d.metadata, "meta");
        assert_eq!(d.fold, Some(CalloutFold::Collapsed));
        assert_eq!(d.title, "Custom Title");
    }

    #[test]
    fn directive_minimal_form() {
        let d = callout_directive("[!note]").unwrap();
        assert_eq!(d.kind, "note");
        assert_eq!(d.metadata, "");
        assert_eq!(d.fold, None);
        assert_eq!(d.title, "");
    }

    #[test]
    fn directive_rejects_plain_quotes() {
        assert!(callout_directive("just a quote").is_none());
        assert!(callout_directive("[note] no bang").is_none());
    }

    #[test]
    fn callout_canonicalization_is_idempotent() {
        assert_eq!(canonical_callout_kind("tldr"), "abstract");
        assert_eq!(canonical_callout_kind("abstract"), "abstract");
        assert_eq!(canonical_callout_kind("Caution"), "warning");
        assert_eq!(canonical_callout_kind("warning"), "warning");
        // Unrecognized kinds pass through as custom kinds.
        assert_eq!(canonical_callout_kind("my-custom"), "my-custom");
        assert_eq!(
            canonical_callout_kind(&canonical_callout_kind("my-custom")),
            "my-custom"
        );
    }

    #[test]
    fn tag_token_segments_are_nonempty() {
        let caps = TAG_RE.captures("see #rust/ now").unwrap();
        assert_eq!(&caps[2], "rust");
        let caps = TAG_RE.captures("#deep/learning done").unwrap();
        assert_eq!(&caps[2], "deep/learning");
        assert!(TAG_RE.captures("no #/ tag").is_none());
    }

    #[test]
    fn numeric_tags_are_guarded() {
        assert!(is_numeric_tag("42/7"));
        assert!(is_numeric_tag("2024"));
        assert!(!is_numeric_tag("v2"));
        assert!(!is_numeric_tag("rust/2024"));
    }

    #[test]
    fn external_urls() {
        assert!(is_external_url("https://example.com", false));
        assert!(is_external_url("mailto:me@example.com", false));
        assert!(!is_external_url("obsidian://open?vault=x", false));
        assert!(is_external_url("obsidian://open?vault=x", true));
        assert!(!is_external_url("Some Note", true));
    }

    #[test]
    fn youtube_refs() {
        assert_eq!(
            youtube_ref("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some(YouTubeRef::Video("dQw4w9WgXcQ".into()))
        );
        assert_eq!(
            youtube_ref("https://youtu.be/dQw4w9WgXcQ"),
            Some(YouTubeRef::Video("dQw4w9WgXcQ".into()))
        );
        assert_eq!(
            youtube_ref("https://www.youtube.com/playlist?list=PL123abc"),
            Some(YouTubeRef::Playlist("PL123abc".into()))
        );
        assert_eq!(youtube_ref("https://example.com/video.mp4"), None);
    }

    #[test]
    fn media_kinds() {
        assert_eq!(media_kind("a.PNG"), Some(MediaKind::Image));
        assert_eq!(media_kind("clip.mp4"), Some(MediaKind::Video));
        assert_eq!(media_kind("song.flac"), Some(MediaKind::Audio));
        assert_eq!(media_kind("paper.pdf"), Some(MediaKind::Pdf));
        assert_eq!(media_kind("Other Note"), None);
        assert_eq!(media_kind("archive.tar.gz"), None);
    }
}
