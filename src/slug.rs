//! Slug normalization for note paths, tags, and heading anchors.
//!
//! A slug is the URL-safe identity of a note or tag. Wikilink targets,
//! the vault slug registry, and tag index links all go through these
//! functions, so they must be deterministic and idempotent.

/// Slugify a single path or tag segment.
///
/// Whitespace becomes `-`; characters that are not alphanumeric, `-`,
/// `_`, or `.` are dropped.
fn slugify_segment(segment: &str) -> String {
    segment
        .trim()
        .replace(char::is_whitespace, "-")
        .replace(|c: char| !c.is_alphanumeric() && c != '-' && c != '_' && c != '.', "")
}

/// Normalize a wikilink target or vault-relative file path into a slug.
///
/// Path separators are preserved, each segment is sanitized, and a
/// trailing `.md` extension is stripped (other extensions are kept so
/// media targets stay addressable). Case is preserved: note files keep
/// their authored casing in URLs.
pub fn slugify_path(path: &str) -> String {
    let path = path.trim().trim_matches('/');
    let slug = path
        .split('/')
        .map(slugify_segment)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    match slug.strip_suffix(".md") {
        Some(stripped) => stripped.to_string(),
        None => slug,
    }
}

/// Normalize a tag value into a slug.
///
/// Lower-cases and sanitizes each `/`-separated segment while keeping
/// the segment structure, so `Deep/Learning` and `deep/learning` land on
/// the same tag page.
pub fn slugify_tag(tag: &str) -> String {
    tag.trim_matches('/')
        .split('/')
        .map(|seg| slugify_segment(seg).to_lowercase())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalize a heading anchor into an HTML fragment identifier.
///
/// Lower-cased, whitespace to `-`, punctuation dropped. A leading `^`
/// (block reference anchor) is preserved so block anchors stay distinct
/// from heading anchors.
pub fn slugify_anchor(anchor: &str) -> String {
    let anchor = anchor.trim().trim_start_matches('#');
    let (prefix, rest) = match anchor.strip_prefix('^') {
        Some(rest) => ("^", rest),
        None => ("", anchor),
    };
    let slug = rest
        .to_lowercase()
        .replace(char::is_whitespace, "-")
        .replace(|c: char| !c.is_alphanumeric() && c != '-' && c != '_', "");
    format!("{prefix}{slug}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_slugs_preserve_segments() {
        assert_eq!(slugify_path("Folder/My Note.md"), "Folder/My-Note");
        assert_eq!(slugify_path("note"), "note");
        assert_eq!(slugify_path("/leading/slash.md"), "leading/slash");
    }

    #[test]
    fn path_slugs_keep_media_extensions() {
        assert_eq!(slugify_path("media/My Clip.mp4"), "media/My-Clip.mp4");
        assert_eq!(slugify_path("diagram.png"), "diagram.png");
    }

    #[test]
    fn path_slugs_are_idempotent() {
        let once = slugify_path("Some Folder/A B C.md");
        assert_eq!(slugify_path(&once), once);
    }

    #[test]
    fn tag_slugs_lowercase_and_keep_segments() {
        assert_eq!(slugify_tag("Deep/Learning"), "deep/learning");
        assert_eq!(slugify_tag("one"), "one");
        assert_eq!(slugify_tag(&slugify_tag("Deep/Learning")), "deep/learning");
    }

    #[test]
    fn anchor_slugs() {
        assert_eq!(slugify_anchor("#My Section"), "my-section");
        assert_eq!(slugify_anchor("Section 2.1: Overview"), "section-21-overview");
        assert_eq!(slugify_anchor("^block-id"), "^block-id");
    }
}
