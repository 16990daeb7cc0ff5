//! Pre-tokenization text normalization.
//!
//! These transforms run on the raw note text before the markdown parser
//! sees it. They are pure text-to-text rewrites and never touch lines
//! outside their own grammar.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::FeatureConfig;

/// A callout-opening line: block-quote marker(s), directive, optional
/// fold marker, then the rest of the line.
static CALLOUT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<prefix> *>[> ]*)(?P<rest>\[!\w[\w-]*(?:\|[^\n\[\]]*)?\][+-]?.*)$")
        .unwrap()
});

/// Obsidian comment region: `%%…%%`, possibly spanning lines.
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)%%.*?%%").unwrap());

/// Apply the enabled pre-parse transforms to raw note text.
pub fn preprocess(src: &str, features: &FeatureConfig) -> String {
    let src: Cow<'_, str> = if features.comments {
        strip_comments(src)
    } else {
        Cow::Borrowed(src)
    };
    if features.callouts {
        split_callout_lines(&src).into_owned()
    } else {
        src.into_owned()
    }
}

/// Remove `%%…%%` comment regions.
pub fn strip_comments(src: &str) -> Cow<'_, str> {
    COMMENT_RE.replace_all(src, "")
}

/// Insert an empty quoted line after every callout-opening line.
///
/// The block-quote grammar would otherwise merge the directive line
/// with the first body line into one paragraph, which makes per-line
/// callout detection impossible downstream. The inserted continuation
/// line reuses the matched quote prefix so nesting depth is preserved.
/// Text without callout lines passes through unchanged, so the rewrite
/// is idempotent there.
pub fn split_callout_lines(src: &str) -> Cow<'_, str> {
    CALLOUT_LINE_RE.replace_all(src, |caps: &Captures<'_>| {
        format!("{}{}\n{}", &caps["prefix"], &caps["rest"], caps["prefix"].trim_end())
    })
}
