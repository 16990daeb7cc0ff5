//! Configuration type definitions.
//!
//! These types are pure data - no I/O or complex logic. The feature
//! record is read once at startup and shared immutably by every note
//! rendered in the invocation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-feature toggles for the Obsidian dialect.
///
/// Each flag independently enables or disables the correspondingly
/// named transform stage or tokenizer feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Strip `%%…%%` comment regions before parsing.
    pub comments: bool,
    /// Rewrite `==…==` spans into highlight markup.
    pub highlight: bool,
    /// Parse and resolve `[[wikilinks]]` and `![[embeds]]`.
    pub wikilinks: bool,
    /// Restructure `> [!kind]` block quotes into callouts.
    pub callouts: bool,
    /// Tag `mermaid` code fences for client-side diagram rendering.
    pub mermaid: bool,
    /// Turn `#tags` into tag-index links and collect them.
    pub parse_tags: bool,
    /// Turn trailing `^block-id` markers into block anchors.
    pub parse_block_references: bool,
    /// Re-apply wikilink/highlight/tag rewriting inside raw HTML regions.
    pub enable_in_html_embed: bool,
    /// Replace images of YouTube URLs with embed iframes.
    pub enable_youtube_embed: bool,
    /// Replace lone tweet links with tweet-embed blockquotes.
    pub enable_tweet_embed: bool,
    /// Replace images with video extensions with video elements.
    pub enable_video_embed: bool,
    /// Render task-list markers as live checkboxes.
    pub enable_checkbox: bool,
    /// Treat `obsidian://` vault URIs as external links.
    pub enable_obsidian_uri: bool,
    /// Render wikilinks to unknown slugs as inert broken-link markers.
    pub disable_broken_wikilinks: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            comments: true,
            highlight: true,
            wikilinks: true,
            callouts: true,
            mermaid: true,
            parse_tags: true,
            parse_block_references: true,
            enable_in_html_embed: false,
            enable_youtube_embed: true,
            enable_tweet_embed: true,
            enable_video_embed: true,
            enable_checkbox: false,
            enable_obsidian_uri: true,
            disable_broken_wikilinks: false,
        }
    }
}

/// Site-level settings used when emitting links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefix for generated site-absolute URLs such as tag pages.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { base_url: String::new() }
    }
}

/// Vault input/output settings for the build command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Directory holding the markdown notes.
    pub path: PathBuf,
    /// Directory the rendered HTML fragments are written to.
    pub output: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            output: PathBuf::from("public"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_defaults_match_documented_values() {
        let f = FeatureConfig::default();
        assert!(f.comments);
        assert!(f.highlight);
        assert!(f.wikilinks);
        assert!(f.callouts);
        assert!(f.mermaid);
        assert!(f.parse_tags);
        assert!(f.parse_block_references);
        assert!(!f.enable_in_html_embed);
        assert!(f.enable_youtube_embed);
        assert!(f.enable_tweet_embed);
        assert!(f.enable_video_embed);
        assert!(!f.enable_checkbox);
        assert!(f.enable_obsidian_uri);
        assert!(!f.disable_broken_wikilinks);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let f: FeatureConfig = serde_yaml::from_str("enable_checkbox: true").unwrap();
        assert!(f.enable_checkbox);
        assert!(f.wikilinks);
        assert!(!f.enable_in_html_embed);
    }
}
