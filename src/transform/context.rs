//! Per-note context shared by transform stages.

use std::collections::{BTreeSet, HashSet};

use crate::config::FeatureConfig;

/// Side-channel metadata accumulated while transforming one note.
///
/// Created empty per note, mutated by the tag and diagram stages, read
/// by the caller after processing completes. Never shared across notes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NoteMeta {
    /// Canonical tag slugs discovered in the note. A set, so repeated
    /// or differently-cased occurrences of one tag collapse.
    pub tags: BTreeSet<String>,
    /// Whether the note contains at least one diagram code fence.
    pub has_mermaid: bool,
}

/// Context passed to every transform stage for one note.
///
/// Holds the immutable feature record and slug registry alongside the
/// note's mutable metadata. One context per note; nothing here is
/// shared mutably across notes.
pub struct NoteContext<'a> {
    /// Dialect feature toggles, read-only.
    pub features: &'a FeatureConfig,
    /// Site root prefix for generated absolute URLs (tag pages).
    pub base_url: &'a str,
    /// Slugs of every known note in the vault, when rendering within a
    /// vault. `None` for standalone rendering, where link existence
    /// cannot be tested.
    pub known_slugs: Option<&'a HashSet<String>>,
    /// Metadata accumulated by the stages.
    pub meta: NoteMeta,
}

impl<'a> NoteContext<'a> {
    pub fn new(
        features: &'a FeatureConfig,
        base_url: &'a str,
        known_slugs: Option<&'a HashSet<String>>,
    ) -> Self {
        Self {
            features,
            base_url,
            known_slugs,
            meta: NoteMeta::default(),
        }
    }

    /// Whether a slug resolves to a known note. `None` when there is no
    /// registry to test against.
    pub fn slug_exists(&self, slug: &str) -> Option<bool> {
        self.known_slugs.map(|slugs| slugs.contains(slug))
    }

    /// URL of the index page for a tag slug.
    pub fn tag_url(&self, slug: &str) -> String {
        format!("{}/tags/{}", self.base_url.trim_end_matches('/'), slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_set_deduplicates() {
        let features = FeatureConfig::default();
        let mut ctx = NoteContext::new(&features, "", None);
        ctx.meta.tags.insert("rust".to_string());
        ctx.meta.tags.insert("rust".to_string());
        assert_eq!(ctx.meta.tags.len(), 1);
    }

    #[test]
    fn slug_existence_needs_a_registry() {
        let features = FeatureConfig::default();
        let ctx = NoteContext::new(&features, "", None);
        assert_eq!(ctx.slug_exists("anything"), None);

        let slugs: HashSet<String> = ["known".to_string()].into();
        let ctx = NoteContext::new(&features, "", Some(&slugs));
        assert_eq!(ctx.slug_exists("known"), Some(true));
        assert_eq!(ctx.slug_exists("missing"), Some(false));
    }

    #[test]
    fn tag_urls_join_base() {
        let features = FeatureConfig::default();
        let ctx = NoteContext::new(&features, "/garden/", None);
        assert_eq!(ctx.tag_url("rust"), "/garden/tags/rust");
        let ctx = NoteContext::new(&features, "", None);
        assert_eq!(ctx.tag_url("rust"), "/tags/rust");
    }
}
