//! Vault discovery: walking the note directory and parsing front matter.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::slug::slugify_path;
use crate::util::title_case;

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum VaultError {
    #[error("vault path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("vault path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read directory entry in {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read note {path}: {source}")]
    ReadNote {
        path: PathBuf,
        source: std::io::Error,
    },
}

// =============================================================================
// Front matter
// =============================================================================

/// Front matter metadata parsed from a note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Note title (overrides the filename-derived title)
    pub title: Option<String>,
    /// Tags declared up front, merged with tags found in the body
    #[serde(default)]
    pub tags: Vec<String>,
    /// Additional arbitrary metadata, passed through untouched
    #[serde(flatten)]
    pub extra: std::collections::HashMap<String, serde_yaml::Value>,
}

/// Result of splitting a note into front matter and body.
#[derive(Debug)]
pub struct ParsedNote {
    /// The parsed front matter (empty if none found)
    pub front_matter: FrontMatter,
    /// The markdown body without the front matter block
    pub body: String,
}

/// Parse front matter from note content.
///
/// Front matter is a YAML block delimited by `---` at the start of the
/// file. A malformed block is reported and skipped; the note still
/// renders with empty front matter.
pub fn parse_front_matter(content: &str) -> ParsedNote {
    let content = content.trim_start();

    if !content.starts_with("---") {
        return ParsedNote {
            front_matter: FrontMatter::default(),
            body: content.to_string(),
        };
    }

    let after_opening = &content[3..];
    let Some(closing_pos) = after_opening.find("\n---") else {
        // No closing delimiter, treat the whole file as markdown
        return ParsedNote {
            front_matter: FrontMatter::default(),
            body: content.to_string(),
        };
    };

    let yaml_content = after_opening[..closing_pos].trim_start_matches('\n');

    let body_start = 3 + closing_pos + 4; // "---" + yaml + "\n---"
    let body = if body_start < content.len() {
        content[body_start..].trim_start_matches('\n').to_string()
    } else {
        String::new()
    };

    let front_matter = match serde_yaml::from_str(yaml_content) {
        Ok(fm) => fm,
        Err(e) => {
            eprintln!("Warning: failed to parse front matter: {}", e);
            FrontMatter::default()
        }
    };

    ParsedNote { front_matter, body }
}

// =============================================================================
// Vault items
// =============================================================================

/// A markdown note discovered in the vault, loaded and split.
#[derive(Debug, Clone)]
pub struct Note {
    /// Path relative to the vault root (e.g. "daily/2024 Plans.md")
    pub source_path: PathBuf,
    /// The slug the note is published under (e.g. "daily/2024-Plans")
    pub slug: String,
    /// Front matter metadata
    pub front_matter: FrontMatter,
    /// The markdown body without front matter
    pub body: String,
}

impl Note {
    /// The note title, falling back to the title-cased filename.
    pub fn title(&self) -> String {
        self.front_matter.title.clone().unwrap_or_else(|| {
            self.source_path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(title_case)
                .unwrap_or_else(|| "Untitled".to_string())
        })
    }
}

/// A non-markdown file (image, media, PDF) copied through to the output
/// under its slugified path.
#[derive(Debug, Clone)]
pub struct AssetFile {
    /// Path relative to the vault root
    pub source_path: PathBuf,
    /// Slugified output path
    pub slug: String,
}

// =============================================================================
// Vault
// =============================================================================

/// A discovered vault: every note loaded, every asset located.
#[derive(Debug)]
pub struct Vault {
    pub root: PathBuf,
    pub notes: Vec<Note>,
    pub assets: Vec<AssetFile>,
}

impl Vault {
    /// Walk the vault directory and load every note.
    pub fn discover(root: &Path) -> Result<Self, VaultError> {
        if !root.exists() {
            return Err(VaultError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(VaultError::NotADirectory(root.to_path_buf()));
        }

        let mut vault = Self {
            root: root.to_path_buf(),
            notes: Vec::new(),
            assets: Vec::new(),
        };
        vault.walk_directory(root, &PathBuf::new())?;
        Ok(vault)
    }

    /// The slug registry used for broken-link detection.
    pub fn slugs(&self) -> HashSet<String> {
        self.notes.iter().map(|n| n.slug.clone()).collect()
    }

    fn walk_directory(&mut self, dir: &Path, relative_path: &Path) -> Result<(), VaultError> {
        let entries = std::fs::read_dir(dir).map_err(|e| VaultError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| VaultError::ReadEntry {
                path: dir.to_path_buf(),
                source: e,
            })?;

            let path = entry.path();
            let file_name = entry.file_name();
            let file_name_str = file_name.to_string_lossy();

            // Hidden files, and the places notes never live
            if file_name_str.starts_with('.') {
                continue;
            }
            if path.is_dir() && matches!(file_name_str.as_ref(), "node_modules" | "target") {
                continue;
            }

            let item_relative_path = relative_path.join(&file_name);

            if path.is_dir() {
                self.walk_directory(&path, &item_relative_path)?;
            } else if path.is_file() {
                self.classify_file(&path, &item_relative_path)?;
            }
        }

        Ok(())
    }

    fn classify_file(&mut self, full_path: &Path, relative_path: &Path) -> Result<(), VaultError> {
        let relative_str = relative_path.to_string_lossy().replace('\\', "/");
        let extension = relative_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("md" | "markdown") => {
                let content =
                    std::fs::read_to_string(full_path).map_err(|e| VaultError::ReadNote {
                        path: full_path.to_path_buf(),
                        source: e,
                    })?;
                let parsed = parse_front_matter(&content);
                self.notes.push(Note {
                    source_path: relative_path.to_path_buf(),
                    slug: slugify_path(&relative_str),
                    front_matter: parsed.front_matter,
                    body: parsed.body,
                });
            }
            _ => {
                self.assets.push(AssetFile {
                    source_path: relative_path.to_path_buf(),
                    slug: slugify_path(&relative_str),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_matter_with_tags() {
        let content = "---\ntitle: My Note\ntags:\n  - rust\n  - notes/daily\n---\n\nbody\n";
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.front_matter.title, Some("My Note".to_string()));
        assert_eq!(parsed.front_matter.tags, vec!["rust", "notes/daily"]);
        assert_eq!(parsed.body.trim(), "body");
    }

    #[test]
    fn front_matter_custom_fields_pass_through() {
        let content = "---\ntitle: Custom\nauthor: Someone\n---\n\nContent here\n";
        let parsed = parse_front_matter(content);
        assert!(parsed.front_matter.extra.contains_key("author"));
    }

    #[test]
    fn no_front_matter() {
        let parsed = parse_front_matter("# Just Markdown\n\nNo front matter here.");
        assert_eq!(parsed.front_matter.title, None);
        assert!(parsed.front_matter.tags.is_empty());
        assert!(parsed.body.starts_with("# Just Markdown"));
    }

    #[test]
    fn unterminated_front_matter_is_body() {
        let parsed = parse_front_matter("---\ntitle: Oops\n\nNo closing fence");
        assert_eq!(parsed.front_matter.title, None);
        assert!(parsed.body.contains("No closing fence"));
    }

    #[test]
    fn note_title_fallback() {
        let note = Note {
            source_path: PathBuf::from("daily/weekly-review.md"),
            slug: "daily/weekly-review".to_string(),
            front_matter: FrontMatter::default(),
            body: String::new(),
        };
        assert_eq!(note.title(), "Weekly Review");
    }
}
