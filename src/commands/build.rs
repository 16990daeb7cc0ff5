use std::path::Path;

use crate::BuildArgs;
use crate::assets::{AssetKind, registered_assets};
use crate::config::Config;
use crate::render::{NoteOutput, RenderOptions, render_note};
use crate::slug::slugify_tag;
use crate::vault::{Note, Vault};

pub fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    let config = Config::load_from_arg(args.config_file.as_deref())?;

    let vault = Vault::discover(&config.vault.path)?;
    let known_slugs = vault.slugs();
    let output_dir = &config.vault.output;

    let assets = registered_assets(&config.features);
    for asset in &assets {
        let path = output_dir.join(asset.name);
        ensure_parent(&path)?;
        std::fs::write(&path, asset.contents)?;
    }

    let options = RenderOptions {
        features: &config.features,
        base_url: &config.site.base_url,
        known_slugs: Some(&known_slugs),
    };
    let mut index = Vec::with_capacity(vault.notes.len());
    for note in &vault.notes {
        let output = render_note(&note.body, &options);
        let page = page_html(note, &output, &config, &assets);
        let path = output_dir.join(format!("{}.html", note.slug));
        ensure_parent(&path)?;
        std::fs::write(&path, page)?;
        index.push(IndexEntry {
            slug: &note.slug,
            title: note.title(),
            tags: merged_tags(note, &output),
            diagram: output.meta.has_mermaid,
        });
    }

    // Machine-readable index of the built notes, for search and
    // navigation consumers.
    std::fs::write(
        output_dir.join("index.json"),
        serde_json::to_string_pretty(&index)?,
    )?;

    for asset in &vault.assets {
        let from = vault.root.join(&asset.source_path);
        let to = output_dir.join(&asset.slug);
        ensure_parent(&to)?;
        std::fs::copy(&from, &to)?;
    }

    println!(
        "Built {} notes and {} files to {}",
        vault.notes.len(),
        vault.assets.len(),
        output_dir.display()
    );

    Ok(())
}

/// One note's entry in the built `index.json`.
#[derive(serde::Serialize)]
struct IndexEntry<'a> {
    slug: &'a str,
    title: String,
    tags: Vec<String>,
    diagram: bool,
}

/// Tags declared in front matter merged with tags found in the body,
/// deduplicated through the same slug form.
fn merged_tags(note: &Note, output: &NoteOutput) -> Vec<String> {
    let mut tags = output.meta.tags.clone();
    tags.extend(note.front_matter.tags.iter().map(|t| slugify_tag(t)));
    tags.into_iter().collect()
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) => std::fs::create_dir_all(parent),
        None => Ok(()),
    }
}

/// Wrap one rendered note body in a page shell: title, merged tags as
/// keywords, and the enabled assets (diagram assets only on pages that
/// contain one).
fn page_html(
    note: &Note,
    output: &NoteOutput,
    config: &Config,
    assets: &[crate::assets::Asset],
) -> String {
    let base = config.site.base_url.trim_end_matches('/');
    let mut head = String::new();
    let mut scripts = String::new();
    for asset in assets {
        if asset.diagram_only && !output.meta.has_mermaid {
            continue;
        }
        match asset.kind {
            AssetKind::Style => {
                head.push_str(&format!(
                    "<link rel=\"stylesheet\" href=\"{}/{}\">\n",
                    base, asset.name
                ));
            }
            AssetKind::Script => {
                scripts.push_str(&format!(
                    "<script type=\"module\" src=\"{}/{}\"></script>\n",
                    base, asset.name
                ));
            }
        }
    }

    let tags = merged_tags(note, output);
    let keywords = if tags.is_empty() {
        String::new()
    } else {
        format!("<meta name=\"keywords\" content=\"{}\">\n", tags.join(", "))
    };

    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}{}</head>\n<body>\n{}\n{}</body>\n</html>\n",
        crate::util::escape_html(&note.title()),
        keywords,
        head,
        output.html,
        scripts,
    )
}
