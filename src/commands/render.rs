use crate::RenderArgs;
use crate::config::Config;
use crate::render::{RenderOptions, render_note};
use crate::vault::parse_front_matter;

/// Render a single note to stdout.
///
/// Standalone rendering has no slug registry, so broken-link detection
/// is off even when the config enables it.
pub fn run(args: &RenderArgs) -> Result<(), anyhow::Error> {
    let config = Config::load_from_arg(args.config_file.as_deref())?;

    let content = std::fs::read_to_string(&args.input)?;
    let parsed = parse_front_matter(&content);

    let options = RenderOptions {
        features: &config.features,
        base_url: &config.site.base_url,
        known_slugs: None,
    };
    let output = render_note(&parsed.body, &options);

    println!("{}", output.html);

    if !output.meta.tags.is_empty() {
        eprintln!("tags: {}", output.meta.tags.into_iter().collect::<Vec<_>>().join(", "));
    }

    Ok(())
}
