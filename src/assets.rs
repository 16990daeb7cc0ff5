//! Registered client assets.
//!
//! Inline scripts and styles the rendered pages rely on, each gated by
//! the feature that emits the markup it targets. The build command
//! writes the enabled set next to the HTML; none of these participate
//! in the transform itself.

use crate::config::FeatureConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Script,
    Style,
}

/// One registered inline asset.
#[derive(Debug, Clone, Copy)]
pub struct Asset {
    /// Output filename, relative to the output root
    pub name: &'static str,
    pub kind: AssetKind,
    pub contents: &'static str,
    /// Only shipped to pages containing a diagram
    pub diagram_only: bool,
}

const CALLOUT_FOLD_SCRIPT: Asset = Asset {
    name: "callout-fold.js",
    kind: AssetKind::Script,
    contents: r#"document.querySelectorAll(".callout.is-collapsible .callout-title").forEach(function (title) {
  title.addEventListener("click", function () {
    title.closest(".callout").classList.toggle("is-collapsed");
  });
});
"#,
    diagram_only: false,
};

const CHECKBOX_SCRIPT: Asset = Asset {
    name: "checkbox.js",
    kind: AssetKind::Script,
    contents: r#"document.querySelectorAll("input.checkbox-toggle").forEach(function (box, i) {
  var key = "checkbox-" + location.pathname + "-" + i;
  box.checked = localStorage.getItem(key) === "true";
  box.addEventListener("change", function () {
    localStorage.setItem(key, box.checked);
  });
});
"#,
    diagram_only: false,
};

const MERMAID_SCRIPT: Asset = Asset {
    name: "mermaid-init.js",
    kind: AssetKind::Script,
    contents: r#"import mermaid from "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs";
mermaid.initialize({ startOnLoad: true });
document.querySelectorAll("code.mermaid").forEach(function (block) {
  block.addEventListener("click", function () {
    navigator.clipboard.writeText(block.dataset.clipboard);
  });
});
"#,
    diagram_only: true,
};

const MERMAID_STYLE: Asset = Asset {
    name: "mermaid.css",
    kind: AssetKind::Style,
    contents: r#"code.mermaid { display: block; cursor: pointer; background: none; }
code.mermaid svg { max-width: 100%; }
"#,
    diagram_only: true,
};

const TWEET_SCRIPT: Asset = Asset {
    name: "tweets.js",
    kind: AssetKind::Script,
    contents: r#"var s = document.createElement("script");
s.src = "https://platform.twitter.com/widgets.js";
s.async = true;
document.head.appendChild(s);
"#,
    diagram_only: false,
};

/// The assets enabled under the given feature record.
pub fn registered_assets(features: &FeatureConfig) -> Vec<Asset> {
    let mut assets = Vec::new();
    if features.callouts {
        assets.push(CALLOUT_FOLD_SCRIPT);
    }
    if features.enable_checkbox {
        assets.push(CHECKBOX_SCRIPT);
    }
    if features.mermaid {
        assets.push(MERMAID_SCRIPT);
        assets.push(MERMAID_STYLE);
    }
    if features.enable_tweet_embed {
        assets.push(TWEET_SCRIPT);
    }
    assets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_features_register_fold_mermaid_and_tweets() {
        let assets = registered_assets(&FeatureConfig::default());
        let names: Vec<_> = assets.iter().map(|a| a.name).collect();
        assert!(names.contains(&"callout-fold.js"));
        assert!(names.contains(&"mermaid-init.js"));
        assert!(names.contains(&"mermaid.css"));
        assert!(names.contains(&"tweets.js"));
        assert!(!names.contains(&"checkbox.js"));
    }

    #[test]
    fn disabling_features_drops_their_assets() {
        let features = FeatureConfig {
            callouts: false,
            mermaid: false,
            enable_tweet_embed: false,
            ..Default::default()
        };
        assert!(registered_assets(&features).is_empty());
    }
}
