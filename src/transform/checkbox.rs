//! Interactive task list checkboxes.
//!
//! The default renderer emits disabled checkboxes for task list items.
//! When enabled, this stage swaps each marker for a live checkbox
//! carrying the toggle class the bundled script looks for.

use pulldown_cmark::{CowStr, Event};

use super::{NoteContext, Transform};
use crate::config::FeatureConfig;

pub struct CheckboxRewriter;

impl Transform for CheckboxRewriter {
    fn name(&self) -> &'static str {
        "checkbox"
    }

    fn enabled(&self, features: &FeatureConfig) -> bool {
        features.enable_checkbox
    }

    fn apply(
        &self,
        events: Vec<Event<'static>>,
        _ctx: &mut NoteContext<'_>,
    ) -> Vec<Event<'static>> {
        events
            .into_iter()
            .map(|event| match event {
                Event::TaskListMarker(checked) => {
                    let html = if checked {
                        r#"<input type="checkbox" class="checkbox-toggle" checked>"#
                    } else {
                        r#"<input type="checkbox" class="checkbox-toggle">"#
                    };
                    Event::InlineHtml(CowStr::Borrowed(html))
                }
                other => other,
            })
            .collect()
    }
}
