use crate::render::PLACEHOLDER_HTML;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// A templated UI surface the host can render.
///
/// Widgets are immutable; [`Widget::with_render`] derives a new value rather
/// than touching the registry's copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub identifier: String,
    pub title: String,
    pub template_uri: String,
    pub invoking: String,
    pub invoked: String,
    pub html: String,
    pub response_text: String,
}

impl Widget {
    pub fn with_render(&self, html: String, response_text: String) -> Self {
        Self {
            html,
            response_text,
            ..self.clone()
        }
    }
}

pub fn xkcd_viewer() -> Widget {
    Widget {
        identifier: "xkcd-viewer".into(),
        title: "XKCD Comic Viewer".into(),
        template_uri: "ui://widget/xkcd-viewer.html".into(),
        invoking: "Fetching XKCD comic...".into(),
        invoked: "XKCD comic loaded successfully".into(),
        html: PLACEHOLDER_HTML.into(),
        response_text: "Ready to fetch XKCD comics. Request a comic to get started!".into(),
    }
}

#[derive(Debug)]
pub struct WidgetRegistry {
    widgets: Vec<Widget>,
    by_id: HashMap<String, usize>,
    by_uri: HashMap<String, usize>,
}

impl WidgetRegistry {
    pub fn new(widgets: Vec<Widget>) -> Self {
        let by_id = widgets.iter().enumerate().map(|(i, w)| (w.identifier.clone(), i)).collect();
        let by_uri = widgets.iter().enumerate().map(|(i, w)| (w.template_uri.clone(), i)).collect();
        Self { widgets, by_id, by_uri }
    }

    pub fn all(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn count(&self) -> usize {
        self.widgets.len()
    }

    pub fn get_by_id(&self, identifier: &str) -> Option<&Widget> {
        self.by_id.get(identifier).map(|&i| &self.widgets[i])
    }

    pub fn get_by_uri(&self, uri: &str) -> Option<&Widget> {
        self.by_uri.get(uri).map(|&i| &self.widgets[i])
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new(vec![xkcd_viewer()])
    }
}

/// Most recently rendered HTML per template URI.
///
/// Last write wins. Concurrent tool calls for the same widget race, and a
/// reader sees whichever completed write landed last.
#[derive(Debug, Default)]
pub struct WidgetHtmlCache {
    entries: RwLock<HashMap<String, String>>,
}

impl WidgetHtmlCache {
    pub fn store(&self, template_uri: &str, html: String) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(template_uri.to_string(), html);
    }

    pub fn get(&self, template_uri: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(template_uri)
            .cloned()
    }

    /// Cached HTML for the widget, or its placeholder if nothing was rendered yet.
    pub fn html_for(&self, widget: &Widget) -> String {
        self.get(&widget.template_uri).unwrap_or_else(|| widget.html.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_lookups() {
        let registry = WidgetRegistry::default();
        assert_eq!(registry.count(), 1);

        let widget = registry.get_by_id("xkcd-viewer").unwrap();
        assert_eq!(widget.template_uri, "ui://widget/xkcd-viewer.html");
        assert_eq!(registry.get_by_uri("ui://widget/xkcd-viewer.html"), Some(widget));

        assert!(registry.get_by_id("nonexistent-tool").is_none());
        assert!(registry.get_by_uri("ui://widget/other.html").is_none());
    }

    #[test]
    fn test_widgets_have_required_fields() {
        for widget in WidgetRegistry::default().all() {
            assert!(!widget.identifier.is_empty());
            assert!(!widget.title.is_empty());
            assert!(!widget.template_uri.is_empty());
            assert!(!widget.html.is_empty());
            assert!(!widget.response_text.is_empty());
        }
    }

    #[test]
    fn test_with_render_leaves_original_untouched() {
        let registry = WidgetRegistry::default();
        let original = registry.get_by_id("xkcd-viewer").unwrap();
        let updated = original.with_render("<p>hi</p>".into(), "Displaying".into());

        assert_eq!(updated.html, "<p>hi</p>");
        assert_eq!(updated.identifier, original.identifier);
        assert_eq!(registry.get_by_id("xkcd-viewer").unwrap().html, PLACEHOLDER_HTML);
    }

    #[test]
    fn test_cache_falls_back_to_placeholder_and_overwrites() {
        let cache = WidgetHtmlCache::default();
        let widget = xkcd_viewer();

        assert_eq!(cache.html_for(&widget), PLACEHOLDER_HTML);

        cache.store(&widget.template_uri, "first".into());
        cache.store(&widget.template_uri, "second".into());
        assert_eq!(cache.html_for(&widget), "second");
    }
}
