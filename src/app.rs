//! Tool-call and resource-read flows, independent of the MCP wire types.

use crate::render::{render_comic, render_error};
use crate::tools::ShowComicParams;
use crate::widgets::{Widget, WidgetHtmlCache, WidgetRegistry};
use crate::xkcd::{extract_comic_number, Comic, XkcdClient};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Structured content returned alongside the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ComicPayload {
    Comic {
        comic_number: u32,
        title: String,
        alt: String,
        img: String,
        date: String,
    },
    Error {
        error: String,
    },
}

impl ComicPayload {
    fn from_comic(comic: &Comic) -> Self {
        Self::Comic {
            comic_number: comic.num,
            title: comic.title.clone(),
            alt: comic.alt.clone(),
            img: comic.image.url.clone(),
            date: comic.date(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ToolOutcome {
    /// Refused before any fetch: unknown tool or invalid input.
    Rejected { message: String },
    /// A widget was rendered, either the comic or an error fragment.
    Rendered { widget: Widget, payload: ComicPayload },
}

#[derive(Debug, Clone)]
pub enum ResourceOutcome {
    Found { widget: Widget, html: String },
    Unknown { uri: String },
}

#[derive(Debug)]
pub struct ComicApp {
    registry: WidgetRegistry,
    cache: WidgetHtmlCache,
    client: XkcdClient,
}

impl ComicApp {
    pub fn new(client: XkcdClient) -> Arc<Self> {
        Self::with_registry(client, WidgetRegistry::default())
    }

    pub fn with_registry(client: XkcdClient, registry: WidgetRegistry) -> Arc<Self> {
        Arc::new(Self {
            registry,
            cache: WidgetHtmlCache::default(),
            client,
        })
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> ToolOutcome {
        let Some(widget) = self.registry.get_by_id(name) else {
            warn!("Unknown tool requested: {}", name);
            return ToolOutcome::Rejected { message: format!("Unknown tool: {name}") };
        };

        let params = match ShowComicParams::from_arguments(arguments) {
            Ok(params) => params,
            Err(e) => {
                return ToolOutcome::Rejected { message: format!("Input validation error: {e}") };
            }
        };

        let comic_number = params
            .comic_number
            .or_else(|| extract_comic_number(&params.user_query));
        info!(
            "Tool {} resolved {:?} to comic {}",
            name,
            params.user_query,
            comic_number.map_or_else(|| "latest".to_string(), |n| format!("#{n}"))
        );

        let (html, response_text, payload) = match self.client.fetch(comic_number).await {
            Ok(comic) => (
                render_comic(&comic),
                format!("Displaying XKCD #{}: {}", comic.num, comic.title),
                ComicPayload::from_comic(&comic),
            ),
            Err(e) => {
                let message = e.to_string();
                warn!("Comic fetch failed: {}", message);
                (
                    render_error(&message),
                    format!("Error: {message}"),
                    ComicPayload::Error { error: message },
                )
            }
        };

        self.cache.store(&widget.template_uri, html.clone());

        ToolOutcome::Rendered {
            widget: widget.with_render(html, response_text),
            payload,
        }
    }

    pub fn read_resource(&self, uri: &str) -> ResourceOutcome {
        match self.registry.get_by_uri(uri) {
            Some(widget) => ResourceOutcome::Found {
                widget: widget.clone(),
                html: self.cache.html_for(widget),
            },
            None => ResourceOutcome::Unknown { uri: uri.to_string() },
        }
    }
}
