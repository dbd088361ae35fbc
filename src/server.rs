use crate::app::{ComicApp, ResourceOutcome, ToolOutcome};
use crate::tools::comic::input_schema;
use crate::widgets::Widget;

use rmcp::model::{
    AnnotateAble, CallToolRequestParam, CallToolResult, Content, Implementation,
    ListResourceTemplatesResult, ListResourcesResult, ListToolsResult, Meta, PaginatedRequestParam,
    RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ResourceContents,
    ResourceTemplate, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub const MIME_TYPE: &str = "text/html+skybridge";

#[derive(Clone)]
pub struct XkcdServer {
    app: Arc<ComicApp>,
}

impl XkcdServer {
    pub fn new(app: Arc<ComicApp>) -> Self {
        Self { app }
    }
}

fn widget_meta(widget: &Widget) -> Map<String, Value> {
    let meta = json!({
        "openai/outputTemplate": widget.template_uri,
        "openai/toolInvocation/invoking": widget.invoking,
        "openai/toolInvocation/invoked": widget.invoked,
        "openai/widgetAccessible": true,
        "openai/resultCanProduceWidget": true,
        "annotations": {
            "destructiveHint": false,
            "openWorldHint": false,
            "readOnlyHint": true,
        },
    });
    match meta {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn embedded_widget(widget: &Widget) -> Value {
    json!({
        "type": "resource",
        "resource": {
            "uri": widget.template_uri,
            "mimeType": MIME_TYPE,
            "text": widget.html,
            "title": widget.title,
        },
    })
}

/// Result-level metadata for a rendered widget. Unlike [`widget_meta`] it
/// carries the freshly rendered HTML so the host can hydrate without a read.
fn result_meta(widget: &Widget) -> Map<String, Value> {
    let mut meta = widget_meta(widget);
    meta.remove("annotations");
    meta.insert("openai.com/widget".into(), embedded_widget(widget));
    meta
}

pub fn tool_for(widget: &Widget) -> Tool {
    let mut tool = Tool::new(widget.identifier.clone(), widget.title.clone(), Arc::new(input_schema()));
    tool.title = Some(widget.title.clone());
    tool.meta = Some(Meta(widget_meta(widget)));
    tool
}

pub fn tool_result(outcome: ToolOutcome) -> Result<CallToolResult, McpError> {
    match outcome {
        ToolOutcome::Rejected { message } => Ok(CallToolResult::error(vec![Content::text(message)])),
        ToolOutcome::Rendered { widget, payload } => {
            let structured = serde_json::to_value(&payload)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            let mut result = CallToolResult::success(vec![Content::text(widget.response_text.clone())]);
            result.structured_content = Some(structured);
            result.meta = Some(Meta(result_meta(&widget)));
            Ok(result)
        }
    }
}

pub fn resource_result(outcome: ResourceOutcome) -> Result<ReadResourceResult, McpError> {
    match outcome {
        ResourceOutcome::Found { widget, html } => {
            let contents = ResourceContents::TextResourceContents {
                uri: widget.template_uri.clone(),
                mime_type: Some(MIME_TYPE.into()),
                text: html,
                meta: Some(Meta(widget_meta(&widget))),
            };
            Ok(ReadResourceResult { contents: vec![contents] })
        }
        ResourceOutcome::Unknown { uri } => {
            Err(McpError::resource_not_found(format!("Unknown resource: {uri}"), None))
        }
    }
}

pub fn resource_for(widget: &Widget) -> Resource {
    let mut raw = RawResource::new(widget.template_uri.clone(), widget.title.clone());
    raw.title = Some(widget.title.clone());
    raw.description = Some(format!("{} widget markup", widget.title));
    raw.mime_type = Some(MIME_TYPE.into());
    raw.meta = Some(Meta(widget_meta(widget)));
    raw.no_annotation()
}

/// Resource templates have no `_meta` slot in the protocol model; hosts pick
/// the widget metadata up from the tool and resource listings instead.
pub fn resource_template_for(widget: &Widget) -> Result<ResourceTemplate, McpError> {
    serde_json::from_value(json!({
        "uriTemplate": widget.template_uri,
        "name": widget.title,
        "title": widget.title,
        "description": format!("{} widget markup", widget.title),
        "mimeType": MIME_TYPE,
    }))
    .map_err(|e| McpError::internal_error(e.to_string(), None))
}

// Allow manual_async_fn because the trait signature uses `impl Future` return types
#[allow(clippy::manual_async_fn)]
impl ServerHandler for XkcdServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "xkcd-widget".into(),
                title: Some("XKCD ChatGPT App".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            capabilities: ServerCapabilities::builder().enable_resources().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _req: Option<PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            let tools = self.app.registry().all().iter().map(tool_for).collect();
            Ok(ListToolsResult::with_all_items(tools))
        }
    }

    fn call_tool(
        &self,
        req: CallToolRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { tool_result(self.app.call_tool(&req.name, req.arguments).await) }
    }

    fn list_resources(
        &self,
        _req: Option<PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            let resources = self.app.registry().all().iter().map(resource_for).collect();
            Ok(ListResourcesResult::with_all_items(resources))
        }
    }

    fn list_resource_templates(
        &self,
        _req: Option<PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourceTemplatesResult, McpError>> + Send + '_ {
        async move {
            let templates = self
                .app
                .registry()
                .all()
                .iter()
                .map(resource_template_for)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ListResourceTemplatesResult::with_all_items(templates))
        }
    }

    fn read_resource(
        &self,
        req: ReadResourceRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move { resource_result(self.app.read_resource(&req.uri)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ComicPayload;
    use crate::widgets::xkcd_viewer;

    #[test]
    fn test_tool_for_widget() {
        let tool = tool_for(&xkcd_viewer());
        assert_eq!(tool.name, "xkcd-viewer");
        assert_eq!(tool.title.as_deref(), Some("XKCD Comic Viewer"));
        assert!(tool.input_schema.contains_key("properties"));

        let meta = tool.meta.unwrap();
        assert_eq!(meta.0["openai/outputTemplate"], "ui://widget/xkcd-viewer.html");
        assert_eq!(meta.0["annotations"]["readOnlyHint"], true);
    }

    #[test]
    fn test_rejected_outcome_is_error_result() {
        let result = tool_result(ToolOutcome::Rejected { message: "Unknown tool: nonexistent-tool".into() }).unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(result.structured_content.is_none());

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["text"], "Unknown tool: nonexistent-tool");
    }

    #[test]
    fn test_rendered_outcome_carries_widget() {
        let widget = xkcd_viewer().with_render("<p>comic</p>".into(), "Displaying XKCD #1: Barrel".into());
        let payload = ComicPayload::Error { error: "boom".into() };
        let result = tool_result(ToolOutcome::Rendered { widget, payload }).unwrap();

        assert_ne!(result.is_error, Some(true));
        assert_eq!(result.structured_content, Some(json!({"error": "boom"})));

        let meta = result.meta.unwrap();
        assert_eq!(meta.0["openai/toolInvocation/invoking"], "Fetching XKCD comic...");
        assert_eq!(meta.0["openai/resultCanProduceWidget"], true);
        assert_eq!(meta.0["openai.com/widget"]["resource"]["text"], "<p>comic</p>");
        assert_eq!(meta.0["openai.com/widget"]["resource"]["mimeType"], MIME_TYPE);

        let value = serde_json::to_value(&result.content).unwrap();
        assert_eq!(value[0]["text"], "Displaying XKCD #1: Barrel");
    }

    #[test]
    fn test_found_resource_result() {
        let widget = xkcd_viewer();
        let result = resource_result(ResourceOutcome::Found { widget, html: "<p>cached</p>".into() }).unwrap();

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["contents"][0]["uri"], "ui://widget/xkcd-viewer.html");
        assert_eq!(value["contents"][0]["mimeType"], MIME_TYPE);
        assert_eq!(value["contents"][0]["text"], "<p>cached</p>");
    }

    #[test]
    fn test_unknown_resource_is_reported_on_the_wire() {
        let err = resource_result(ResourceOutcome::Unknown { uri: "ui://widget/nope.html".into() }).unwrap_err();

        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["message"], "Unknown resource: ui://widget/nope.html");
        assert_eq!(value["code"], -32002);
    }

    #[test]
    fn test_resource_listing_carries_widget_meta() {
        let value = serde_json::to_value(resource_for(&xkcd_viewer())).unwrap();

        assert_eq!(value["uri"], "ui://widget/xkcd-viewer.html");
        assert_eq!(value["name"], "XKCD Comic Viewer");
        assert_eq!(value["description"], "XKCD Comic Viewer widget markup");
        assert_eq!(value["mimeType"], MIME_TYPE);
        assert_eq!(value["_meta"]["openai/outputTemplate"], "ui://widget/xkcd-viewer.html");
        assert_eq!(value["_meta"]["openai/widgetAccessible"], true);
    }

    #[test]
    fn test_resource_template_listing() {
        let value = serde_json::to_value(resource_template_for(&xkcd_viewer()).unwrap()).unwrap();

        assert_eq!(value["uriTemplate"], "ui://widget/xkcd-viewer.html");
        assert_eq!(value["title"], "XKCD Comic Viewer");
        assert_eq!(value["mimeType"], MIME_TYPE);
        // No metadata slot on templates; the widget meta travels on the resource listing.
        assert!(value.get("_meta").is_none());
    }
}
