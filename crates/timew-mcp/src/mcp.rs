//! MCP (Model Context Protocol) server implementation.
//!
//! Provides MCP tools for driving Timewarrior:
//! - `start_timer` - Start a new interval with tags
//! - `stop_timer` - Stop all tracking, or only the given tags
//! - `get_summary` - Aggregate report of tracked time
//! - `list_tags` - Tags in use, optionally within a range

use std::sync::Arc;

use axum::Router;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
    },
    ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use timew_core::{
    ContentItem, ListTagsRequest, StartRequest, StopRequest, SummaryRequest, ToolFailure,
    ToolResponse,
};
use timew_exec::CommandRunner;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::operations::{OperationError, Timewarrior};

/// Tool names, in registration order.
pub const TOOL_NAMES: [&str; 4] = ["start_timer", "stop_timer", "get_summary", "list_tags"];

/// MCP server for Timewarrior operations.
#[derive(Clone)]
pub struct TimewMcpServer {
    timew: Timewarrior,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

// ============================================================================
// Tool Parameter Types
// ============================================================================

/// Parameters for start_timer tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StartTimerParams {
    /// List of tags to associate with the new timer interval.
    #[schemars(length(min = 1))]
    pub tags: Vec<String>,
}

/// Parameters for stop_timer tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StopTimerParams {
    /// Optional list of tags to stop tracking. If omitted or empty, stops all currently active tracking.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Parameters for get_summary tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetSummaryParams {
    /// Optional date range or range hint (e.g., 'today', 'this.week', '1 day', '2025-04-20..2025-04-29'). Defaults to 'day'.
    #[serde(default)]
    pub range: Option<String>,

    /// Optional list of tags to filter the summary by.
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Whether to include the 'ID' column in the summary. Defaults to true.
    #[serde(rename = "showIds", default = "default_show_ids")]
    pub show_ids: bool,
}

fn default_show_ids() -> bool {
    true
}

/// Parameters for list_tags tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListTagsParams {
    /// Optional date range or range hint to filter tags used within that period (e.g., 'today', 'this.week', '1 day', '2025-04-20..2025-04-29'). If omitted, lists all tags ever used.
    #[serde(default)]
    pub range: Option<String>,
}

impl From<StartTimerParams> for StartRequest {
    fn from(params: StartTimerParams) -> Self {
        StartRequest { tags: params.tags }
    }
}

impl From<StopTimerParams> for StopRequest {
    fn from(params: StopTimerParams) -> Self {
        StopRequest { tags: params.tags }
    }
}

impl From<GetSummaryParams> for SummaryRequest {
    fn from(params: GetSummaryParams) -> Self {
        SummaryRequest {
            range: params.range,
            tags: params.tags,
            show_ids: params.show_ids,
        }
    }
}

impl From<ListTagsParams> for ListTagsRequest {
    fn from(params: ListTagsParams) -> Self {
        ListTagsRequest {
            range: params.range,
        }
    }
}

// ============================================================================
// Result Conversion
// ============================================================================

fn success(response: ToolResponse) -> CallToolResult {
    let content = response
        .content
        .into_iter()
        .map(|item| match item {
            ContentItem::Text { text } => Content::text(text),
        })
        .collect();
    CallToolResult::success(content)
}

/// Raised failures become tool errors, so the call itself reports `isError`.
fn failure(failure: ToolFailure) -> CallToolResult {
    CallToolResult::error(vec![Content::text(failure.message().to_string())])
}

fn into_call_result(result: Result<ToolResponse, ToolFailure>) -> CallToolResult {
    match result {
        Ok(response) => success(response),
        Err(e) => failure(e),
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl TimewMcpServer {
    /// Create a new MCP server running commands through the given runner.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            timew: Timewarrior::new(runner),
            tool_router: Self::tool_router(),
        }
    }

    /// Start a new interval.
    #[tool(
        description = "Starts a new Timewarrior timer interval with the specified tags. MUST use list_tags first to ensure consistent tags."
    )]
    async fn start_timer(
        &self,
        Parameters(params): Parameters<StartTimerParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.timew.start_timer(&params.into()).await {
            Ok(response) => Ok(success(response)),
            Err(OperationError::InvalidRequest(e)) => {
                Err(McpError::invalid_params(e.to_string(), None))
            }
            Err(OperationError::Failed(e)) => Ok(failure(e)),
        }
    }

    /// Stop the running interval.
    #[tool(description = "Stops the currently running Timewarrior interval.")]
    async fn stop_timer(
        &self,
        Parameters(params): Parameters<StopTimerParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_call_result(self.timew.stop_timer(&params.into()).await))
    }

    /// Summarize tracked time.
    #[tool(
        description = "Generates an aggregate report of tracked time, optionally filtered by range and/or tags."
    )]
    async fn get_summary(
        &self,
        Parameters(params): Parameters<GetSummaryParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_call_result(self.timew.get_summary(&params.into()).await))
    }

    /// List known tags.
    #[tool(
        description = "Lists tags used in Timewarrior intervals. Use this before starting a timer to ensure similar tags are repeated for better reporting. Optionally filtered by a date range."
    )]
    async fn list_tags(
        &self,
        Parameters(params): Parameters<ListTagsParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_call_result(self.timew.list_tags(&params.into()).await))
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl ServerHandler for TimewMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: "timewarrior-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Timewarrior MCP Server - Track time with Timewarrior. \
                 Use list_tags before start_timer so tags stay consistent, \
                 stop_timer to end tracking, and get_summary for reports."
                    .to_string(),
            ),
        }
    }
}

// ============================================================================
// HTTP Server Setup
// ============================================================================

/// Create an axum Router for the MCP HTTP server.
///
/// This router handles MCP protocol requests over HTTP using the Streamable HTTP transport,
/// mounted at `/mcp`.
pub fn create_mcp_router(runner: Arc<dyn CommandRunner>, ct: CancellationToken) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(TimewMcpServer::new(runner.clone())),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            cancellation_token: ct,
            ..Default::default()
        },
    );

    info!("MCP server initialized with Streamable HTTP transport");

    Router::new()
        .nest_service("/mcp", service)
        .layer(TraceLayer::new_for_http())
}
