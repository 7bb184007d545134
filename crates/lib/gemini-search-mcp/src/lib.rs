//! MCP server implementation for gemini-search-mcp.
//!
//! This crate wires the search service into an rmcp tool handler and exposes
//! the single `gemini-search` tool.

mod tools;
pub mod server;

use std::sync::Arc;

use gemini_search_core::{GenerativeModel, SearchService};
use rmcp::{ServerHandler, handler::server::tool::ToolRouter, tool_handler};
use rmcp::model::{Implementation, ServerCapabilities, ServerInfo};

pub use tools::search::SearchParams;

pub const SERVER_NAME: &str = "gemini-search-mcp";

const SERVER_INSTRUCTIONS: &str = r"gemini-search-mcp answers natural-language questions with Gemini, grounded in Google Search.

Call `gemini-search` with a `query`. The answer is plain text; when web sources were used, a
numbered `Sources:` list follows a `---` separator. Failures are returned as text starting with
`Error: `.";

/// MCP server wrapper around the search service and its tool router.
pub struct GeminiSearchMcp<M> {
    tool_router: ToolRouter<Self>,
    service: Arc<SearchService<M>>,
}

impl<M> Clone for GeminiSearchMcp<M> {
    fn clone(&self) -> Self {
        Self {
            tool_router: self.tool_router.clone(),
            service: self.service.clone(),
        }
    }
}

impl<M: GenerativeModel + 'static> GeminiSearchMcp<M> {
    /// Creates a new server owning the search service.
    #[must_use]
    pub fn new(service: SearchService<M>) -> Self {
        Self::with_service(Arc::new(service))
    }

    /// Creates a new server using a shared search service handle.
    #[must_use]
    pub fn with_service(service: Arc<SearchService<M>>) -> Self {
        Self {
            tool_router: Self::tool_router_search(),
            service,
        }
    }

    #[must_use]
    pub fn service(&self) -> &SearchService<M> {
        &self.service
    }
}

#[tool_handler]
impl<M: GenerativeModel + 'static> ServerHandler for GeminiSearchMcp<M> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
