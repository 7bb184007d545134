use gemini_search_core::GenerativeModel;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::GeminiSearchMcp;

/// Parameters for the `gemini-search` tool.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    /// Natural language query to search and analyze. Ask questions, search for information, or
    /// request analysis of complex topics.
    pub query: String,
}

#[tool_router(router = tool_router_search, vis = "pub")]
impl<M: GenerativeModel + 'static> GeminiSearchMcp<M> {
    #[tool(
        name = "gemini-search",
        description = "An AI agent powered by Gemini 2.5 Flash with Google Search grounding.
Useful for finding the latest information, troubleshooting errors, researching topics,
and discussing ideas. Returns responses with cited sources from the web."
    )]
    async fn gemini_search(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(query_len = params.query.len(), "gemini-search invoked");
        let answer = self.service.search(&params.query).await;
        Ok(CallToolResult::success(vec![Content::text(answer)]))
    }
}
