//! MCP server runner for gemini-search-mcp.

use gemini_search_core::{GenerativeModel, SearchService};
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use tracing::info;

use crate::GeminiSearchMcp;

/// Serves the MCP server over stdio until the client disconnects.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio<M: GenerativeModel + 'static>(
    service: SearchService<M>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let server = GeminiSearchMcp::new(service);
    let (stdin, stdout) = stdio();
    let running = serve_server(server, (stdin, stdout)).await?;
    info!("serving gemini-search over stdio");
    let _ = running.waiting().await?;
    info!("stdio transport closed");
    Ok(())
}
