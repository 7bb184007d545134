//! Daemon entry point for the Gemini search MCP server.
//!
//! Loads configuration from flags, the environment, and the optional settings
//! file, then serves the `gemini-search` tool over stdio.

mod config;
mod logging;
mod settings;

use std::fmt::Display;
use std::process::ExitCode;

use clap::Parser;
use gemini_search_core::{GeminiClient, SearchService};
use gemini_search_mcp::server::serve_stdio;
use tracing::info;

use crate::config::{CliArgs, DaemonConfig};

/// Reports a startup failure. Written straight to stderr so it survives any log filter.
fn fatal(message: impl Display) -> ExitCode {
    eprintln!("Error: {message}");
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = logging::init(args.log_filter()) {
        eprintln!("warning: failed to install log subscriber: {err}");
    }

    let config = match DaemonConfig::try_from(args) {
        Ok(config) => config,
        Err(err) => return fatal(err),
    };
    info!(
        model = %config.search.model(),
        web_search = config.search.web_search(),
        thinking_budget = config.search.thinking_budget(),
        settings_file = ?config.settings_file,
        "configuration loaded"
    );

    let client = match GeminiClient::from_config(&config.search) {
        Ok(client) => client,
        Err(err) => return fatal(format_args!("failed to build Gemini client: {err}")),
    };

    let service = SearchService::new(config.search, client);
    if let Err(err) = serve_stdio(service).await {
        return fatal(format_args!("fatal error in main: {err}"));
    }
    ExitCode::SUCCESS
}
