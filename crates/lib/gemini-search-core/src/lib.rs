//! Core types and services for gemini-search-mcp.
//!
//! This crate resolves process configuration, talks to the Gemini API with
//! Google Search grounding enabled, and shapes answers and their grounding
//! sources into plain text for the MCP layer.

pub mod aliases;
pub mod citations;
pub mod client;
pub mod config;
pub mod search;

pub use client::{GeminiClient, GenerativeModel, ModelError};
pub use config::{ConfigError, ConfigInputs, SearchConfig};
pub use search::SearchService;
