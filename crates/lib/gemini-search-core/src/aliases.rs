//! Model alias table.
//!
//! Short names such as `flash` or `pro` map onto canonical Gemini model ids.
//! Canonical ids map onto themselves so either spelling can be configured.

pub const DEFAULT_MODEL_ALIAS: &str = "flash";

const MODEL_ALIASES: &[(&str, &str)] = &[
    ("flash", "gemini-2.5-flash"),
    ("flash-lite", "gemini-2.5-flash-lite"),
    ("pro", "gemini-2.5-pro"),
    ("gemini-2.5-flash", "gemini-2.5-flash"),
    ("gemini-2.5-flash-lite", "gemini-2.5-flash-lite"),
    ("gemini-2.5-pro", "gemini-2.5-pro"),
];

/// Resolves a model alias to its canonical id.
///
/// Lookup is case-insensitive. Unknown input is returned verbatim and treated
/// as an already-canonical model id.
#[must_use]
pub fn resolve_model(input: &str) -> String {
    let key = input.to_lowercase();
    MODEL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or_else(|| input.to_string(), |(_, canonical)| (*canonical).to_string())
}
