use crate::client::GroundingMetadata;

pub const SOURCES_HEADER: &str = "\n\n---\n**Sources:**\n";
const UNTITLED_SOURCE: &str = "Source";

/// Renders grounding chunks as a numbered source list.
///
/// Chunks without a web URI are skipped and do not consume an index. Returns
/// an empty string when nothing survives, so the result can always be appended
/// to the answer text.
#[must_use]
pub fn format_citations(metadata: Option<&GroundingMetadata>) -> String {
    let Some(chunks) = metadata.and_then(|metadata| metadata.grounding_chunks.as_deref()) else {
        return String::new();
    };

    let lines: Vec<String> = chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.as_deref().filter(|uri| !uri.is_empty())?;
            let title = web
                .title
                .as_deref()
                .filter(|title| !title.is_empty())
                .unwrap_or(UNTITLED_SOURCE);
            Some((title, uri))
        })
        .enumerate()
        .map(|(index, (title, uri))| format!("[{}] {title}: {uri}", index + 1))
        .collect();

    if lines.is_empty() {
        return String::new();
    }

    format!("{SOURCES_HEADER}{}", lines.join("\n"))
}
