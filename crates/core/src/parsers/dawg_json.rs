use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{DawgNode, MAX_DEPTH};

#[derive(Debug, Error)]
pub enum DawgJsonParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document is {depth} levels deep, limit is {max}")]
    TooDeep { depth: usize, max: usize },
}

/// Parse an exported DAWG document:
///
/// ```json
/// { "Label": "root", "IsEndOfWord": false, "Edges": { "x": { ... } } }
/// ```
///
/// Field names are case-sensitive. A missing `Label` or `IsEndOfWord` is an
/// error; a missing `Edges` is a leaf. JSON has no references, so the
/// result never shares nodes even when the exporter's graph did.
///
/// Each level costs two JSON nesting levels, so serde_json's fixed nesting
/// limit is lifted and the stack grows on demand instead. Documents deeper
/// than [`MAX_DEPTH`] are rejected after parsing.
pub fn parse_dawg_json(data: &[u8]) -> Result<Arc<DawgNode>, DawgJsonParseError> {
    let mut json = serde_json::Deserializer::from_slice(data);
    json.disable_recursion_limit();
    let root = DawgNode::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;

    let depth = root.depth();
    if depth > MAX_DEPTH {
        return Err(DawgJsonParseError::TooDeep {
            depth,
            max: MAX_DEPTH,
        });
    }
    tracing::debug!(label = %root.label, edges = root.edges.len(), "parsed DAWG document");
    Ok(Arc::new(root))
}
