pub mod dawg_json;
pub mod word_list;

use std::sync::Arc;

use thiserror::Error;

use crate::model::DawgNode;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("dawg json: {0}")]
    DawgJson(#[from] dawg_json::DawgJsonParseError),
    #[error("word list: {0}")]
    WordList(#[from] word_list::WordListParseError),
    #[error("unable to detect format")]
    UnknownFormat,
}

/// Auto-detect the input format and parse it into a DAWG.
///
/// Detection strategy:
/// 1. Text starting with `{` → exported DAWG document, unless it parses
///    as a JSON object without a `Label` key.
/// 2. A JSON array → not something we can draw.
/// 3. Otherwise treat the bytes as a word list, one word per line. A bare
///    JSON scalar such as `true` or `42` is a one-word list.
pub fn parse_auto(data: &[u8]) -> Result<Arc<DawgNode>, ParseError> {
    match data.trim_ascii_start().first() {
        Some(b'{') => {
            // Deep DAWG documents exceed the default nesting limit of this
            // check and fall through to the DAWG parser.
            if let Ok(serde_json::Value::Object(obj)) = serde_json::from_slice(data) {
                if !obj.contains_key("Label") {
                    return Err(ParseError::UnknownFormat);
                }
            }
            Ok(dawg_json::parse_dawg_json(data)?)
        }
        Some(b'[') if serde_json::from_slice::<serde::de::IgnoredAny>(data).is_ok() => {
            Err(ParseError::UnknownFormat)
        }
        _ => Ok(word_list::parse_word_list(data)?),
    }
}
