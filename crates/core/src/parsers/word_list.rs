use std::sync::Arc;

use thiserror::Error;

use crate::model::{BuildError, DawgBuilder, DawgNode, MAX_DEPTH};

#[derive(Debug, Error)]
pub enum WordListParseError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("no words found")]
    Empty,
    #[error("line {line}: word has {length} characters, limit is {max}")]
    WordTooLong {
        line: usize,
        length: usize,
        max: usize,
    },
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Parse a plain word list into a suffix-sharing DAWG.
///
/// One word per line; surrounding whitespace is trimmed, blank lines and
/// lines starting with `#` are skipped. Order and duplicates in the input
/// do not matter. A word longer than [`MAX_DEPTH`] characters is an error.
pub fn parse_word_list(data: &[u8]) -> Result<Arc<DawgNode>, WordListParseError> {
    let text = std::str::from_utf8(data)?;
    let mut words: Vec<&str> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let word = line.trim();
        if word.is_empty() || word.starts_with('#') {
            continue;
        }
        let length = word.chars().count();
        if length > MAX_DEPTH {
            return Err(WordListParseError::WordTooLong {
                line: index + 1,
                length,
                max: MAX_DEPTH,
            });
        }
        words.push(word);
    }

    if words.is_empty() {
        return Err(WordListParseError::Empty);
    }

    words.sort_unstable();
    words.dedup();

    let mut builder = DawgBuilder::new();
    for word in &words {
        builder.insert(word)?;
    }
    let root = builder.finish();
    tracing::debug!(words = words.len(), "built DAWG from word list");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_dedups() {
        let dawg = parse_word_list(b"tops\ntap\n\ntop\ntaps\ntap\n").unwrap();
        assert_eq!(dawg.words(), ["tap", "taps", "top", "tops"]);
    }

    #[test]
    fn skips_comments_and_whitespace() {
        let dawg = parse_word_list(b"# words\n  go  \n\n").unwrap();
        assert_eq!(dawg.words(), ["go"]);
    }

    #[test]
    fn empty_input_errors() {
        assert!(matches!(
            parse_word_list(b"\n# nothing\n"),
            Err(WordListParseError::Empty)
        ));
    }

    #[test]
    fn handles_multibyte_characters() {
        let dawg = parse_word_list("über\nüben\n".as_bytes()).unwrap();
        assert_eq!(dawg.words(), ["üben", "über"]);
        assert!(dawg.edges.contains_key("ü"));
    }

    #[test]
    fn word_at_length_limit_is_accepted() {
        let word = "a".repeat(MAX_DEPTH);
        let dawg = parse_word_list(word.as_bytes()).unwrap();
        assert_eq!(dawg.depth(), MAX_DEPTH);
    }

    #[test]
    fn overlong_word_is_rejected_with_its_line() {
        let data = format!("cat\n\n{}\n", "a".repeat(5_000));
        let err = parse_word_list(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            WordListParseError::WordTooLong {
                line: 3,
                length: 5_000,
                max: MAX_DEPTH
            }
        ));
    }
}
