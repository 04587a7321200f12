//! Language detection and sentence breaking.

use std::sync::Arc;
use tracing::instrument;

use super::{require_items, require_same_len, require_text, xml_body, ApiExecutor};
use crate::errors::TranslatorResult;
use crate::xml;

/// Detects languages and splits text into sentences.
#[derive(Debug, Clone)]
pub struct DetectionService {
    executor: Arc<ApiExecutor>,
}

impl DetectionService {
    pub(crate) fn new(executor: Arc<ApiExecutor>) -> Self {
        Self { executor }
    }

    /// Detects the language of `text`, returning its language code.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn detect(&self, text: &str) -> TranslatorResult<String> {
        require_text(text, "text")?;

        let body = self.executor.get("Detect", &[("text", text)]).await?;
        xml::parse_string(xml_body(&body)?)
    }

    /// Detects the language of every text, in input order.
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    pub async fn detect_array<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
    ) -> TranslatorResult<Vec<String>> {
        require_items(texts, "texts")?;

        let body = self
            .executor
            .post_xml("DetectArray", &[], xml::string_array_body(texts))
            .await?;
        let languages = xml::parse_string_array(xml_body(&body)?)?;
        require_same_len(languages, texts.len(), "DetectArray")
    }

    /// Splits `text` into sentences.
    ///
    /// The service returns sentence lengths; the sentences are cut from the
    /// original text so trailing whitespace stays with each sentence.
    #[instrument(skip(self, text), fields(language = %language, len = text.len()))]
    pub async fn break_sentences(
        &self,
        text: &str,
        language: &str,
    ) -> TranslatorResult<Vec<String>> {
        require_text(text, "text")?;
        require_text(language, "language")?;

        let body = self
            .executor
            .get("BreakSentences", &[("text", text), ("language", language)])
            .await?;
        let lengths = xml::parse_int_array(xml_body(&body)?)?;
        Ok(split_by_utf16_lengths(text, &lengths))
    }
}

/// Cuts `text` into pieces of the given lengths, counted in UTF-16 code units.
///
/// A length ending inside a surrogate pair takes the whole character. Lengths
/// past the end of the text are ignored and any remainder becomes the last
/// piece.
fn split_by_utf16_lengths(text: &str, lengths: &[u32]) -> Vec<String> {
    let mut pieces = Vec::with_capacity(lengths.len());
    let mut rest = text;

    for &length in lengths {
        if rest.is_empty() {
            break;
        }

        let mut units = 0usize;
        let mut end = rest.len();
        for (idx, ch) in rest.char_indices() {
            if units >= length as usize {
                end = idx;
                break;
            }
            units += ch.len_utf16();
        }

        let (piece, tail) = rest.split_at(end);
        pieces.push(piece.to_string());
        rest = tail;
    }

    if !rest.is_empty() {
        pieces.push(rest.to_string());
    }

    pieces
}
