//! Translation service.

use std::sync::Arc;
use tracing::instrument;

use super::{require_items, require_same_len, require_text, xml_body, ApiExecutor};
use crate::errors::TranslatorResult;
use crate::types::TranslateOptions;
use crate::xml;

/// Translates single texts and batches of texts.
#[derive(Debug, Clone)]
pub struct TranslationService {
    executor: Arc<ApiExecutor>,
}

impl TranslationService {
    pub(crate) fn new(executor: Arc<ApiExecutor>) -> Self {
        Self { executor }
    }

    /// Translates `text` into `to`.
    ///
    /// When `from` is `None` the service detects the source language.
    pub async fn translate(
        &self,
        text: &str,
        to: &str,
        from: Option<&str>,
    ) -> TranslatorResult<String> {
        self.translate_with_options(text, to, from, &TranslateOptions::default())
            .await
    }

    /// Translates `text` into `to` with a category and content type.
    #[instrument(skip(self, text, options), fields(to = %to, from = ?from, len = text.len()))]
    pub async fn translate_with_options(
        &self,
        text: &str,
        to: &str,
        from: Option<&str>,
        options: &TranslateOptions,
    ) -> TranslatorResult<String> {
        require_text(text, "text")?;
        require_text(to, "to")?;

        let mut params = vec![("text", text), ("to", to)];
        if let Some(from) = source_language(from) {
            params.push(("from", from));
        }
        if let Some(category) = options.category.as_deref() {
            params.push(("category", category));
        }
        params.push(("contentType", options.content_type.as_str()));

        let body = self.executor.get("Translate", &params).await?;
        xml::parse_string(xml_body(&body)?)
    }

    /// Translates every text into `to`, returning results in input order.
    pub async fn translate_array<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
        to: &str,
        from: Option<&str>,
    ) -> TranslatorResult<Vec<String>> {
        self.translate_array_with_options(texts, to, from, &TranslateOptions::default())
            .await
    }

    /// Translates every text into `to` with a category and content type.
    #[instrument(skip(self, texts, options), fields(to = %to, from = ?from, count = texts.len()))]
    pub async fn translate_array_with_options<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
        to: &str,
        from: Option<&str>,
        options: &TranslateOptions,
    ) -> TranslatorResult<Vec<String>> {
        require_items(texts, "texts")?;
        require_text(to, "to")?;

        let request = xml::translate_array_body(texts, to, source_language(from), options);
        let body = self
            .executor
            .post_xml("TranslateArray", &[], request)
            .await?;
        let translations = xml::parse_translate_array(xml_body(&body)?)?;
        require_same_len(translations, texts.len(), "TranslateArray")
    }
}

/// An empty source language means auto-detection.
fn source_language(from: Option<&str>) -> Option<&str> {
    from.map(str::trim).filter(|f| !f.is_empty())
}
