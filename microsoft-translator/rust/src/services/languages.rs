//! Supported languages service.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use super::{require_items, require_same_len, require_text, xml_body, ApiExecutor};
use crate::errors::TranslatorResult;
use crate::xml;

/// Lists supported languages and their display names.
#[derive(Debug, Clone)]
pub struct LanguagesService {
    executor: Arc<ApiExecutor>,
}

impl LanguagesService {
    pub(crate) fn new(executor: Arc<ApiExecutor>) -> Self {
        Self { executor }
    }

    /// Lists the language codes supported for translation.
    #[instrument(skip(self))]
    pub async fn get_languages_for_translate(&self) -> TranslatorResult<Vec<String>> {
        let body = self.executor.get("GetLanguagesForTranslate", &[]).await?;
        xml::parse_string_array(xml_body(&body)?)
    }

    /// Returns the display name of every code, localized in `locale`.
    #[instrument(skip(self, codes), fields(locale = %locale, count = codes.len()))]
    pub async fn get_language_names<S: AsRef<str> + Sync>(
        &self,
        codes: &[S],
        locale: &str,
    ) -> TranslatorResult<HashMap<String, String>> {
        require_items(codes, "language_codes")?;
        require_text(locale, "locale")?;

        let body = self
            .executor
            .post_xml(
                "GetLanguageNames",
                &[("locale", locale)],
                xml::string_array_body(codes),
            )
            .await?;
        let names = xml::parse_string_array(xml_body(&body)?)?;
        let names = require_same_len(names, codes.len(), "GetLanguageNames")?;

        Ok(codes
            .iter()
            .map(|code| code.as_ref().to_string())
            .zip(names)
            .collect())
    }
}
