//! Speech synthesis service.

use bytes::Bytes;
use std::sync::Arc;
use tracing::instrument;

use super::{require_text, xml_body, ApiExecutor};
use crate::errors::TranslatorResult;
use crate::types::{AudioFormat, SpeakOptions};
use crate::xml;

/// Synthesizes speech.
#[derive(Debug, Clone)]
pub struct SpeechService {
    executor: Arc<ApiExecutor>,
}

impl SpeechService {
    pub(crate) fn new(executor: Arc<ApiExecutor>) -> Self {
        Self { executor }
    }

    /// Speaks `text` in `language`, returning the encoded audio stream.
    #[instrument(
        skip(self, text),
        fields(language = %language, format = format.as_str(), options = options.as_str())
    )]
    pub async fn speak(
        &self,
        text: &str,
        language: &str,
        format: AudioFormat,
        options: SpeakOptions,
    ) -> TranslatorResult<Bytes> {
        require_text(text, "text")?;
        require_text(language, "language")?;

        let params = [
            ("text", text),
            ("language", language),
            ("format", format.as_str()),
            ("options", options.as_str()),
        ];
        let audio = self.executor.get("Speak", &params).await?;
        tracing::debug!(bytes = audio.len(), "Received audio");
        Ok(audio)
    }

    /// Lists the language codes supported by [`speak`](Self::speak).
    #[instrument(skip(self))]
    pub async fn get_languages_for_speak(&self) -> TranslatorResult<Vec<String>> {
        let body = self.executor.get("GetLanguagesForSpeak", &[]).await?;
        xml::parse_string_array(xml_body(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockAccessTokenProvider, MockResponse, MockTransport};
    use std::time::Duration;

    fn service(transport: Arc<MockTransport>) -> SpeechService {
        SpeechService::new(Arc::new(ApiExecutor::new(
            "https://api.example.com/V2/Http.svc",
            Duration::from_secs(5),
            transport,
            Arc::new(MockAccessTokenProvider::new("token")),
        )))
    }

    #[tokio::test]
    async fn test_speak_returns_audio() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::bytes("audio/mp3", vec![0x49, 0x44, 0x33, 0x04]));

        let audio = service(transport.clone())
            .speak("This is a test", "en", AudioFormat::Mp3, SpeakOptions::MaxQuality)
            .await
            .unwrap();
        assert_eq!(&audio[..], &[0x49, 0x44, 0x33, 0x04]);

        let request = transport.last_request().unwrap();
        assert!(request.url.contains("/Speak?"));
        assert_eq!(request.query_param("language").as_deref(), Some("en"));
        assert_eq!(request.query_param("format").as_deref(), Some("audio/mp3"));
        assert_eq!(request.query_param("options").as_deref(), Some("MaxQuality"));
    }

    #[tokio::test]
    async fn test_speak_defaults() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::bytes("audio/wav", b"RIFF".to_vec()));

        service(transport.clone())
            .speak("Hallo", "nl", AudioFormat::default(), SpeakOptions::default())
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.query_param("format").as_deref(), Some("audio/wav"));
        assert_eq!(request.query_param("options").as_deref(), Some("MinSize"));
    }

    #[tokio::test]
    async fn test_get_languages_for_speak() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_xml(
            "<ArrayOfstring><string>ca-es</string><string>en</string><string>nl</string></ArrayOfstring>",
        );

        let languages = service(transport.clone())
            .get_languages_for_speak()
            .await
            .unwrap();
        assert_eq!(languages, vec!["ca-es", "en", "nl"]);
        assert!(transport
            .last_request()
            .unwrap()
            .url
            .ends_with("/GetLanguagesForSpeak"));
    }
}
