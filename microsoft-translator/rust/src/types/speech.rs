//! Speech synthesis options.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::TranslatorError;

/// Audio format of synthesized speech.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioFormat {
    /// WAVE audio.
    #[default]
    #[serde(rename = "audio/wav")]
    Wav,
    /// MP3 audio.
    #[serde(rename = "audio/mp3")]
    Mp3,
}

impl AudioFormat {
    /// MIME type sent to the service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mp3",
        }
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "audio/wav" | "wav" => Ok(Self::Wav),
            "audio/mp3" | "mp3" => Ok(Self::Mp3),
            _ => Err(TranslatorError::validation(
                format!("Unsupported audio format: {}", s),
                "format",
            )),
        }
    }
}

/// Quality trade-off of synthesized speech.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeakOptions {
    /// Best audio quality.
    MaxQuality,
    /// Smallest audio size.
    #[default]
    MinSize,
}

impl SpeakOptions {
    /// Option string sent to the service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxQuality => "MaxQuality",
            Self::MinSize => "MinSize",
        }
    }
}

impl FromStr for SpeakOptions {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MaxQuality" => Ok(Self::MaxQuality),
            "MinSize" => Ok(Self::MinSize),
            _ => Err(TranslatorError::validation(
                format!("Unsupported speak option: {}", s),
                "options",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("audio/mp3", AudioFormat::Mp3 ; "mp3 mime")]
    #[test_case("MP3", AudioFormat::Mp3 ; "mp3 extension")]
    #[test_case("audio/wav", AudioFormat::Wav ; "wav mime")]
    fn test_audio_format_parse(input: &str, expected: AudioFormat) {
        assert_eq!(input.parse::<AudioFormat>().unwrap(), expected);
    }

    #[test]
    fn test_audio_format_rejects_unknown() {
        assert!("audio/ogg".parse::<AudioFormat>().is_err());
    }

    #[test]
    fn test_speak_options() {
        assert_eq!(SpeakOptions::MaxQuality.as_str(), "MaxQuality");
        assert_eq!("MinSize".parse::<SpeakOptions>().unwrap(), SpeakOptions::MinSize);
        assert!("Loud".parse::<SpeakOptions>().is_err());
        assert_eq!(AudioFormat::Mp3.extension(), "mp3");
    }
}
