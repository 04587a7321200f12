//! Request option types for the translator API.

mod speech;
mod translation;

pub use speech::{AudioFormat, SpeakOptions};
pub use translation::{ContentType, TranslateOptions};
