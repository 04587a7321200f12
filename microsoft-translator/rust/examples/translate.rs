//! Translates text from the command line.
//!
//! ```sh
//! export MICROSOFT_OAUTH_CLIENT_ID=...
//! export MICROSOFT_OAUTH_CLIENT_SECRET=...
//! cargo run --example translate -- nl "This is a test"
//! ```

use microsoft_translator::{init_tracing, LogConfig, MicrosoftTranslator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&LogConfig::new().default_filter("microsoft_translator=info"))?;

    let mut args = std::env::args().skip(1);
    let to = args.next().unwrap_or_else(|| "nl".to_string());
    let text = args.collect::<Vec<_>>().join(" ");
    let text = if text.is_empty() {
        "This is a test".to_string()
    } else {
        text
    };

    let translator = MicrosoftTranslator::from_env()?;

    let from = translator.detect(&text).await?;
    println!("Detected language: {}", from);

    for sentence in translator.break_sentences(&text, &from).await? {
        let translated = translator.translate(&sentence, &to, Some(&from)).await?;
        println!("{:?} -> {:?}", sentence, translated);
    }

    Ok(())
}
