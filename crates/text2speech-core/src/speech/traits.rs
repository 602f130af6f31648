use async_trait::async_trait;

use crate::config::Lang;
use crate::error::Result;

/// Trait for text-to-speech backends
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &'static str;

    /// MIME type of the audio produced by [`SpeechSynthesizer::synthesize`]
    fn mime_type(&self) -> &'static str {
        "audio/mpeg"
    }

    /// Render `text`, spoken in `lang`, to an encoded audio stream
    async fn synthesize(&self, text: &str, lang: &Lang) -> Result<Vec<u8>>;
}
