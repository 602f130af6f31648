mod google_tts;
mod traits;

pub use google_tts::{GoogleTts, split_text};
pub use traits::SpeechSynthesizer;

use crate::config::SpeechConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create a speech synthesizer from configuration
pub fn create_synthesizer(config: &SpeechConfig) -> Result<Arc<dyn SpeechSynthesizer>> {
    Ok(Arc::new(GoogleTts::new(config)?))
}
