use crate::domain::voice_clone::LanguageCode;
use async_trait::async_trait;
use std::path::Path;

/// Repository for voice-cloned speech synthesis.
/// Abstracts the underlying engine (Coqui TTS CLI, an in-process model, ...)
///
/// A single instance is built at startup and shared by every request, so
/// implementations are responsible for serializing calls if the engine is
/// not reentrant.
#[async_trait]
pub trait VoiceCloneRepository: Send + Sync {
    /// Render `text` in the voice of `reference` and write a WAV file to `output`
    ///
    /// # Arguments
    /// * `text` - Text to speak, possibly empty
    /// * `reference` - Normalized mono 16 kHz WAV of the target voice
    /// * `language` - Language the text is spoken in
    /// * `output` - Path the engine writes the waveform to
    ///
    /// # Errors
    /// Returns error detail if synthesis fails or the engine is unavailable
    async fn synthesize(
        &self,
        text: &str,
        reference: &Path,
        language: LanguageCode,
        output: &Path,
    ) -> Result<(), String>;
}
