use async_trait::async_trait;
use std::path::Path;

/// Converter for uploaded audio of any container/codec.
/// Abstracts the underlying tool (ffmpeg, sox, ...)
///
/// Implementations must:
/// - Overwrite `output` if it already exists
/// - Report diagnostics from the tool in the error string
/// - Never leave the conversion running past their own timeout
#[async_trait]
pub trait AudioConverter: Send + Sync {
    /// Convert `input` into a WAV file at `output`
    ///
    /// # Arguments
    /// * `input` - Uploaded audio in any format the tool can read
    /// * `output` - Destination path, may be partially written on failure
    /// * `channels` - Target channel count
    /// * `sample_rate` - Target sample rate in Hz
    ///
    /// # Errors
    /// Returns the tool's diagnostic output if the conversion fails or times out
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        channels: u16,
        sample_rate: u32,
    ) -> Result<(), String>;
}
