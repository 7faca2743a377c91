use super::audio_converter::AudioConverter;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// ffmpeg implementation of the audio converter
pub struct FfmpegConverter {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegConverter {
    pub fn new(ffmpeg_path: String, timeout: Duration) -> Self {
        Self {
            ffmpeg_path,
            timeout,
        }
    }

    /// Arguments for a resample to `channels`/`sample_rate`, overwriting `output`
    fn build_args(input: &Path, output: &Path, channels: u16, sample_rate: u32) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-i".into(),
            input.as_os_str().to_owned(),
            "-ac".into(),
            channels.to_string().into(),
            "-ar".into(),
            sample_rate.to_string().into(),
            output.as_os_str().to_owned(),
        ]
    }
}

#[async_trait]
impl AudioConverter for FfmpegConverter {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        channels: u16,
        sample_rate: u32,
    ) -> Result<(), String> {
        let start_time = std::time::Instant::now();

        tracing::debug!(
            ffmpeg = %self.ffmpeg_path,
            input = %input.display(),
            output = %output.display(),
            channels,
            sample_rate,
            "Starting audio conversion"
        );

        let child = Command::new(&self.ffmpeg_path)
            .args(Self::build_args(input, output, channels, sample_rate))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to run {}: {}", self.ffmpeg_path, e))?;

        // Dropping the wait future on timeout kills the child
        let output_result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                tracing::error!(
                    timeout_secs = self.timeout.as_secs_f64(),
                    input = %input.display(),
                    "Audio conversion timed out"
                );
                format!(
                    "audio conversion timed out after {:.1}s",
                    self.timeout.as_secs_f64()
                )
            })?
            .map_err(|e| format!("failed to wait for {}: {}", self.ffmpeg_path, e))?;

        if !output_result.status.success() {
            let stderr = String::from_utf8_lossy(&output_result.stderr);
            tracing::error!(
                exit_code = output_result.status.code().unwrap_or(-1),
                stderr = %stderr.trim(),
                "Audio conversion failed"
            );
            return Err(format!("ffmpeg failed: {}", stderr.trim()));
        }

        tracing::info!(
            latency_ms = start_time.elapsed().as_millis(),
            output = %output.display(),
            "Audio conversion completed"
        );

        Ok(())
    }
}
