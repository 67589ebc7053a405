//! Transcoder invocation.
//!
//! The controller treats the capture as an opaque external process:
//! ffmpeg reads the SATIP stream and writes an MP3 file, optionally
//! stopping itself after the duration limit. The [`Spawner`] trait
//! keeps the exec out of everything that needs testing.

use std::path::Path;

use tracing::debug;

/// Launches a detached capture process.
pub trait Spawner: Send + Sync {
    /// Spawn a transcoder for `source_url` writing to `output_path`,
    /// detached from the controller's lifetime. Returns the child
    /// pid.
    fn spawn(
        &self,
        source_url: &str,
        output_path: &Path,
        duration_limit: Option<u32>,
    ) -> std::io::Result<u32>;
}

/// Spawns real ffmpeg processes.
pub struct FfmpegSpawner {
    bin: String,
}

impl FfmpegSpawner {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl Spawner for FfmpegSpawner {
    fn spawn(
        &self,
        source_url: &str,
        output_path: &Path,
        duration_limit: Option<u32>,
    ) -> std::io::Result<u32> {
        let mut cmd = process_utils::detached_command(&self.bin);
        cmd.arg("-re").arg("-i").arg(source_url);
        if let Some(minutes) = duration_limit {
            let seconds = u64::from(minutes) * 60;
            cmd.arg("-t").arg(seconds.to_string());
        }
        cmd.args(["-vn", "-acodec", "libmp3lame", "-ar", "48000", "-b:a", "192k", "-f", "mp3"])
            .arg(output_path);

        debug!(bin = %self.bin, path = %output_path.display(), "Spawning transcoder");
        process_utils::spawn_detached(cmd)
    }
}
