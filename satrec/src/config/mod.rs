//! Runtime configuration collected from environment variables.

use std::path::PathBuf;

use chrono_tz::Tz;
use tracing::warn;

/// Default IANA timezone used for filename timestamps and schedule
/// evaluation when `TIMEZONE` is unset.
pub const DEFAULT_TIMEZONE: &str = "Europe/Vienna";

/// Runtime settings for the controller.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory recordings are written to.
    pub recordings_dir: PathBuf,
    /// Directory holding the durable registry and schedule stores.
    pub state_dir: PathBuf,
    /// Fixed prefix for output filenames.
    pub file_prefix: String,
    /// Media file extension (without the dot).
    pub media_extension: String,
    /// Timezone for filename timestamps and cron evaluation.
    pub timezone: Tz,
    /// Transcoder binary to invoke.
    pub ffmpeg_bin: String,
    /// Directory for log files.
    pub log_dir: PathBuf,
    /// API server bind address.
    pub bind_address: String,
    /// API server port.
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        let recordings_dir = PathBuf::from("/recordings");
        Self {
            state_dir: recordings_dir.join(".satrec"),
            recordings_dir,
            file_prefix: "rec".to_string(),
            media_extension: "mp3".to_string(),
            timezone: DEFAULT_TIMEZONE.parse().expect("valid default timezone"),
            ffmpeg_bin: "ffmpeg".to_string(),
            log_dir: PathBuf::from("logs"),
            bind_address: "0.0.0.0".to_string(),
            port: 12560,
        }
    }
}

impl Settings {
    /// Load settings from environment variables, falling back to
    /// defaults.
    ///
    /// Supported env vars: `RECORDINGS_DIR`, `STATE_DIR`,
    /// `FILE_PREFIX`, `TIMEZONE`, `FFMPEG_BIN`, `LOG_DIR`,
    /// `API_BIND_ADDRESS`, `API_PORT`.
    pub fn from_env_or_default() -> Self {
        let mut settings = Self::default();

        if let Ok(dir) = std::env::var("RECORDINGS_DIR")
            && !dir.trim().is_empty()
        {
            settings.recordings_dir = PathBuf::from(&dir);
            settings.state_dir = settings.recordings_dir.join(".satrec");
        }

        if let Ok(dir) = std::env::var("STATE_DIR")
            && !dir.trim().is_empty()
        {
            settings.state_dir = PathBuf::from(dir);
        }

        if let Ok(prefix) = std::env::var("FILE_PREFIX")
            && !prefix.trim().is_empty()
        {
            settings.file_prefix = prefix;
        }

        if let Ok(tz) = std::env::var("TIMEZONE")
            && !tz.trim().is_empty()
        {
            match tz.parse::<Tz>() {
                Ok(parsed) => settings.timezone = parsed,
                Err(_) => warn!(
                    timezone = %tz,
                    "Unknown TIMEZONE; falling back to {}",
                    DEFAULT_TIMEZONE
                ),
            }
        }

        if let Ok(bin) = std::env::var("FFMPEG_BIN")
            && !bin.trim().is_empty()
        {
            settings.ffmpeg_bin = bin;
        }

        if let Ok(dir) = std::env::var("LOG_DIR")
            && !dir.trim().is_empty()
        {
            settings.log_dir = PathBuf::from(dir);
        }

        if let Ok(bind_address) = std::env::var("API_BIND_ADDRESS")
            && !bind_address.trim().is_empty()
        {
            settings.bind_address = bind_address;
        }

        if let Ok(port) = std::env::var("API_PORT")
            && let Ok(parsed) = port.parse::<u16>()
        {
            settings.port = parsed;
        }

        settings
    }
}
