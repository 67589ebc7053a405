//! Transcoder process identification by invocation arguments.
//!
//! A transcoder is recognized by the destination path it was given:
//! the file stem has the shape `<prefix>_<name>_<YYYYmmdd>_<HHMMSS>`
//! with the configured media extension. Because recording names are
//! strictly alphanumeric, the stem splits unambiguously on `_`.
//!
//! This parsing is inherently coupled to the invocation format, which
//! is why it lives behind this one small type instead of being
//! scattered through the reconciler.

use std::ffi::OsStr;
use std::path::Path;

/// Recognizes transcoder destination paths and extracts the
/// recording name embedded in them.
#[derive(Debug, Clone)]
pub struct OutputSignature {
    prefix: String,
    extension: String,
}

impl OutputSignature {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// Extract the recording name from a single argv token, if it is
    /// a destination path matching the signature.
    pub fn name_from_arg(&self, arg: &OsStr) -> Option<String> {
        let path = Path::new(arg);
        if path.extension()?.to_str()? != self.extension {
            return None;
        }
        self.name_from_stem(path.file_stem()?.to_str()?)
    }

    /// Scan a full argv for the first token matching the signature.
    pub fn name_from_argv<S: AsRef<OsStr>>(&self, argv: &[S]) -> Option<String> {
        argv.iter().find_map(|arg| self.name_from_arg(arg.as_ref()))
    }

    fn name_from_stem(&self, stem: &str) -> Option<String> {
        let rest = stem.strip_prefix(&self.prefix)?.strip_prefix('_')?;

        // <name>_<YYYYmmdd>_<HHMMSS>: exactly three tokens, since the
        // name itself cannot contain underscores.
        let mut parts = rest.split('_');
        let name = parts.next()?;
        let date = parts.next()?;
        let time = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        let is_digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
        if name.is_empty()
            || !name.bytes().all(|b| b.is_ascii_alphanumeric())
            || !is_digits(date, 8)
            || !is_digits(time, 6)
        {
            return None;
        }

        Some(name.to_string())
    }
}
