//! Sound source management.
//!
//! A chime comes either from a user-supplied audio file or from the built-in
//! synthesized chime.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::SoundError;

/// Supported audio file extensions.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg", "flac"];

/// File stem looked up in the data directory when no `--sound` is given.
pub const DEFAULT_SOUND_STEM: &str = "notification_sound";

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// The full path to the sound file.
        path: PathBuf,
    },
    /// The built-in synthesized chime.
    Chime,
}

impl SoundSource {
    /// Creates a file source without validating the path.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Creates a file source, checking that the file exists and has a
    /// supported extension.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::FileNotFound` or `SoundError::UnsupportedFormat`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use time_tracker::sound::SoundSource;
    ///
    /// let source = SoundSource::file_validated("/nonexistent/chime.wav");
    /// assert!(source.is_err());
    /// ```
    pub fn file_validated(path: impl Into<PathBuf>) -> Result<Self, SoundError> {
        let path = path.into();
        if !is_supported(&path) {
            return Err(SoundError::UnsupportedFormat(path.display().to_string()));
        }
        if !path.is_file() {
            return Err(SoundError::FileNotFound(path.display().to_string()));
        }
        Ok(Self::File { path })
    }

    /// Returns a short name for log output.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::File { path } => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Chime => "chime".to_string(),
        }
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Finds `notification_sound.<ext>` in `dir`, trying extensions in order.
#[must_use]
pub fn find_sound_in(dir: &Path) -> Option<SoundSource> {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", DEFAULT_SOUND_STEM, ext)))
        .find(|path| path.is_file())
        .map(SoundSource::file)
}

/// Picks the sound to play.
///
/// An explicit path wins if it is valid; otherwise a
/// `notification_sound.*` in `data_dir`; otherwise the built-in chime.
#[must_use]
pub fn resolve_sound(explicit: Option<&Path>, data_dir: &Path) -> SoundSource {
    if let Some(path) = explicit {
        match SoundSource::file_validated(path) {
            Ok(source) => return source,
            Err(e) => warn!("{} ({}), using the built-in chime", e, e.suggestion()),
        }
        return SoundSource::Chime;
    }

    match find_sound_in(data_dir) {
        Some(source) => {
            debug!("Using sound {}", source.name());
            source
        }
        None => SoundSource::Chime,
    }
}
