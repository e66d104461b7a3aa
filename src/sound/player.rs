//! Audio notifier implementation using rodio.
//!
//! This module provides the `AudioNotifier` which uses the rodio v0.20
//! audio library for cross-platform sound playback.

use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::chime::chime_tones;
use super::error::SoundError;
use super::source::SoundSource;
use crate::notifier::Notifier;

/// A notifier that plays a sound through the default audio output.
///
/// The sink of the last alert is kept so that a new alert is skipped while
/// the previous one is still audible. Not `Send`: rodio's output stream must
/// stay on the thread that opened it.
pub struct AudioNotifier {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    source: SoundSource,
    /// Sink of the most recent alert.
    current: RefCell<Option<Sink>>,
}

impl AudioNotifier {
    /// Opens the default audio output.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(source: SoundSource) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized for {}", source.name());

        Ok(Self {
            _stream: stream,
            stream_handle,
            source,
            current: RefCell::new(None),
        })
    }

    /// Returns the configured sound source.
    pub fn source(&self) -> &SoundSource {
        &self.source
    }

    /// Returns true while the last alert is still playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|sink| !sink.empty())
    }

    /// Starts playing the configured sound and returns its sink.
    ///
    /// A file that cannot be opened or decoded falls back to the chime.
    fn play(&self) -> Result<Sink, SoundError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        match &self.source {
            SoundSource::File { path } => match Self::decode(path) {
                Ok(decoder) => sink.append(decoder),
                Err(e) if e.should_fallback_to_chime() => {
                    warn!(
                        "Failed to play '{}': {}, falling back to chime",
                        path.display(),
                        e
                    );
                    Self::append_chime(&sink);
                }
                Err(e) => return Err(e),
            },
            SoundSource::Chime => Self::append_chime(&sink),
        }

        Ok(sink)
    }

    fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
    }

    fn append_chime(sink: &Sink) {
        for tone in chime_tones() {
            sink.append(tone);
        }
    }
}

impl Notifier for AudioNotifier {
    fn notify(&self) {
        if self.is_playing() {
            debug!("Previous alert still playing, skipping");
            return;
        }

        match self.play() {
            Ok(sink) => {
                debug!("Alert playback started");
                *self.current.borrow_mut() = Some(sink);
            }
            Err(e) => warn!("Failed to play alert: {} ({})", e, e.suggestion()),
        }
    }
}

impl std::fmt::Debug for AudioNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioNotifier")
            .field("source", &self.source)
            .field("playing", &self.is_playing())
            .finish_non_exhaustive()
    }
}

/// Creates an audio notifier, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_notifier(source: SoundSource) -> Option<AudioNotifier> {
    match AudioNotifier::new(source) {
        Ok(notifier) => Some(notifier),
        Err(e) => {
            warn!("Audio not available, chime disabled: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests may run in environments without audio hardware
    // (e.g., CI containers). Each test returns early if no device opens.

    #[test]
    fn test_new_not_playing_initially() {
        let notifier = match AudioNotifier::new(SoundSource::Chime) {
            Ok(n) => n,
            Err(_) => return,
        };
        assert!(!notifier.is_playing());
        assert_eq!(notifier.source(), &SoundSource::Chime);
    }

    #[test]
    fn test_notify_starts_playback() {
        let notifier = match AudioNotifier::new(SoundSource::Chime) {
            Ok(n) => n,
            Err(_) => return,
        };
        notifier.notify();
        assert!(notifier.current.borrow().is_some());
    }

    #[test]
    fn test_missing_file_falls_back_to_chime() {
        let notifier = match AudioNotifier::new(SoundSource::file("/nonexistent/ding.wav")) {
            Ok(n) => n,
            Err(_) => return,
        };
        // Must not panic; the chime plays instead.
        notifier.notify();
    }

    #[test]
    fn test_try_create_notifier_does_not_panic() {
        let _ = try_create_notifier(SoundSource::Chime);
    }

    #[test]
    fn test_debug_impl() {
        let notifier = match AudioNotifier::new(SoundSource::Chime) {
            Ok(n) => n,
            Err(_) => return,
        };
        assert!(format!("{:?}", notifier).contains("AudioNotifier"));
    }
}
