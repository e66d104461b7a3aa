//! Sound playback for the phase change alert.
//!
//! This module provides the audio [`Notifier`](crate::notifier::Notifier):
//!
//! - User-supplied sound files (`--sound`, or `notification_sound.*` in the
//!   data directory)
//! - A built-in synthesized chime as fallback
//! - Non-blocking playback that skips an alert while the previous one plays
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  AudioNotifier   │ ← implements Notifier
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundSource    │────▶│   Sound file     │
//! │                  │     ├──────────────────┤
//! │                  │────▶│  Built-in chime  │
//! └──────────────────┘     │  (fallback)      │
//!                          └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use time_tracker::notifier::Notifier;
//! use time_tracker::sound::{AudioNotifier, SoundSource};
//!
//! // Open the default output (fails if there is no audio device)
//! let notifier = AudioNotifier::new(SoundSource::Chime).expect("audio init");
//! notifier.notify();
//! ```

mod chime;
mod error;
mod player;
mod source;

pub use chime::{chime_tones, CHIME_TONES};
pub use error::SoundError;
pub use player::{try_create_notifier, AudioNotifier};
pub use source::{
    find_sound_in, resolve_sound, SoundSource, DEFAULT_SOUND_STEM, SUPPORTED_EXTENSIONS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Verify all public items are accessible
        let _: fn(SoundSource) -> Result<AudioNotifier, SoundError> = AudioNotifier::new;
        let _: fn(SoundSource) -> Option<AudioNotifier> = try_create_notifier;
        let _: fn(&std::path::Path) -> Option<SoundSource> = find_sound_in;
        assert!(!CHIME_TONES.is_empty());
    }
}
