//! Built-in chime.
//!
//! Synthesized at play time so the binary needs no audio asset. Used when no
//! sound file is configured or the configured file cannot be played.

use std::time::Duration;

use rodio::source::{SineWave, Source};

/// Tones of the chime as (frequency in Hz, duration in ms).
pub const CHIME_TONES: &[(f32, u64)] = &[(880.0, 180), (660.0, 180), (990.0, 320)];

/// Output gain applied to every tone.
const CHIME_GAIN: f32 = 0.25;

/// Returns the chime as a sequence of sources, to be appended in order.
pub fn chime_tones() -> impl Iterator<Item = impl Source<Item = f32> + Send + 'static> {
    CHIME_TONES.iter().map(|&(frequency, millis)| {
        SineWave::new(frequency)
            .take_duration(Duration::from_millis(millis))
            .amplify(CHIME_GAIN)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chime_has_one_source_per_tone() {
        assert_eq!(chime_tones().count(), CHIME_TONES.len());
    }

    #[test]
    fn test_chime_is_short() {
        let total: u64 = CHIME_TONES.iter().map(|&(_, millis)| millis).sum();
        assert!(total > 0);
        assert!(total < 2000);
    }
}
