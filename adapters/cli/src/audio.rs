//! Audio trigger sink fed from world events.

use tablequest_core::{Event, SoundCue};

/// Fire-and-forget receiver of sound cues and level music requests.
pub(crate) trait AudioSink {
    /// Plays the named sound effect.
    fn play_sound(&mut self, cue: SoundCue);

    /// Starts the music for the one-based `level`.
    fn start_level_music(&mut self, level: u32);
}

/// Sink that records cues in the log instead of synthesising audio.
#[derive(Debug, Default)]
pub(crate) struct LoggingAudio;

impl AudioSink for LoggingAudio {
    fn play_sound(&mut self, cue: SoundCue) {
        log::debug!("sound: {}", cue.name());
    }

    fn start_level_music(&mut self, level: u32) {
        log::info!("music: level {level}");
    }
}

/// Forwards every audio-relevant event to `sink`, in order.
pub(crate) fn forward_audio<A: AudioSink + ?Sized>(events: &[Event], sink: &mut A) {
    for event in events {
        match event {
            Event::SoundTriggered { cue } => sink.play_sound(*cue),
            Event::MusicRequested { level } => sink.start_level_music(*level),
            _ => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingAudio {
        pub(crate) sounds: Vec<SoundCue>,
        pub(crate) music: Vec<u32>,
    }

    impl AudioSink for RecordingAudio {
        fn play_sound(&mut self, cue: SoundCue) {
            self.sounds.push(cue);
        }

        fn start_level_music(&mut self, level: u32) {
            self.music.push(level);
        }
    }

    #[test]
    fn only_audio_events_reach_the_sink() {
        let mut sink = RecordingAudio::default();
        let events = [
            Event::MusicRequested { level: 2 },
            Event::ScreensHidden,
            Event::SoundTriggered {
                cue: SoundCue::DoorOpen,
            },
            Event::SoundTriggered {
                cue: SoundCue::Step,
            },
        ];

        forward_audio(&events, &mut sink);

        assert_eq!(sink.music, vec![2]);
        assert_eq!(sink.sounds, vec![SoundCue::DoorOpen, SoundCue::Step]);
    }
}
