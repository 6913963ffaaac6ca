//=========================================================================
// Audio
//=========================================================================
//
// Sound playback for levels.
//
//   AssetLoader::load_sound() → Mixer (decoded, SoundId handed out)
//   Room::play_sound()        → request queued on the room
//   end of update pass        → Level hands the queue to its Mixer
//
// Entities only ever see the room, so they queue requests instead of
// touching the audio device. A mixer without an output device (headless
// machines, CI) accepts every request and plays nothing.
//
//=========================================================================

//=== External Dependencies ===============================================

use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::{
        static_sound::{StaticSoundData, StaticSoundHandle},
        PlaybackState,
    },
    tween::Tween,
};
use log::*;

//=== SoundId =============================================================

/// Handle to a sound registered with a [`Mixer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(u32);

impl SoundId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

//=== SoundRequest ========================================================

/// Playback change asked for by game code during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundRequest {
    Play(SoundId),
    /// Stops every sound currently playing.
    StopAll,
}

//=== Mixer ===============================================================

/// Decoded sounds plus the output device they play on.
pub struct Mixer {
    /// `None` when no audio device could be opened.
    manager: Option<AudioManager<DefaultBackend>>,
    sounds: Vec<StaticSoundData>,
    playing: Vec<StaticSoundHandle>,
    started: u64,
}

impl Mixer {
    /// Opens the default output device, falling back to a silent mixer.
    pub fn open() -> Self {
        match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(manager) => {
                info!(target: "audio", "Audio output opened");
                Self {
                    manager: Some(manager),
                    ..Self::silent()
                }
            }
            Err(e) => {
                warn!(target: "audio", "No audio output, sounds disabled: {}", e);
                Self::silent()
            }
        }
    }

    /// Mixer that tracks requests without an output device.
    pub fn silent() -> Self {
        Self {
            manager: None,
            sounds: Vec::new(),
            playing: Vec::new(),
            started: 0,
        }
    }

    pub fn is_audible(&self) -> bool {
        self.manager.is_some()
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    /// Play requests accepted so far, audible or not.
    pub fn sounds_started(&self) -> u64 {
        self.started
    }

    pub fn insert_sound(&mut self, data: StaticSoundData) -> SoundId {
        let id = SoundId::new(self.sounds.len() as u32);
        self.sounds.push(data);
        id
    }

    //--- Playback ---------------------------------------------------------

    /// Starts `sound` from the beginning. Unknown ids are ignored.
    pub fn play(&mut self, sound: SoundId) {
        let Some(data) = self.sounds.get(sound.raw() as usize) else {
            warn!(target: "audio", "Play of unknown sound {:?} ignored", sound);
            return;
        };
        self.started += 1;

        let Some(manager) = self.manager.as_mut() else {
            trace!(target: "audio", "Silent mixer, {:?} not played", sound);
            return;
        };

        self.playing
            .retain(|handle| !matches!(handle.state(), PlaybackState::Stopped));
        match manager.play(data.clone()) {
            Ok(handle) => self.playing.push(handle),
            Err(e) => warn!(target: "audio", "Failed to play {:?}: {}", sound, e),
        }
    }

    pub fn stop_all(&mut self) {
        debug!(target: "audio", "Stopping {} sounds", self.playing.len());
        for mut handle in self.playing.drain(..) {
            let _ = handle.stop(Tween::default());
        }
    }

    /// Carries out a request queued by game code.
    pub fn apply(&mut self, request: SoundRequest) {
        match request {
            SoundRequest::Play(sound) => self.play(sound),
            SoundRequest::StopAll => self.stop_all(),
        }
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for Mixer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mixer")
            .field("audible", &self.is_audible())
            .field("sounds", &self.sounds.len())
            .field("playing", &self.playing.len())
            .field("started", &self.started)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_mixer_has_no_output() {
        let mixer = Mixer::default();
        assert!(!mixer.is_audible());
        assert_eq!(mixer.sound_count(), 0);
    }

    #[test]
    fn unknown_sounds_are_not_counted() {
        let mut mixer = Mixer::silent();
        mixer.apply(SoundRequest::Play(SoundId::new(7)));
        mixer.apply(SoundRequest::StopAll);

        assert_eq!(mixer.sounds_started(), 0);
    }
}
