use crate::target::KeyTarget;
use crate::tracks::{KeyframeCursor, KeyframeTrack};

/// Playback state of a chore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    PlayingOnce,
    PlayingLooping,
}

impl PlaybackState {
    #[inline]
    #[must_use]
    pub fn is_playing(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

/// Keys bound to a component by its position in the costume's component array.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoreTrack {
    pub component: usize,
    pub track: KeyframeTrack,
}

impl ChoreTrack {
    #[must_use]
    pub fn new(component: usize, track: KeyframeTrack) -> Self {
        Self { component, track }
    }
}

/// A named animation clip with its own playback cursor.
#[derive(Debug, Clone)]
pub struct Chore {
    name: String,
    length: f32,
    tracks: Vec<ChoreTrack>,

    state: PlaybackState,
    current_time: f32,
    has_played: bool,

    track_cursors: Vec<KeyframeCursor>,
}

impl Chore {
    #[must_use]
    pub fn new(name: impl Into<String>, length: f32, tracks: Vec<ChoreTrack>) -> Self {
        let name = name.into();
        let length = if length.is_finite() && length >= 0.0 {
            length
        } else {
            log::warn!("Chore `{name}` has invalid length {length}, using 0");
            0.0
        };

        let track_count = tracks.len();
        Self {
            name,
            length,
            tracks,
            state: PlaybackState::Stopped,
            current_time: 0.0,
            has_played: false,
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    #[inline]
    #[must_use]
    pub fn tracks(&self) -> &[ChoreTrack] {
        &self.tracks
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Time the pose was last evaluated at.
    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// True once a one-shot run completed or a looping run wrapped.
    #[inline]
    #[must_use]
    pub fn has_played(&self) -> bool {
        self.has_played
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    #[inline]
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.state == PlaybackState::PlayingLooping
    }

    /// Whether the chore currently contributes to the pose. With
    /// `exclude_looping`, looping chores never count.
    #[must_use]
    pub fn is_choring(&self, exclude_looping: bool) -> bool {
        match self.state {
            PlaybackState::Stopped => false,
            PlaybackState::PlayingOnce => true,
            PlaybackState::PlayingLooping => !exclude_looping,
        }
    }

    /// Starts a one-shot run from time zero and applies the first pose.
    pub fn play(&mut self, target: &mut impl KeyTarget) {
        self.start(PlaybackState::PlayingOnce, target);
    }

    /// Starts a looping run from time zero and applies the first pose.
    pub fn play_looping(&mut self, target: &mut impl KeyTarget) {
        self.start(PlaybackState::PlayingLooping, target);
    }

    fn start(&mut self, state: PlaybackState, target: &mut impl KeyTarget) {
        self.state = state;
        self.current_time = 0.0;
        self.has_played = false;
        self.apply(target);
    }

    /// Switches a running chore between one-shot and looping playback.
    /// A stopped chore stays stopped.
    pub fn set_looping(&mut self, looping: bool) {
        self.state = match (self.state, looping) {
            (PlaybackState::PlayingOnce, true) => PlaybackState::PlayingLooping,
            (PlaybackState::PlayingLooping, false) => PlaybackState::PlayingOnce,
            (state, _) => state,
        };
    }

    /// Stops playback, freezing the pose at its last evaluated state.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
    }

    /// Jumps to the end of the chore and applies the final pose.
    /// Playback state and `has_played` are left untouched.
    pub fn set_last_frame(&mut self, target: &mut impl KeyTarget) {
        self.current_time = self.length;
        self.apply(target);
    }

    /// Core logic: advance time and apply the resulting pose.
    pub fn update(&mut self, dt: f32, target: &mut impl KeyTarget) {
        if !self.is_playing() {
            return;
        }

        // 1. Accumulate time
        self.current_time += dt.max(0.0);

        // 2. Handle end of clip
        if self.current_time >= self.length {
            match self.state {
                PlaybackState::PlayingOnce => {
                    self.current_time = self.length;
                    self.apply(target);
                    self.state = PlaybackState::Stopped;
                    self.has_played = true;
                    return;
                }
                PlaybackState::PlayingLooping => {
                    self.current_time = if self.length > 0.0 {
                        self.current_time % self.length
                    } else {
                        0.0
                    };
                    self.has_played = true;
                }
                PlaybackState::Stopped => {}
            }
        }

        self.apply(target);
    }

    /// Evaluates every track at the current time and writes the values into
    /// the bound components. Tracks on missing components are skipped.
    pub fn apply(&mut self, target: &mut impl KeyTarget) {
        let time = self.current_time;
        for (track, cursor) in self.tracks.iter().zip(self.track_cursors.iter_mut()) {
            let Some(mode) = target.interpolation(track.component) else {
                continue;
            };
            if let Some(value) = track.track.sample_with_cursor(time, cursor, mode) {
                target.set_key(track.component, value);
            }
        }
    }
}
