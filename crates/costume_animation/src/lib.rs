//! Keyframe tracks and chore playback.
//!
//! - [`KeyframeTrack`]: ordered `(time, value)` samples, evaluated by bracketing
//! - [`Chore`]: a named clip of tracks with a stopped / once / looping state machine
//! - [`KeyTarget`]: where a chore writes the values it evaluates

pub mod chore;
pub mod target;
pub mod tracks;

pub use chore::{Chore, ChoreTrack, PlaybackState};
pub use target::KeyTarget;
pub use tracks::{InterpolationMode, KeyBracket, KeyframeCursor, KeyframeTrack};
