//! Keyframe Tracks
//!
//! A track is an ordered list of `(time, value)` samples. Evaluation finds the
//! bracketing pair `times[i] <= t < times[i + 1]` and clamps at both ends; it
//! never wraps (wrapping belongs to the chore).
//!
//! The interpolation policy is not stored on the track: it is a property of
//! the component the value feeds, so callers pass it in.

/// How a value is read between two keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Hold the earlier key's value until the next key.
    #[default]
    Step,
    /// Blend linearly between the two keys.
    Linear,
}

const MAX_SCAN_OFFSET: usize = 3;

/// Remembers where the previous lookup landed so the next one, usually a
/// little later in time, is found with a short linear scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// The pair of keys surrounding a query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyBracket {
    /// Key at or before the query time (the first key when the query precedes it).
    pub index: usize,
    /// Following key, `None` when clamped to the end of the track.
    pub next: Option<usize>,
    /// Normalised position between `index` and `next`, in `[0, 1]`.
    pub fraction: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframeTrack {
    pub times: Vec<f32>,
    pub values: Vec<f32>,
}

impl KeyframeTrack {
    /// `times` must be non-decreasing and as long as `values`.
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<f32>) -> Self {
        debug_assert_eq!(times.len(), values.len(), "one value per key time");
        debug_assert!(
            times.windows(2).all(|w| w[0] <= w[1]),
            "key times must be non-decreasing"
        );
        Self { times, values }
    }

    /// Builds a track from `(time, value)` pairs.
    pub fn from_pairs(keys: impl IntoIterator<Item = (f32, f32)>) -> Self {
        let (times, values) = keys.into_iter().unzip();
        Self::new(times, values)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last key, `0.0` for an empty track.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Finds the keys surrounding `time`. `None` for an empty track.
    #[must_use]
    pub fn bracket(&self, time: f32) -> Option<KeyBracket> {
        if self.times.is_empty() {
            return None;
        }

        // partition_point finds the first index where t > time, i.e. next_index
        let next_idx = self.times.partition_point(|&t| t <= time);
        Some(self.bracket_at(next_idx.saturating_sub(1), time))
    }

    /// Stateless sampling.
    #[must_use]
    pub fn sample(&self, time: f32, mode: InterpolationMode) -> Option<f32> {
        self.bracket(time).map(|b| self.evaluate(b, mode))
    }

    /// Sampling with cursor. Produces the same value as [`Self::sample`];
    /// `cursor` is updated for the next lookup.
    pub fn sample_with_cursor(
        &self,
        time: f32,
        cursor: &mut KeyframeCursor,
        mode: InterpolationMode,
    ) -> Option<f32> {
        let len = self.times.len();
        if len == 0 {
            return None;
        }
        // Fast path: static data (single keyframe)
        if len == 1 {
            return Some(self.values[0]);
        }

        let index = self.locate_with_cursor(time, cursor);
        Some(self.evaluate(self.bracket_at(index, time), mode))
    }

    fn locate_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> usize {
        let len = self.times.len();

        // A cursor from a longer track (or a stale one) restarts from the end.
        let i = cursor.last_index.min(len - 1);

        let found_index = if time >= self.times[i] {
            // Time moved forward (normal playback): scan right for [idx, idx+1)
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                let idx = i + offset;
                if idx >= len - 1 {
                    // time >= times[idx] was established by the previous step
                    res = Some(len - 1);
                    break;
                }
                if time < self.times[idx + 1] {
                    res = Some(idx);
                    break;
                }
            }
            res
        } else {
            // Time moved backward (loop wrap, replay): time < times[i]
            let mut res = None;
            for offset in 1..=MAX_SCAN_OFFSET {
                if i < offset {
                    break;
                }
                let idx = i - offset;
                if time >= self.times[idx] {
                    res = Some(idx);
                    break;
                }
            }
            res
        };

        let index = found_index.unwrap_or_else(|| {
            // Large jump: fall back to binary search
            self.times.partition_point(|&t| t <= time).saturating_sub(1)
        });

        cursor.last_index = index;
        index
    }

    fn bracket_at(&self, index: usize, time: f32) -> KeyBracket {
        let len = self.times.len();

        // Boundary case: no next frame available
        if index >= len - 1 {
            return KeyBracket {
                index: len - 1,
                next: None,
                fraction: 0.0,
            };
        }

        let next = index + 1;
        let t0 = self.times[index];
        let dt = self.times[next] - t0;

        // Before the first key and zero-length segments both clamp to the earlier key.
        let fraction = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };

        KeyBracket {
            index,
            next: Some(next),
            fraction: fraction.clamp(0.0, 1.0),
        }
    }

    fn evaluate(&self, bracket: KeyBracket, mode: InterpolationMode) -> f32 {
        let v0 = self.values[bracket.index];
        match (mode, bracket.next) {
            (InterpolationMode::Linear, Some(next)) => {
                let v1 = self.values[next];
                v0 + (v1 - v0) * bracket.fraction
            }
            _ => v0,
        }
    }
}
