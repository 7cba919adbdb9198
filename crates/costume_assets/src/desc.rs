//! Costume Description
//!
//! Plain data produced by the costume reader (or assembled in code) and
//! consumed by `Costume::from_desc`. Indices are positional: component `i` is
//! the `i`-th entry of [`CostumeDesc::components`], and tracks refer to
//! components by that index.

use costume_core::{CostumeError, Result, Tag};

/// One component record: its type tag, optional parent and resource name.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDesc {
    pub tag: Tag,
    /// Parent component index; parents are registered before their children.
    pub parent: Option<usize>,
    /// Resource name (model file, colormap name, sprite name, ...).
    pub name: String,
}

impl ComponentDesc {
    #[must_use]
    pub fn new(tag: Tag, parent: Option<usize>, name: impl Into<String>) -> Self {
        Self {
            tag,
            parent,
            name: name.into(),
        }
    }
}

/// A `(time, value)` sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackKey {
    pub time: f32,
    pub value: f32,
}

impl TrackKey {
    #[must_use]
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Keys bound to one component.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackDesc {
    pub component: usize,
    pub keys: Vec<TrackKey>,
}

impl TrackDesc {
    /// Builds a track from `(time, value)` pairs.
    #[must_use]
    pub fn new(component: usize, keys: &[(f32, f32)]) -> Self {
        Self {
            component,
            keys: keys.iter().map(|&(t, v)| TrackKey::new(t, v)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChoreDesc {
    pub name: String,
    pub length: f32,
    pub tracks: Vec<TrackDesc>,
}

impl ChoreDesc {
    #[must_use]
    pub fn new(name: impl Into<String>, length: f32, tracks: Vec<TrackDesc>) -> Self {
        Self {
            name: name.into(),
            length,
            tracks,
        }
    }
}

/// Everything needed to build a costume, minus external resources.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CostumeDesc {
    pub components: Vec<ComponentDesc>,
    pub chores: Vec<ChoreDesc>,
}

impl CostumeDesc {
    /// Checks the structural invariants the costume relies on:
    /// parents precede children, tracks bind to existing components,
    /// key times are finite and non-decreasing, chore lengths are finite and
    /// non-negative.
    pub fn validate(&self) -> Result<()> {
        for (index, component) in self.components.iter().enumerate() {
            if let Some(parent) = component.parent
                && parent >= index
            {
                return Err(CostumeError::malformed(
                    0,
                    format!("component {index} references parent {parent} which is not registered before it"),
                ));
            }
        }

        for (chore_index, chore) in self.chores.iter().enumerate() {
            if !chore.length.is_finite() || chore.length < 0.0 {
                return Err(CostumeError::malformed(
                    0,
                    format!("chore {chore_index} `{}` has invalid length {}", chore.name, chore.length),
                ));
            }

            for track in &chore.tracks {
                if track.component >= self.components.len() {
                    return Err(CostumeError::malformed(
                        0,
                        format!(
                            "chore `{}` binds a track to component {} (only {} components)",
                            chore.name,
                            track.component,
                            self.components.len()
                        ),
                    ));
                }

                if track.keys.iter().any(|k| !k.time.is_finite() || !k.value.is_finite()) {
                    return Err(CostumeError::malformed(
                        0,
                        format!("chore `{}` has a non-finite key", chore.name),
                    ));
                }

                if track.keys.windows(2).any(|w| w[1].time < w[0].time) {
                    return Err(CostumeError::malformed(
                        0,
                        format!(
                            "chore `{}` track on component {} has decreasing key times",
                            chore.name, track.component
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}
