//! Head Look-at Overlay
//!
//! After chores and the hierarchy update have produced a pose, the joint chain
//! `joint1 -> joint2 -> joint3` of the main model is turned toward a world
//! target. Yaw and pitch are measured from `joint2` in `joint1`'s parent
//! frame (forward is `-Z`), clamped per axis, and split equally over the three
//! joints. Nothing accumulates: the model clears the overlay every frame.

use glam::{EulerRot, Quat, Vec3};

use crate::components::ModelComponent;

/// Look-at configuration. Joints index the main model's nodes; limits are
/// in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Head {
    pub joint1: usize,
    pub joint2: usize,
    pub joint3: usize,
    pub max_roll: f32,
    pub max_pitch: f32,
    pub max_yaw: f32,
}

/// Clamped look angles, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl LookAngles {
    /// Rotation (`YXZ` order) covering `1 / parts` of the angles.
    #[must_use]
    pub fn share(&self, parts: f32) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw / parts, self.pitch / parts, self.roll / parts)
    }
}

impl Head {
    #[must_use]
    pub fn new(
        joint1: usize,
        joint2: usize,
        joint3: usize,
        max_roll: f32,
        max_pitch: f32,
        max_yaw: f32,
    ) -> Self {
        Self {
            joint1,
            joint2,
            joint3,
            max_roll,
            max_pitch,
            max_yaw,
        }
    }

    fn joints(&self) -> [usize; 3] {
        [self.joint1, self.joint2, self.joint3]
    }

    /// Angles that aim `joint2` at `target`, clamped to the limits.
    /// `None` when a joint is missing or the target sits on the pivot.
    #[must_use]
    pub fn look_angles(&self, model: &ModelComponent, target: Vec3) -> Option<LookAngles> {
        let nodes = model.nodes();
        if let Some(bad) = self.joints().into_iter().find(|&j| j >= nodes.len()) {
            log::warn!(
                "Head joint {bad} out of range for model `{}` ({} nodes)",
                model.filename(),
                nodes.len()
            );
            return None;
        }

        let to_target = target - nodes[self.joint2].pivot();
        let frame = model.parent_world(self.joint1).inverse();
        let direction = frame.transform_vector3(to_target).try_normalize()?;

        let yaw = (-direction.x).atan2(-direction.z);
        let pitch = direction.y.clamp(-1.0, 1.0).asin();

        Some(LookAngles {
            yaw: clamp_degrees(yaw, self.max_yaw),
            pitch: clamp_degrees(pitch, self.max_pitch),
            roll: clamp_degrees(0.0, self.max_roll),
        })
    }

    /// Installs the look-at rotation on the model's joints and recomputes
    /// its node matrices. Returns whether anything was applied.
    pub fn apply(&self, model: &mut ModelComponent, target: Vec3) -> bool {
        let Some(angles) = self.look_angles(model, target) else {
            return false;
        };

        let share = angles.share(3.0);
        for joint in self.joints() {
            model.set_overlay(joint, share);
        }
        model.recompute();
        true
    }
}

fn clamp_degrees(angle: f32, max_degrees: f32) -> f32 {
    let max = max_degrees.abs().to_radians();
    angle.clamp(-max, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_uses_absolute_limit() {
        assert!((clamp_degrees(1.0, -30.0) - 30f32.to_radians()).abs() < 1e-6);
        assert!((clamp_degrees(-1.0, 30.0) + 30f32.to_radians()).abs() < 1e-6);
        assert_eq!(clamp_degrees(0.1, 90.0), 0.1);
    }

    #[test]
    fn share_splits_angles() {
        let angles = LookAngles {
            yaw: 0.6,
            pitch: 0.0,
            roll: 0.0,
        };
        let (yaw, _, _) = angles.share(3.0).to_euler(EulerRot::YXZ);
        assert!((yaw - 0.2).abs() < 1e-5);
    }
}
