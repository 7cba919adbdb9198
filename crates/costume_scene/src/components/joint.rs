use glam::{Quat, Vec3};

use costume_animation::InterpolationMode;

use super::{ComponentBase, ComponentHooks};

/// `BONE`: an animated joint. Keys are angles in degrees about `axis`,
/// blended linearly; `update` turns the current angle into the local rotation.
#[derive(Debug, Clone)]
pub struct JointComponent {
    pub axis: Vec3,
    angle: f32,
}

impl Default for JointComponent {
    fn default() -> Self {
        Self {
            axis: Vec3::Y,
            angle: 0.0,
        }
    }
}

impl JointComponent {
    /// Current angle in degrees.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl ComponentHooks for JointComponent {
    fn interpolation(&self) -> InterpolationMode {
        InterpolationMode::Linear
    }

    fn set_key(&mut self, _base: &mut ComponentBase, value: f32) {
        self.angle = value;
    }

    fn update(&mut self, base: &mut ComponentBase) {
        base.transform.rotation = Quat::from_axis_angle(self.axis, self.angle.to_radians());
    }

    fn reset(&mut self, _base: &mut ComponentBase) {
        self.angle = 0.0;
    }
}
