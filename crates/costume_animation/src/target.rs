use crate::tracks::InterpolationMode;

/// Receiver of the values a chore produces.
///
/// Components are addressed by their position in the owner's component array.
/// The receiver decides how each component's values are interpolated; a
/// `None` from [`KeyTarget::interpolation`] means the component does not exist
/// and its tracks are skipped.
pub trait KeyTarget {
    fn interpolation(&self, component: usize) -> Option<InterpolationMode>;

    fn set_key(&mut self, component: usize, value: f32);
}
