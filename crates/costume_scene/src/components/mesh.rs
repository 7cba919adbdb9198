use super::{ComponentBase, ComponentHooks};

/// `MESH`: a key of `0` shows the mesh (and its subtree), anything else hides it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshComponent;

impl ComponentHooks for MeshComponent {
    fn set_key(&mut self, base: &mut ComponentBase, value: f32) {
        base.visible = value.round() == 0.0;
    }

    fn reset(&mut self, base: &mut ComponentBase) {
        base.visible = true;
    }
}
