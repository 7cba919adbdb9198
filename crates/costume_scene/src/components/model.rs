use std::sync::Arc;

use glam::{Affine3A, Quat, Vec3};

use costume_assets::ModelData;

use super::{ComponentBase, ComponentHooks, InitContext};
use crate::render::{DrawCommand, RenderContext};

/// Runtime state of one model joint.
#[derive(Debug, Clone)]
pub struct ModelNode {
    pub name: String,
    pub parent: Option<usize>,
    /// Base pose from the model resource.
    pub position: Vec3,
    pub rotation: Quat,
    /// Chore-driven rotation on top of the base pose, written by a `BONE`
    /// component bound to this node.
    pub pose: Quat,
    /// Post-pass rotation (head look-at), pre-multiplied onto the posed
    /// rotation. Cleared every frame before the overlay runs.
    pub overlay: Quat,
    pub local: Affine3A,
    pub world: Affine3A,
}

impl ModelNode {
    /// World-space pivot of the joint.
    #[inline]
    #[must_use]
    pub fn pivot(&self) -> Vec3 {
        self.world.translation.into()
    }
}

/// `MMDL` / `MOD `: a model whose joint hierarchy follows the component's
/// world matrix.
#[derive(Debug, Clone)]
pub struct ModelComponent {
    filename: String,
    data: Option<Arc<ModelData>>,
    nodes: Vec<ModelNode>,
    root_world: Affine3A,
}

impl ModelComponent {
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            data: None,
            nodes: Vec::new(),
            root_world: Affine3A::IDENTITY,
        }
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Shared model resource, once resolved.
    #[must_use]
    pub fn data(&self) -> Option<&Arc<ModelData>> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn nodes(&self) -> &[ModelNode] {
        &self.nodes
    }

    /// World matrix of the component the nodes hang from.
    #[must_use]
    pub fn root_world(&self) -> &Affine3A {
        &self.root_world
    }

    /// World matrix of `index`'s parent frame (the model root for top nodes).
    #[must_use]
    pub fn parent_world(&self, index: usize) -> Affine3A {
        self.nodes
            .get(index)
            .and_then(|node| node.parent)
            .and_then(|parent| self.nodes.get(parent))
            .map_or(self.root_world, |parent| parent.world)
    }

    /// Index of the node called `name`.
    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.name == name)
    }

    /// Sets the chore-driven rotation of a node. Takes effect on the next
    /// [`Self::recompute`].
    pub fn pose_node(&mut self, index: usize, pose: Quat) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pose = pose;
        }
    }

    /// Installs `overlay` on a node. Takes effect on the next [`Self::recompute`].
    pub fn set_overlay(&mut self, index: usize, overlay: Quat) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.overlay = overlay;
        }
    }

    pub fn clear_overlay(&mut self) {
        for node in &mut self.nodes {
            node.overlay = Quat::IDENTITY;
        }
    }

    /// Recomputes node matrices top-down. Parents precede children in the
    /// node list, so one forward pass suffices.
    pub fn recompute(&mut self) {
        for i in 0..self.nodes.len() {
            let parent_world = self.parent_world(i);
            let node = &mut self.nodes[i];
            let rotation = node.overlay * node.rotation * node.pose;
            node.local = Affine3A::from_rotation_translation(rotation, node.position);
            node.world = parent_world * node.local;
        }
    }

    fn install(&mut self, data: Arc<ModelData>) {
        self.nodes = data
            .nodes
            .iter()
            .map(|desc| ModelNode {
                name: desc.name.clone(),
                parent: desc.parent,
                position: desc.position,
                rotation: desc.rotation,
                pose: Quat::IDENTITY,
                overlay: Quat::IDENTITY,
                local: Affine3A::IDENTITY,
                world: Affine3A::IDENTITY,
            })
            .collect();
        self.data = Some(data);
        self.recompute();
    }
}

impl ComponentHooks for ModelComponent {
    fn init(&mut self, _base: &mut ComponentBase, ctx: &mut InitContext<'_>) {
        let adopted = ctx
            .adoption
            .and_then(|adoption| adoption.model.as_ref())
            .filter(|model| model.name == self.filename)
            .cloned();

        match adopted.or_else(|| ctx.resources.model(&self.filename)) {
            Some(data) => self.install(data),
            None => log::warn!("Model `{}` not found, component has no nodes", self.filename),
        }
    }

    fn set_matrix(&mut self, base: &mut ComponentBase) {
        self.root_world = *base.world_matrix();
        self.clear_overlay();
        self.recompute();
    }

    fn setup_texture(&self, base: &ComponentBase, ctx: &mut RenderContext<'_>) {
        if let Some(colormap) = ctx.colormap {
            let reused = base.reuses_colormap(colormap);
            let colormap = colormap.name.clone();
            ctx.submit(DrawCommand::BindColormap {
                component: ctx.component,
                colormap,
                reused,
            });
        }
    }

    fn draw(&self, _base: &ComponentBase, ctx: &mut RenderContext<'_>) {
        ctx.submit(DrawCommand::DrawModel {
            component: ctx.component,
            model: self.filename.clone(),
            nodes: self.nodes.iter().map(|node| node.world).collect(),
        });
    }

    fn reset(&mut self, _base: &mut ComponentBase) {
        for node in &mut self.nodes {
            node.pose = Quat::IDENTITY;
        }
        self.clear_overlay();
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costume_assets::ModelNodeDesc;

    fn arm() -> Arc<ModelData> {
        Arc::new(ModelData::new(
            "arm.3do",
            vec![
                ModelNodeDesc::new("shoulder", None, Vec3::new(0.0, 1.0, 0.0)),
                ModelNodeDesc::new("elbow", Some(0), Vec3::new(0.0, 0.0, -1.0)),
            ],
        ))
    }

    #[test]
    fn nodes_follow_root_world() {
        let mut model = ModelComponent::new("arm.3do");
        model.install(arm());

        let mut base = ComponentBase::new(costume_core::Tag::MMDL, "arm.3do");
        base.transform.set_world_matrix(Affine3A::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        model.set_matrix(&mut base);

        let elbow = model.nodes()[1].pivot();
        assert!((elbow - Vec3::new(5.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn pose_composes_under_overlay() {
        let mut model = ModelComponent::new("arm.3do");
        model.install(arm());
        let shoulder = model.node_index("shoulder").unwrap();
        assert_eq!(model.node_index("wrist"), None);

        model.pose_node(shoulder, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        model.set_overlay(shoulder, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        model.recompute();
        let elbow = model.nodes()[1].pivot();
        assert!((elbow - Vec3::new(0.0, 1.0, 1.0)).length() < 1e-5);

        // Reset drops the pose; set_matrix alone only drops the overlay.
        let mut base = ComponentBase::new(costume_core::Tag::MMDL, "arm.3do");
        model.set_matrix(&mut base);
        let elbow = model.nodes()[1].pivot();
        assert!((elbow - Vec3::new(-1.0, 1.0, 0.0)).length() < 1e-5);

        model.reset(&mut base);
        let elbow = model.nodes()[1].pivot();
        assert!((elbow - Vec3::new(0.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn overlay_rotates_children_and_clears() {
        let mut model = ModelComponent::new("arm.3do");
        model.install(arm());

        model.set_overlay(0, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        model.recompute();
        let elbow = model.nodes()[1].pivot();
        assert!((elbow - Vec3::new(-1.0, 1.0, 0.0)).length() < 1e-5);

        let mut base = ComponentBase::new(costume_core::Tag::MMDL, "arm.3do");
        model.set_matrix(&mut base);
        let elbow = model.nodes()[1].pivot();
        assert!((elbow - Vec3::new(0.0, 1.0, -1.0)).length() < 1e-5);
    }
}
