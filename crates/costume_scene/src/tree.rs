//! Component Tree
//!
//! All components of a costume live in one `Vec`, addressed by their load
//! index. Parent/child links are indices into that array, so nothing dangles
//! when the costume is dropped or replaced.

use glam::Affine3A;

use costume_animation::{InterpolationMode, KeyTarget};
use costume_assets::ColormapRef;
use costume_core::{CostumeError, Result};

use crate::components::{Component, ComponentKind, InitContext, ModelComponent};
use crate::render::{RenderBackend, RenderContext};
use crate::transform_system;

#[derive(Debug, Clone, Default)]
pub struct ComponentTree {
    components: Vec<Component>,
    roots: Vec<usize>,
    /// Pre-order traversal (parents before children), rebuilt on re-parenting.
    order: Vec<usize>,
}

impl ComponentTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: usize) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut Component> {
        self.components.get_mut(id)
    }

    /// Fails with `IndexOutOfRange` instead of returning `None`.
    pub fn try_get(&self, id: usize) -> Result<&Component> {
        let len = self.components.len();
        self.components
            .get(id)
            .ok_or(CostumeError::out_of_range("component", id, len))
    }

    pub fn try_get_mut(&mut self, id: usize) -> Result<&mut Component> {
        let len = self.components.len();
        self.components
            .get_mut(id)
            .ok_or(CostumeError::out_of_range("component", id, len))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Component)> {
        self.components.iter().enumerate()
    }

    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Component ids in traversal order, parents before children.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    // ========================================================================
    // Construction & Hierarchy
    // ========================================================================

    /// Appends a component. A parent must already be registered.
    pub fn push(&mut self, mut component: Component, parent: Option<usize>) -> Result<usize> {
        let id = self.components.len();
        if let Some(parent) = parent
            && parent >= id
        {
            return Err(CostumeError::malformed(
                0,
                format!("component {id} references parent {parent} which is not registered before it"),
            ));
        }

        component.parent = parent;
        component.children.clear();
        self.components.push(component);
        match parent {
            Some(parent) => self.components[parent].children.push(id),
            None => self.roots.push(id),
        }
        self.rebuild_order();
        Ok(id)
    }

    /// Moves `id` under `parent`, or makes it a root with `None`.
    ///
    /// The component is detached from its old parent's child list first.
    /// Re-parenting under itself or one of its descendants is refused.
    pub fn set_parent(&mut self, id: usize, parent: Option<usize>) -> Result<()> {
        self.try_get(id)?;
        if let Some(parent) = parent {
            self.try_get(parent)?;
            if self.is_ancestor_or_self(id, parent) {
                log::warn!("Cannot parent component {id} under {parent}: would create a cycle");
                return Err(CostumeError::HierarchyCycle { child: id, parent });
            }
        }

        // 1. Detach from old
        match self.components[id].parent {
            Some(old) => self.components[old].children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }

        // 2. Attach to new
        match parent {
            Some(p) => self.components[p].children.push(id),
            None => self.roots.push(id),
        }

        // 3. Update child
        let component = &mut self.components[id];
        component.parent = parent;
        component.base.transform.mark_dirty();

        self.rebuild_order();
        Ok(())
    }

    /// True if `ancestor` is `id` or lies on `id`'s parent chain.
    fn is_ancestor_or_self(&self, ancestor: usize, mut id: usize) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.components.get(id).and_then(|c| c.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn rebuild_order(&mut self) {
        self.order.clear();
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            self.order.push(id);
            stack.extend(self.components[id].children.iter().rev().copied());
        }
    }

    // ========================================================================
    // Inherited attributes
    // ========================================================================

    /// Own flag set and every ancestor visible. `false` for unknown ids.
    #[must_use]
    pub fn is_visible(&self, id: usize) -> bool {
        let mut current = Some(id);
        while let Some(i) = current {
            let Some(component) = self.components.get(i) else {
                return false;
            };
            if !component.base.visible {
                return false;
            }
            current = component.parent;
        }
        true
    }

    /// Own override, else the nearest ancestor's, else `default`, else the
    /// colormap the adopted component of the previous costume resolved.
    ///
    /// Resolved on every call, so changing an ancestor's override is seen by
    /// descendants without one.
    #[must_use]
    pub fn cmap<'a>(&'a self, id: usize, default: Option<&'a ColormapRef>) -> Option<&'a ColormapRef> {
        let own = self.components.get(id)?;
        let mut current = Some(id);
        while let Some(i) = current {
            let component = self.components.get(i)?;
            if let Some(colormap) = &component.base.colormap {
                return Some(colormap);
            }
            current = component.parent;
        }
        default.or(own.base.previous_colormap.as_ref())
    }

    /// First `MMDL` component's model.
    #[must_use]
    pub fn main_model(&self) -> Option<&ModelComponent> {
        self.main_model_index()
            .and_then(|id| self.components[id].kind.as_model())
    }

    pub fn main_model_mut(&mut self) -> Option<&mut ModelComponent> {
        let id = self.main_model_index()?;
        self.components[id].kind.as_model_mut()
    }

    fn main_model_index(&self) -> Option<usize> {
        self.components
            .iter()
            .position(|c| c.tag() == costume_core::Tag::MMDL)
    }

    // ========================================================================
    // Hook passes
    // ========================================================================

    /// Runs `init` for one component and installs any colormap it hands to
    /// its parent.
    pub(crate) fn init_component(&mut self, id: usize, ctx: &mut InitContext<'_>) {
        ctx.parent_colormap = None;
        self.components[id].init(ctx);

        if let Some(colormap) = ctx.parent_colormap.take() {
            match self.components[id].parent {
                Some(parent) => self.components[parent].base.colormap = Some(colormap),
                None => log::warn!(
                    "Colormap component {id} `{}` has no parent to install on",
                    self.components[id].name()
                ),
            }
        }
    }

    pub fn set_map_name(&mut self, id: usize, name: &str) -> Result<()> {
        self.try_get_mut(id)?.set_map_name(name);
        Ok(())
    }

    /// Per-frame `update` hooks, in traversal order. Afterwards every joint
    /// named like a node of its parent model drives that node's pose.
    pub fn update_components(&mut self) {
        for &id in &self.order {
            self.components[id].update();
        }
        for id in 0..self.components.len() {
            self.pose_model_node(id);
        }
    }

    fn pose_model_node(&mut self, id: usize) {
        let joint = &self.components[id];
        let (ComponentKind::Joint(_), Some(parent)) = (&joint.kind, joint.parent) else {
            return;
        };
        let rotation = joint.base.transform.rotation;
        let Some(node) = self.components[parent]
            .kind
            .as_model()
            .and_then(|model| model.node_index(joint.name()))
        else {
            return;
        };
        if let Some(model) = self.components[parent].kind.as_model_mut() {
            model.pose_node(node, rotation);
        }
    }

    /// Propagates world matrices from `root` down the tree, then calls each
    /// component's `set_matrix`.
    pub fn update_matrices(&mut self, root: &Affine3A, root_changed: bool) {
        transform_system::update_hierarchy(&mut self.components, &self.roots, root, root_changed);
    }

    /// `setup_texture` for every component, visible or not.
    pub fn setup_textures(&self, default: Option<&ColormapRef>, backend: &mut dyn RenderBackend) {
        for &id in &self.order {
            let mut ctx = RenderContext {
                component: id,
                colormap: self.cmap(id, default),
                backend: &mut *backend,
            };
            self.components[id].setup_texture(&mut ctx);
        }
    }

    /// `draw` for visible components; an invisible component hides its
    /// whole subtree.
    pub fn draw(&self, default: Option<&ColormapRef>, backend: &mut dyn RenderBackend) {
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let component = &self.components[id];
            if !component.base.visible {
                continue;
            }
            let mut ctx = RenderContext {
                component: id,
                colormap: self.cmap(id, default),
                backend: &mut *backend,
            };
            component.draw(&mut ctx);
            stack.extend(component.children.iter().rev().copied());
        }
    }

    /// Returns every component to its loaded state. Colormap overrides stay.
    pub fn reset(&mut self) {
        for component in &mut self.components {
            component.reset();
        }
    }
}

impl KeyTarget for ComponentTree {
    fn interpolation(&self, component: usize) -> Option<InterpolationMode> {
        self.components
            .get(component)
            .map(|c| c.kind.hooks().interpolation())
    }

    fn set_key(&mut self, component: usize, value: f32) {
        if let Some(c) = self.components.get_mut(component) {
            c.set_key(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentBase;
    use costume_core::Tag;

    fn mesh(name: &str) -> Component {
        Component::new(
            ComponentBase::new(Tag::MESH, name),
            ComponentKind::from_tag(Tag::MESH, name).unwrap(),
        )
    }

    /// 0 ─┬─ 1 ── 2
    ///    └─ 3
    fn sample_tree() -> ComponentTree {
        let mut tree = ComponentTree::new();
        tree.push(mesh("root"), None).unwrap();
        tree.push(mesh("arm"), Some(0)).unwrap();
        tree.push(mesh("hand"), Some(1)).unwrap();
        tree.push(mesh("leg"), Some(0)).unwrap();
        tree
    }

    #[test]
    fn order_visits_parents_first() {
        let tree = sample_tree();
        assert_eq!(tree.order(), &[0, 1, 2, 3]);
        assert_eq!(tree.roots(), &[0]);
        assert_eq!(tree.get(0).unwrap().children(), &[1, 3]);
    }

    #[test]
    fn push_rejects_forward_parent() {
        let mut tree = ComponentTree::new();
        let err = tree.push(mesh("orphan"), Some(0)).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn set_parent_relinks() {
        let mut tree = sample_tree();
        tree.set_parent(2, Some(3)).unwrap();
        assert_eq!(tree.get(1).unwrap().children(), &[] as &[usize]);
        assert_eq!(tree.get(3).unwrap().children(), &[2]);
        assert_eq!(tree.order(), &[0, 1, 3, 2]);

        tree.set_parent(3, None).unwrap();
        assert_eq!(tree.roots(), &[0, 3]);
        assert_eq!(tree.get(3).unwrap().parent(), None);
    }

    #[test]
    fn set_parent_refuses_cycles() {
        let mut tree = sample_tree();
        assert!(matches!(
            tree.set_parent(0, Some(2)),
            Err(CostumeError::HierarchyCycle { child: 0, parent: 2 })
        ));
        assert!(matches!(
            tree.set_parent(1, Some(1)),
            Err(CostumeError::HierarchyCycle { .. })
        ));
        assert_eq!(tree.order(), &[0, 1, 2, 3]);
    }

    #[test]
    fn visibility_is_inherited() {
        let mut tree = sample_tree();
        tree.get_mut(1).unwrap().base.visible = false;
        assert!(tree.is_visible(0));
        assert!(!tree.is_visible(1));
        assert!(!tree.is_visible(2));
        assert!(tree.is_visible(3));
        assert!(!tree.is_visible(99));
    }

    #[test]
    fn key_target_records_applied_key() {
        let mut tree = sample_tree();
        assert_eq!(tree.interpolation(2), Some(InterpolationMode::Step));
        assert_eq!(tree.interpolation(9), None);

        tree.set_key(2, 1.0);
        assert_eq!(tree.get(2).unwrap().applied_key(), Some(1.0));
        assert!(!tree.get(2).unwrap().base.visible);
    }
}
