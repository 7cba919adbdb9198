//! Transform System
//!
//! Matrix hierarchy update for a component tree. Kept apart from the tree so
//! it only borrows the component slice and the root list.

use glam::Affine3A;

use crate::components::Component;

/// Updates every component's world matrix, top-down from `root`.
///
/// A component's world matrix is recomputed when its local transform changed
/// or any ancestor's world matrix did (`root_changed` covers the costume
/// matrix itself). `set_matrix` runs for every component each pass, after its
/// world matrix is final and before any of its children are visited.
///
/// Uses an explicit stack instead of recursion, so deep hierarchies cannot
/// overflow the call stack.
pub fn update_hierarchy(
    components: &mut [Component],
    roots: &[usize],
    root: &Affine3A,
    root_changed: bool,
) {
    // Work stack: (component, parent world matrix, parent changed)
    let mut stack: Vec<(usize, Affine3A, bool)> = Vec::with_capacity(components.len());

    for &id in roots.iter().rev() {
        stack.push((id, *root, root_changed));
    }

    while let Some((id, parent_world, parent_changed)) = stack.pop() {
        let Some(component) = components.get_mut(id) else {
            continue;
        };

        // 1. Local matrix
        let transform = &mut component.base.transform;
        let local_changed = transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        // 2. World matrix
        if world_needs_update {
            let world = parent_world * *transform.local_matrix();
            transform.set_world_matrix(world);
        }
        let current_world = *transform.world_matrix();

        component.set_matrix();

        // 3. Children, pushed in reverse to keep load order
        for &child in component.children.iter().rev() {
            stack.push((child, current_world, world_needs_update));
        }
    }
}
